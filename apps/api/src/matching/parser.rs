//! Structured response parser: recovers the `matched_jobs` object from free-form model text.
//!
//! The model is asked for bare JSON but routinely wraps it in markdown fences or adds
//! noise. Anything that cannot be recovered degrades to `{"matched_jobs": []}`; a bad
//! model answer must never fail the request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::warn;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// One matched job as the model reports it. Typed view over the verbatim response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(deserialize_with = "string_or_number")]
    pub job_id: String,
    pub match_score: u32,
    #[serde(default)]
    pub match_reasons: Vec<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "job_id must be a string or number, got {other}"
        ))),
    }
}

pub fn empty_matches() -> Value {
    json!({ "matched_jobs": [] })
}

/// Removes markdown code fences around (and inside) the model's answer.
///
/// A leading fence line (with or without a language tag) and a trailing fence line are
/// dropped whole; any other fence markers left in the text are deleted.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with(FENCE) {
        text = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    }
    if text.ends_with(FENCE) {
        text = text.rsplit_once('\n').map(|(head, _)| head).unwrap_or("");
    }

    text.replace(JSON_FENCE, "").replace(FENCE, "")
}

/// Parses stripped text as a JSON object carrying a `matched_jobs` key.
pub fn try_parse_matches(text: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("matched_jobs"))
        .then_some(value)
}

/// Full parse: empty input, fence stripping, JSON decode, key check, fallback.
///
/// Returns the parsed object verbatim when it is usable; inner fields are not validated.
pub fn parse_match_response(raw: Option<&str>) -> Value {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return empty_matches();
    };

    let stripped = strip_code_fences(raw);
    match try_parse_matches(&stripped) {
        Some(value) => value,
        None => {
            let preview: String = raw.chars().take(200).collect();
            warn!("Model returned no usable matched_jobs JSON, falling back to empty: {preview}");
            empty_matches()
        }
    }
}

/// Typed view of `matched_jobs`. Entries that do not fit `MatchResult` are skipped.
pub fn matched_results(parsed: &Value) -> Vec<MatchResult> {
    parsed
        .get("matched_jobs")
        .and_then(Value::as_array)
        .map(|jobs| {
            jobs.iter()
                .filter_map(|job| MatchResult::deserialize(job).ok())
                .collect()
        })
        .unwrap_or_default()
}
