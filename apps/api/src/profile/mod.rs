// Profile extraction: résumé text → profile summary → inferred region.
// All model calls go through llm_client::CompletionGateway.

pub mod handlers;
pub mod prompts;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::SHORT_ANSWER_INSTRUCTION;
use crate::llm_client::CompletionGateway;
use crate::profile::prompts::{PROFILE_PROMPT, REGION_PROMPT};
use crate::prompting::render_single_shot;

/// Answers the region prompt may give when it cannot tell.
const UNKNOWN_REGION_ANSWERS: &[&str] = &[
    "null",
    "none",
    "ninguna",
    "desconocida",
    "no determinada",
    "n/a",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub profile: String,
    pub region: Option<String>,
}

/// Runs the two single-shot calls: profile first, then region over the profile.
///
/// Empty résumé text is still sent; the model's answer degrades rather than the request.
pub async fn build_profile(
    gateway: &dyn CompletionGateway,
    resume_text: &str,
) -> Result<ProfileSummary, AppError> {
    if resume_text.is_empty() {
        warn!("Résumé produced no text; generating profile from empty input");
    }

    let prompt = render_single_shot(PROFILE_PROMPT, &[("resume_text", resume_text)]);
    let profile = gateway.complete(&prompt).await?.trim().to_string();

    let prompt = render_single_shot(
        REGION_PROMPT,
        &[("profile", &profile), ("short_answer", SHORT_ANSWER_INSTRUCTION)],
    );
    let region = normalize_region(&gateway.complete(&prompt).await?);
    debug!("Profile built ({} chars), region: {region:?}", profile.len());

    Ok(ProfileSummary { profile, region })
}

/// Cleans the model's region answer. `None` when it is empty or an "unknown" token.
pub fn normalize_region(answer: &str) -> Option<String> {
    // Quotes and periods can wrap each other (`"X".`, `"X."`), so strip until stable.
    let mut cleaned = answer.trim();
    loop {
        let next = cleaned
            .trim_end_matches('.')
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .trim();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    let lowered = cleaned.to_lowercase();
    if cleaned.is_empty() || UNKNOWN_REGION_ANSWERS.contains(&lowered.as_str()) {
        None
    } else {
        Some(cleaned.to_string())
    }
}
