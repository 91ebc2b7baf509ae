//! LLM Client: the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Handlers depend on the `CompletionGateway` trait carried in `AppState`;
//! `GeminiClient` is the production implementation.
//!
//! Model: gemini-2.0-flash (hardcoded, not configurable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for all LLM calls.
pub const MODEL: &str = "gemini-2.0-flash";
const TEMPERATURE: f32 = 0.2;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// What gets sent to the model: a single-shot string or a role-tagged message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Messages(Vec<ChatMessage>),
}

impl Prompt {
    /// Total characters across all parts. Used for debug logging only.
    pub fn text_len(&self) -> usize {
        match self {
            Prompt::Text(text) => text.len(),
            Prompt::Messages(messages) => messages.iter().map(|m| m.content.len()).sum(),
        }
    }
}

/// Boundary to the external completion capability.
///
/// Carried in `AppState` as `Arc<dyn CompletionGateway>` so tests can swap in a stub.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Returns the model's raw text. Any transport, auth or quota failure is an error;
    /// implementations must never substitute a default answer.
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Decodes a successful `generateContent` body. A body that is not the expected
/// shape (proxy HTML, truncated JSON) is a parse error, distinct from transport errors.
fn decode_response(body: &str) -> Result<GenerateContentResponse, LlmError> {
    Ok(serde_json::from_str(body)?)
}

fn build_request(prompt: &Prompt) -> GenerateContentRequest<'_> {
    let generation_config = GenerationConfig {
        temperature: TEMPERATURE,
    };

    match prompt {
        Prompt::Text(text) => GenerateContentRequest {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart { text }],
            }],
            generation_config,
        },
        Prompt::Messages(messages) => {
            let system_parts: Vec<GeminiPart<'_>> = messages
                .iter()
                .filter(|m| m.role == ChatRole::System)
                .map(|m| GeminiPart { text: &m.content })
                .collect();

            let contents = messages
                .iter()
                .filter(|m| m.role != ChatRole::System)
                .map(|m| GeminiContent {
                    role: Some(match m.role {
                        ChatRole::Assistant => "model",
                        _ => "user",
                    }),
                    parts: vec![GeminiPart { text: &m.content }],
                })
                .collect();

            GenerateContentRequest {
                system_instruction: (!system_parts.is_empty()).then(|| GeminiContent {
                    role: None,
                    parts: system_parts,
                }),
                contents,
                generation_config,
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Gemini `generateContent` endpoint with a request timeout and retry logic.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(&self, prompt: &Prompt) -> Result<GenerateContentResponse, LlmError> {
        let url = format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent");
        let request_body = build_request(prompt);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let llm_response = decode_response(&body)?;

            if let Some(usage) = &llm_response.usage_metadata {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionGateway for GeminiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        debug!("Sending prompt to {MODEL} ({} chars)", prompt.text_len());
        let response = self.call(prompt).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }

    fn model(&self) -> &str {
        MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_single_shot_prompt_has_no_system_instruction() {
        let prompt = Prompt::Text("Resume este CV".to_string());
        let body: Value = serde_json::to_value(build_request(&prompt)).unwrap();

        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Resume este CV");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_messages_prompt_moves_system_into_system_instruction() {
        let prompt = Prompt::Messages(vec![
            ChatMessage::system("Eres un asistente"),
            ChatMessage::user("hola"),
        ]);
        let body: Value = serde_json::to_value(build_request(&prompt)).unwrap();

        assert_eq!(
            body["systemInstruction"],
            json!({"parts": [{"text": "Eres un asistente"}]})
        );
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hola");
    }

    #[test]
    fn test_assistant_messages_use_model_role() {
        let prompt = Prompt::Messages(vec![
            ChatMessage::user("hola"),
            ChatMessage {
                role: ChatRole::Assistant,
                content: "¡Hola!".to_string(),
            },
        ]);
        let body: Value = serde_json::to_value(build_request(&prompt)).unwrap();
        assert_eq!(body["contents"][1]["role"], "model");
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hola, "}, {"text": "¿en qué te ayudo?"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 7}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("Hola, ¿en qué te ayudo?"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_undecodable_success_body_is_parse_error() {
        let err = decode_response("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
        assert!(err.to_string().starts_with("JSON parse error"));

        let err = decode_response(r#"{"candidates": [{"content": {"parts": [{"text": "Ho"#).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_decode_response_reads_candidate_text() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "Antofagasta"}]}}]}"#;
        assert_eq!(decode_response(body).unwrap().text().as_deref(), Some("Antofagasta"));
    }

    #[test]
    fn test_prompt_text_len_sums_message_contents() {
        let prompt = Prompt::Messages(vec![ChatMessage::system("abc"), ChatMessage::user("de")]);
        assert_eq!(prompt.text_len(), 5);
    }
}
