// Job matching: profile + job listings → model → lenient `matched_jobs` recovery.
// All model calls go through llm_client::CompletionGateway.

pub mod handlers;
pub mod parser;
pub mod prompts;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CompletionGateway, Prompt};
use crate::matching::parser::{empty_matches, matched_results, parse_match_response};
use crate::matching::prompts::{FILTER_JOBS_PROMPT, NO_REGION_CLAUSE, REGION_CLAUSE};
use crate::prompting::{render, render_single_shot};

/// A job listing supplied by the caller. Opaque: only ever rendered into the prompt.
/// Fields are untyped JSON so callers can send ids as numbers and requirements as lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluding_requirements: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desirable_knowledge: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_level: Option<Value>,
    /// Any other keys the caller sent, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct FilterJobsRequest {
    pub profile: String,
    #[serde(default)]
    pub jobs: Vec<JobListing>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Builds the single-shot matching prompt.
pub fn build_filter_prompt(
    profile: &str,
    jobs: &[JobListing],
    region: Option<&str>,
) -> Result<Prompt, AppError> {
    let jobs_json = serde_json::to_string_pretty(jobs).context("Failed to serialize job listings")?;

    let region_clause = match region.map(str::trim).filter(|r| !r.is_empty()) {
        Some(region) => render(REGION_CLAUSE, &[("region", region)]),
        None => NO_REGION_CLAUSE.to_string(),
    };

    Ok(render_single_shot(
        FILTER_JOBS_PROMPT,
        &[
            ("profile", profile),
            ("region_clause", &region_clause),
            ("jobs_json", &jobs_json),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    ))
}

/// Asks the model which jobs fit the profile.
///
/// Upstream failures propagate; a malformed answer degrades to no matches.
pub async fn filter_jobs(
    gateway: &dyn CompletionGateway,
    request: &FilterJobsRequest,
) -> Result<Value, AppError> {
    if request.jobs.is_empty() {
        debug!("No job listings supplied, skipping model call");
        return Ok(empty_matches());
    }

    let prompt = build_filter_prompt(&request.profile, &request.jobs, request.region.as_deref())?;

    let raw = gateway.complete(&prompt).await?;
    let parsed = parse_match_response(Some(&raw));

    let results = matched_results(&parsed);
    info!(
        "Job matching: {} listings in, {} matched",
        request.jobs.len(),
        results.len()
    );

    Ok(parsed)
}
