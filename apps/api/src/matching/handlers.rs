use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::matching::{filter_jobs, FilterJobsRequest};
use crate::state::AppState;

/// POST /filter_jobs
///
/// Returns `{"matched_jobs": [...]}`. A malformed model answer yields an empty list;
/// only a failed model call turns into a 500.
pub async fn handle_filter_jobs(
    State(state): State<AppState>,
    Json(request): Json<FilterJobsRequest>,
) -> Result<Json<Value>, AppError> {
    let matches = filter_jobs(state.llm.as_ref(), &request).await?;
    Ok(Json(matches))
}
