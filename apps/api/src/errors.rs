use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"detail": "..."}`. Server-side failures pass their
/// message through unchanged so the caller sees what the upstream said.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat(_) | ExtractionError::MissingExtension(_) => {
                AppError::UnsupportedFormat(err.to_string())
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Upstream(msg) => tracing::error!("Upstream model error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => tracing::debug!("Client error ({status}): {self}"),
        }

        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_maps_to_bad_request() {
        let err: AppError = ExtractionError::UnsupportedFormat("xyz".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_llm_error_maps_to_upstream_500_with_message() {
        let err: AppError = LlmError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_internal_error_passes_text_through() {
        let err = AppError::Internal(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[tokio::test]
    async fn test_error_body_uses_detail_key() {
        let response = AppError::NotFound("Session abc not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "Session abc not found");
    }
}
