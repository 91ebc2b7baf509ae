use anyhow::anyhow;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::DocumentFormat;
use crate::profile::{build_profile, ProfileSummary};
use crate::state::AppState;

/// Multipart field the résumé is expected in. Any other field carrying a filename is
/// accepted when this one is absent.
const FILE_FIELD: &str = "file";

struct Upload {
    filename: String,
    data: Bytes,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    let mut fallback: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let is_file_field = field.name() == Some(FILE_FIELD);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
        let upload = Upload { filename, data };

        if is_file_field {
            return Ok(upload);
        }
        fallback.get_or_insert(upload);
    }

    fallback.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))
}

/// POST /extract_profile/
///
/// Accepts a PDF, DOCX or DOC résumé and returns the model's profile summary plus the
/// inferred region. Unreadable documents are not an error: the profile is built from
/// whatever text could be recovered.
pub async fn handle_extract_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileSummary>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    let format = DocumentFormat::from_filename(&upload.filename)?;
    debug!(
        "Received {} ({format}, {} bytes)",
        upload.filename,
        upload.data.len()
    );

    let extractor = state.extractor.clone();
    let data = upload.data;
    let resume_text = tokio::task::spawn_blocking(move || extractor.extract(&data, format))
        .await
        .map_err(|e| AppError::Internal(anyhow!("Text extraction task failed: {e}")))?;

    let summary = build_profile(state.llm.as_ref(), &resume_text).await?;
    info!(
        "Profile extracted from {} (region: {})",
        upload.filename,
        summary.region.as_deref().unwrap_or("unknown")
    );

    Ok(Json(summary))
}
