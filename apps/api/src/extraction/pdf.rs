use std::panic;

use super::DecodeError;

/// Runs `pdf-extract` over the in-memory PDF. The decoder panics on some malformed
/// inputs, so panics are caught and reported like ordinary decode errors.
pub(super) fn extract(bytes: &[u8]) -> Result<String, DecodeError> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(DecodeError::Pdf(e.to_string())),
        Err(_) => Err(DecodeError::Pdf("decoder panicked".to_string())),
    }
}
