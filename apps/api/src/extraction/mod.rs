//! Document text extraction for uploaded résumés (PDF, DOCX, legacy DOC).
//!
//! The declared format comes from the filename suffix. An unsupported suffix is a client
//! error; everything that goes wrong *inside* a supported format (corrupt file, image-only
//! PDF, missing or hung `antiword`) degrades to an empty string and a warning. Callers treat
//! empty text as "no usable content".

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

mod doc;
mod docx;
mod pdf;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format '.{0}'. Supported formats: pdf, docx, doc")]
    UnsupportedFormat(String),

    #[error("File '{0}' has no extension. Supported formats: pdf, docx, doc")]
    MissingExtension(String),
}

/// Failure inside a format decoder. Never leaves this module.
#[derive(Debug, Error)]
enum DecodeError {
    #[error("PDF decoder: {0}")]
    Pdf(String),

    #[error("DOCX decoder: {0}")]
    Docx(String),

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("antiword exited with {status}: {stderr}")]
    Antiword { status: String, stderr: String },

    #[error("antiword did not finish within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Doc,
}

impl DocumentFormat {
    /// Detects the format from the filename suffix, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let (_, ext) = filename
            .rsplit_once('.')
            .filter(|(_, ext)| !ext.is_empty())
            .ok_or_else(|| ExtractionError::MissingExtension(filename.to_string()))?;

        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "doc" => Ok(DocumentFormat::Doc),
            other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Doc => "doc",
        })
    }
}

/// Converts document bytes to plain text. Blocking; run it under `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct DocumentTextExtractor {
    antiword_path: String,
    antiword_timeout: Duration,
}

impl DocumentTextExtractor {
    pub fn new(antiword_path: impl Into<String>, antiword_timeout: Duration) -> Self {
        Self {
            antiword_path: antiword_path.into(),
            antiword_timeout,
        }
    }

    /// Never fails: decoder errors are logged and yield `""`.
    pub fn extract(&self, bytes: &[u8], format: DocumentFormat) -> String {
        let decoded = match format {
            DocumentFormat::Pdf => pdf::extract(bytes),
            DocumentFormat::Docx => docx::extract(bytes),
            DocumentFormat::Doc => doc::extract(bytes, &self.antiword_path, self.antiword_timeout),
        };

        match decoded {
            Ok(text) => {
                let text = normalize(&text);
                if text.is_empty() {
                    warn!("No text found in {format} document ({} bytes)", bytes.len());
                } else {
                    debug!("Extracted {} chars from {format} document", text.len());
                }
                text
            }
            Err(e) => {
                warn!("Could not extract text from {format} document: {e}");
                String::new()
            }
        }
    }
}

/// Strips NUL bytes and surrounding whitespace. Invalid UTF-8 is already replaced by
/// the decoders.
fn normalize(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_filename("cv.PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(
            DocumentFormat::from_filename("Mi CV Final.DocX").unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(DocumentFormat::from_filename("old.doc").unwrap(), DocumentFormat::Doc);
    }

    #[test]
    fn test_format_detection_uses_last_suffix() {
        assert_eq!(
            DocumentFormat::from_filename("cv.docx.pdf").unwrap(),
            DocumentFormat::Pdf
        );
        assert!(DocumentFormat::from_filename("cv.pdf.exe").is_err());
    }

    #[test]
    fn test_unsupported_suffix_is_rejected() {
        let err = DocumentFormat::from_filename("unsupported.xyz").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref ext) if ext == "xyz"));

        let err = DocumentFormat::from_filename("UNSUPPORTED.XYZ").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref ext) if ext == "xyz"));
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        assert!(matches!(
            DocumentFormat::from_filename("curriculum"),
            Err(ExtractionError::MissingExtension(_))
        ));
        assert!(matches!(
            DocumentFormat::from_filename("curriculum."),
            Err(ExtractionError::MissingExtension(_))
        ));
    }

    #[test]
    fn test_corrupt_and_empty_buffers_degrade_to_empty_text() {
        let extractor = DocumentTextExtractor::new("/nonexistent/antiword", Duration::from_secs(5));
        for format in [DocumentFormat::Pdf, DocumentFormat::Docx, DocumentFormat::Doc] {
            assert_eq!(extractor.extract(b"", format), "", "empty {format}");
            assert_eq!(
                extractor.extract(b"\x00\xffdefinitely not a document", format),
                "",
                "corrupt {format}"
            );
        }
    }

    #[test]
    fn test_normalize_strips_nul_and_whitespace() {
        assert_eq!(normalize("  \0Hola\0 mundo \n"), "Hola mundo");
    }
}
