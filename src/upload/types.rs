//! Data types and error definitions for the upload pipeline.

use crate::extraction::ExtractionError;
use crate::summarization::SummarizationClientError;
use axum::body::Bytes;
use serde::Serialize;
use thiserror::Error;

/// Status string returned with every successful upload.
pub const UPLOAD_SUCCESS_STATUS: &str = "File uploaded, parsed, and summarized successfully";

/// Client-facing message for unsupported content types.
pub const UNSUPPORTED_MEDIA_TYPE_MESSAGE: &str =
    "Unsupported file type. Only PDF and TXT are allowed.";
/// Client-facing message when no text could be extracted.
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to extract text from the file.";
/// Client-facing message when the request carried no file.
pub const MISSING_FILE_MESSAGE: &str = "A file upload is required.";
/// Client-facing message when the request body exceeds the configured limit.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Uploaded file is too large.";
/// Client-facing message when the summarization provider failed.
pub const SUMMARIZATION_FAILED_MESSAGE: &str = "Failed to summarize text using OpenAI.";
/// Client-facing message for every other failure.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error occurred.";

/// A single uploaded file as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name supplied by the client.
    pub file_name: String,
    /// Declared MIME type of the file part, if any.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// Outcome of a successful upload, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    /// Original file name.
    pub file_name: String,
    /// Extracted raw text.
    pub text: String,
    /// Whitespace-delimited token count of `text`.
    pub word_count: usize,
    /// Model-generated structured summary.
    pub summary: String,
    /// Fixed success message.
    pub status: String,
}

/// Errors emitted by the upload pipeline.
///
/// `Display` output carries internal detail for logs. Use [`UploadError::public_message`] for
/// anything sent back to a client.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Declared content type is not `text/plain` or `application/pdf`.
    #[error("unsupported content type: {}", .content_type.as_deref().unwrap_or("<none>"))]
    UnsupportedMediaType {
        /// Content type as declared by the client.
        content_type: Option<String>,
    },
    /// Extraction produced empty or whitespace-only text.
    #[error("no text could be extracted from '{file_name}'")]
    ExtractionFailed {
        /// Name of the offending file.
        file_name: String,
    },
    /// Request did not contain a usable file part.
    #[error("missing file upload: {0}")]
    MissingFile(String),
    /// Request body exceeded the configured upload limit.
    #[error("upload too large: {0}")]
    PayloadTooLarge(String),
    /// Summarization provider failed; never retried.
    #[error("summarization failed: {0}")]
    SummarizationFailed(#[source] SummarizationClientError),
    /// Any failure not classified above.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl UploadError {
    /// Fixed message safe to return to clients.
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType { .. } => UNSUPPORTED_MEDIA_TYPE_MESSAGE,
            Self::ExtractionFailed { .. } => EXTRACTION_FAILED_MESSAGE,
            Self::MissingFile(_) => MISSING_FILE_MESSAGE,
            Self::PayloadTooLarge(_) => PAYLOAD_TOO_LARGE_MESSAGE,
            Self::SummarizationFailed(_) => SUMMARIZATION_FAILED_MESSAGE,
            Self::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE,
        }
    }

    /// Whether the failure was caused by the request rather than the server.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMediaType { .. }
                | Self::ExtractionFailed { .. }
                | Self::MissingFile(_)
                | Self::PayloadTooLarge(_)
        )
    }
}

impl From<ExtractionError> for UploadError {
    fn from(error: ExtractionError) -> Self {
        Self::Unexpected(format!("text extraction failed: {error}"))
    }
}
