//! Turning uploaded bytes into text.
//!
//! Only two document kinds are accepted, matched on the declared content type alone. Plain text
//! is decoded as UTF-8; PDFs are walked page by page (see [`pdf`]).

pub mod pdf;

use std::string::FromUtf8Error;
use thiserror::Error;

/// Content type accepted for plain-text uploads.
pub const TEXT_PLAIN: &str = "text/plain";
/// Content type accepted for PDF uploads.
pub const APPLICATION_PDF: &str = "application/pdf";

/// Errors raised while extracting text from an accepted document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Plain-text upload was not valid UTF-8.
    #[error("text upload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    /// PDF could not be parsed as a document.
    #[error("failed to parse PDF document: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Document kinds the upload endpoint knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `text/plain`
    PlainText,
    /// `application/pdf`
    Pdf,
}

impl DocumentKind {
    /// Classify a declared content type.
    ///
    /// Matching is exact: parameters such as `; charset=utf-8`, different casing, or a missing
    /// type all yield `None`.
    pub fn from_content_type(content_type: Option<&str>) -> Option<Self> {
        match content_type? {
            TEXT_PLAIN => Some(Self::PlainText),
            APPLICATION_PDF => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Canonical content type for this kind.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::PlainText => TEXT_PLAIN,
            Self::Pdf => APPLICATION_PDF,
        }
    }
}

/// Extract the raw text of a document.
///
/// The result may be empty or whitespace-only; callers decide whether that is acceptable.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::PlainText => decode_plain_text(bytes),
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes),
    }
}

fn decode_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Count whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
