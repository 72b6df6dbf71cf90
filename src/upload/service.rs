//! Upload service coordinating validation, extraction, word counting, and summarization.

use crate::{
    extraction::{self, DocumentKind},
    summarization::{SummarizationClient, SummarizationClientError, SummarizationRequest},
    upload::types::{UPLOAD_SUCCESS_STATUS, UploadError, UploadResult, UploadedFile},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Abstraction over the upload pipeline used by the HTTP surface.
#[async_trait]
pub trait UploadApi: Send + Sync {
    /// Validate, extract, count, and summarize a single uploaded file.
    async fn process_upload(&self, file: UploadedFile) -> Result<UploadResult, UploadError>;
}

/// Runs one upload through `TypeValidated → TextExtracted → CountComputed → Summarized`.
///
/// The service holds only immutable handles, so a single instance is shared across all requests
/// through an `Arc`. Nothing about an upload outlives the call that processes it.
pub struct UploadService {
    summarizer: Arc<dyn SummarizationClient>,
    model: String,
}

impl UploadService {
    /// Build a service that summarizes with `model` through `summarizer`.
    pub fn new(summarizer: Arc<dyn SummarizationClient>, model: impl Into<String>) -> Self {
        Self {
            summarizer,
            model: model.into(),
        }
    }

    /// Model identifier sent with every summarization request.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn run(&self, file: UploadedFile) -> Result<UploadResult, UploadError> {
        let UploadedFile {
            file_name,
            content_type,
            bytes,
        } = file;
        tracing::info!(content_type = ?content_type, bytes = bytes.len(), "File upload received");

        let kind = DocumentKind::from_content_type(content_type.as_deref())
            .ok_or(UploadError::UnsupportedMediaType { content_type })?;
        tracing::debug!(kind = kind.content_type(), "Content type accepted");

        // PDF parsing is CPU-bound; keep it off the async workers.
        let text = tokio::task::spawn_blocking(move || {
            extraction::extract_text(kind, &bytes).map_err(UploadError::from)
        })
        .await
        .map_err(|error| UploadError::Unexpected(format!("extraction task failed: {error}")))??;

        if text.trim().is_empty() {
            return Err(UploadError::ExtractionFailed { file_name });
        }

        let word_count = extraction::word_count(&text);
        tracing::debug!(chars = text.len(), word_count, "Text extracted");

        let summary = self
            .summarizer
            .generate_summary(SummarizationRequest::for_document(&self.model, &text))
            .await
            .map_err(UploadError::SummarizationFailed)?;
        if summary.trim().is_empty() {
            return Err(UploadError::SummarizationFailed(
                SummarizationClientError::InvalidResponse("summary was empty".into()),
            ));
        }
        tracing::info!(word_count, summary_chars = summary.len(), "Upload summarized");

        Ok(UploadResult {
            file_name,
            text,
            word_count,
            summary,
            status: UPLOAD_SUCCESS_STATUS.to_string(),
        })
    }
}

#[async_trait]
impl UploadApi for UploadService {
    async fn process_upload(&self, file: UploadedFile) -> Result<UploadResult, UploadError> {
        let span = tracing::info_span!(
            "upload",
            request_id = %Uuid::new_v4(),
            file_name = %file.file_name,
        );
        self.run(file).instrument(span).await
    }
}
