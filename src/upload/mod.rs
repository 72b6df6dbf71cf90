//! Upload pipeline: content-type validation, text extraction, word counting, and summarization.

mod service;
pub mod types;

pub use service::{UploadApi, UploadService};
pub use types::{UPLOAD_SUCCESS_STATUS, UploadError, UploadResult, UploadedFile};
