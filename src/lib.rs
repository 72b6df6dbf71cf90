#![deny(missing_docs)]

//! Core library for the docsum upload summarization server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction for plain-text and PDF uploads.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Chat-completion client abstraction and prompt template.
pub mod summarization;
/// Upload pipeline orchestration.
pub mod upload;
