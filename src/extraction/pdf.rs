//! Page-by-page PDF text extraction backed by `lopdf`.

use super::ExtractionError;
use lopdf::Document;

/// Extract the text of every page in document order and concatenate it without separators.
///
/// A document that cannot be parsed is an error. A page whose text cannot be extracted
/// contributes an empty string instead.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    Ok(extract_pdf_pages(bytes)?.concat())
}

/// Extract the text of every page in document order.
pub fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let document = Document::load_mem(bytes)?;
    // `get_pages` is keyed by 1-based page number, so iteration follows document order.
    let page_numbers: Vec<u32> = document.get_pages().into_keys().collect();
    tracing::debug!(pages = page_numbers.len(), "Parsed PDF document");

    let pages = page_numbers
        .into_iter()
        .map(|page_number| match document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(page = page_number, error = %error, "No extractable text on page");
                String::new()
            }
        })
        .collect();

    Ok(pages)
}
