// file: src/source/pdf.rs
// description: per-page plain text extraction from in-memory PDF bytes
// reference: https://docs.rs/lopdf

use crate::error::{QaError, Result};
use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based physical page index
    pub page: u32,
    pub text: String,
}

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Pages with no extractable text are skipped; page numbers are never
    /// renumbered to close the gaps.
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>> {
        let pdf = PdfDocument::load_mem(bytes)
            .map_err(|e| QaError::Parse(format!("Failed to parse PDF document: {}", e)))?;

        let page_ids = pdf.get_pages();
        debug!("PDF has {} pages", page_ids.len());

        let mut pages = Vec::with_capacity(page_ids.len());

        for page in page_ids.keys().copied() {
            match pdf.extract_text(&[page]) {
                Ok(text) if !text.trim().is_empty() => pages.push(PageText { page, text }),
                Ok(_) => debug!("Page {} has no text, skipping", page),
                Err(e) => warn!("Could not extract text from page {}: {}. Skipping", page, e),
            }
        }

        Ok(pages)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
