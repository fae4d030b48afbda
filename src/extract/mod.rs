//! Document text extraction
//!
//! PDFs are read page by page; each page that yields text contributes it
//! verbatim followed by a line break, and pages that fail or come back empty
//! contribute nothing.

use crate::error::{DigestError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Produces raw text for a document on disk
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// PDF extraction backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let document = lopdf::Document::load(path)
            .map_err(|e| DigestError::Extraction(format!("{}: {}", path.display(), e)))?;

        let pages = document.get_pages();
        debug!("Extracting text from {} pages of {}", pages.len(), path.display());

        let texts = pages.keys().map(|&number| match document.extract_text(&[number]) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("No text extracted from page {}: {}", number, e);
                None
            }
        });

        Ok(join_pages(texts))
    }
}

/// Reads UTF-8 text files as-is
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Concatenate page texts, skipping pages with no text at all
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut text = String::new();
    for page in pages.into_iter().flatten() {
        if page.is_empty() {
            continue;
        }
        text.push_str(&page);
        text.push('\n');
    }
    text
}

/// Extract text choosing the extractor by file extension
pub fn extract_document(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => PdfExtractor.extract(path),
        Some("txt") | Some("md") | Some("text") => PlainTextExtractor.extract(path),
        other => Err(DigestError::Extraction(format!(
            "unsupported document type {:?} for {}",
            other.unwrap_or(""),
            path.display()
        ))),
    }
}
