//! PDF access layer: document loading, text-layout reconstruction, outline
//! traversal, chapter detection, and page-range extraction.
//!
//! Everything that touches `lopdf` lives here. The pure detection and
//! partitioning rules come from `chaptools_core`; this crate feeds them
//! real page data and turns the resulting plans back into PDF bytes.

use thiserror::Error;

use chaptools_core::config::Config;

pub mod detect;
pub mod outline;
pub mod parser;
pub mod split;
pub mod types;

pub use detect::OcrEngine;
pub use outline::OutlineEntry;
pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("could not parse PDF: {0}")]
    Parse(String),
    #[error("encrypted PDFs are not supported")]
    Encrypted,
    #[error("could not assemble output PDF: {0}")]
    Assemble(String),
    #[error("OCR failed: {0}")]
    Ocr(String),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A loaded PDF document.
///
/// Constructed via [`SourceDocument::from_bytes`]. All further operations
/// (metadata, detection, extraction) reuse the parsed state without
/// re-reading the bytes.
pub struct SourceDocument {
    inner: parser::access::LopdfDocument,
}

impl SourceDocument {
    /// Parse PDF bytes. Encrypted documents are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let inner = parser::access::LopdfDocument::load(bytes)?;
        Ok(SourceDocument { inner })
    }

    /// Total number of pages.
    pub fn page_count(&self) -> u32 {
        self.inner.page_count()
    }

    /// Identification strings from the trailer Info dictionary, plus the
    /// page count.
    pub fn info(&self) -> DocumentInfo {
        let mut strings = self.inner.info_strings();
        DocumentInfo {
            title: strings.remove("Title"),
            author: strings.remove("Author"),
            subject: strings.remove("Subject"),
            creator: strings.remove("Creator"),
            producer: strings.remove("Producer"),
            page_count: self.inner.page_count() as usize,
        }
    }

    /// Flattened outline (bookmark) entries in depth-first order.
    pub fn outline_entries(&self) -> Vec<OutlineEntry> {
        outline::outline_entries(self.inner.inner())
    }

    /// Whether any page carries embedded text.
    pub fn has_embedded_text(&self) -> bool {
        detect::has_embedded_text(&self.inner)
    }

    /// Run the chapter detection pipeline: bookmarks, then text style, then
    /// OCR through the supplied engine. Pass `None` to disallow OCR.
    pub fn detect_chapters(&self, config: &Config, ocr: Option<&dyn OcrEngine>) -> Detection {
        let outline = self.outline_entries();
        detect::run_detection(&self.inner, &outline, self.page_count(), config, ocr)
    }

    /// Serialize the pages in `[start, end]` (1-based, inclusive) as a new
    /// PDF.
    pub fn extract_range(&self, start: u32, end: u32) -> Result<Vec<u8>, PdfError> {
        split::extract_range(self.inner.inner(), start, end)
    }

    /// Serialize the union of the given page ranges as one new PDF.
    pub fn extract_merged(&self, ranges: &[(u32, u32)]) -> Result<Vec<u8>, PdfError> {
        split::extract_merged(self.inner.inner(), ranges)
    }
}

/// Read document identification without keeping the parsed document around.
pub fn read_info(bytes: &[u8]) -> Result<DocumentInfo, PdfError> {
    Ok(SourceDocument::from_bytes(bytes)?.info())
}
