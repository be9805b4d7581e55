//! Chapter detection: three prioritized sources and the pipeline that
//! orders them.
//!
//! Bookmarks are read first (structural metadata), then text-style
//! heuristics over embedded text (font size, weight, title pattern), and
//! OCR as the last resort for image-only documents. The first stage that
//! applies decides the outcome.

use chaptools_core::config::Config;
use chaptools_core::ocr::LineScanner;
use chaptools_core::style;
use chaptools_core::Chapter;

use crate::outline::OutlineEntry;
use crate::parser::access::PageAccess;
use crate::parser::layout::{assemble_lines, page_text_spans, TextSpan};
use crate::types::{ChapterSource, Detection};
use crate::PdfError;

/// Per-page text recognition for documents without an embedded text layer.
///
/// Implementations live outside this crate (the CLI drives external
/// tooling); detection only needs recognized text per page and an upfront
/// availability probe.
pub trait OcrEngine {
    /// Whether the OCR runtime can run at all. Probed once per document.
    fn is_available(&self) -> bool;

    /// Recognize the text of a single 1-based page.
    fn recognize_page(&self, page: u32) -> Result<String, PdfError>;
}

/// Map top-level outline entries to chapters, preserving outline order.
///
/// Entries nested below level 1 are sub-sections, not chapter starts.
/// Duplicate pages are left in; normalization handles them later.
pub fn outline_chapters(entries: &[OutlineEntry]) -> Vec<Chapter> {
    let mut chapters = Vec::new();

    for entry in entries.iter().filter(|e| e.level == 1) {
        match entry.page {
            Some(page) => chapters.push(Chapter::new(entry.title.clone(), page)),
            None => log::warn!(
                "Skipping bookmark '{}' because its destination page cannot be resolved",
                entry.title
            ),
        }
    }

    chapters
}

/// Scan pre-extracted page spans for chapter-title candidates.
///
/// Pages must be given in ascending order. Within a page, lines are
/// visited top to bottom and spans left to right; the first candidate wins
/// and the rest of the page is skipped, so a page contributes at most one
/// chapter. An uncompilable title pattern yields an empty result.
pub fn style_chapters_in_spans(pages: &[(u32, Vec<TextSpan>)], config: &Config) -> Vec<Chapter> {
    let Some(pattern) = style::compile_title_pattern(config) else {
        return Vec::new();
    };

    let mut chapters = Vec::new();

    for (page, spans) in pages {
        let lines = assemble_lines(spans.clone());
        'page: for line in &lines {
            for span in &line.spans {
                let text = span.text.trim();
                if style::is_chapter_title(text, span.font_size, span.is_bold, &pattern, config) {
                    chapters.push(Chapter::new(text, *page));
                    break 'page;
                }
            }
        }
    }

    chapters
}

/// Run style detection against a live document. A page whose content
/// stream cannot be decoded contributes no candidates.
pub fn style_chapters<B: PageAccess>(doc: &B, config: &Config) -> Vec<Chapter> {
    let mut pages = Vec::new();

    for (page, page_id) in doc.page_map() {
        match page_text_spans(doc, page_id) {
            Ok(spans) => pages.push((page, spans)),
            Err(e) => log::warn!("Skipping text extraction on page {page}: {e}"),
        }
    }

    style_chapters_in_spans(&pages, config)
}

/// Whether any page carries a span with a non-whitespace character.
/// Pages that fail to decode count as empty.
pub fn has_embedded_text<B: PageAccess>(doc: &B) -> bool {
    for (_, page_id) in doc.page_map() {
        if let Ok(spans) = page_text_spans(doc, page_id) {
            if spans
                .iter()
                .any(|s| s.text.chars().any(|c| !c.is_whitespace()))
            {
                return true;
            }
        }
    }

    false
}

/// Run OCR-based detection over every page.
///
/// Each page's recognition failure is logged and skipped. The first-page
/// fallback applies on zero matches whether the engine ran or was
/// unavailable.
pub fn ocr_chapters(engine: &dyn OcrEngine, page_count: u32, config: &Config) -> Vec<Chapter> {
    let mut scanner = LineScanner::new(config);

    if engine.is_available() {
        for page in 1..=page_count {
            match engine.recognize_page(page) {
                Ok(text) => scanner.scan_page(page, &text),
                Err(e) => log::warn!("OCR failed on page {page}: {e}"),
            }
        }
    } else {
        log::warn!("OCR tooling is not available; no pages were recognized");
    }

    scanner.finish(page_count)
}

/// The detection pipeline: bookmarks, then text style, then OCR.
///
/// `ocr` is `None` when OCR is not permitted; an image-only document then
/// produces an empty detection with no source.
pub fn run_detection<B: PageAccess>(
    doc: &B,
    outline: &[OutlineEntry],
    page_count: u32,
    config: &Config,
    ocr: Option<&dyn OcrEngine>,
) -> Detection {
    if !outline.is_empty() {
        let chapters = outline_chapters(outline);
        if !chapters.is_empty() {
            log::info!("Found {} chapters in document bookmarks", chapters.len());
            return Detection {
                chapters,
                source: Some(ChapterSource::Bookmarks),
            };
        }
        log::info!("Bookmarks carry no top-level entries; falling back to text analysis");
    }

    if has_embedded_text(doc) {
        let chapters = style_chapters(doc, config);
        log::info!("Text analysis found {} chapters", chapters.len());
        return Detection {
            chapters,
            source: Some(ChapterSource::TextStyle),
        };
    }

    match ocr {
        Some(engine) => {
            log::info!("No embedded text found; running OCR");
            Detection {
                chapters: ocr_chapters(engine, page_count, config),
                source: Some(ChapterSource::Ocr),
            }
        }
        None => {
            log::info!("Document has no embedded text and OCR is disabled; nothing to detect");
            Detection {
                chapters: Vec::new(),
                source: None,
            }
        }
    }
}
