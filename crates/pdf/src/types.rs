use std::fmt;

use serde::{Deserialize, Serialize};

use chaptools_core::Chapter;

/// Which detection stage produced a chapter list.
///
/// Closed set, ordered by reliability: structural bookmarks beat embedded
/// text layout, which beats OCR-reconstructed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChapterSource {
    Bookmarks,
    TextStyle,
    Ocr,
}

impl fmt::Display for ChapterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChapterSource::Bookmarks => write!(f, "bookmarks"),
            ChapterSource::TextStyle => write!(f, "text style"),
            ChapterSource::Ocr => write!(f, "OCR"),
        }
    }
}

/// Outcome of automatic chapter detection.
///
/// `source` is `None` when no detection stage applied (an image-only
/// document scanned without an OCR engine).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Detection {
    pub chapters: Vec<Chapter>,
    pub source: Option<ChapterSource>,
}

/// Document identification read from the trailer Info dictionary, plus the
/// page count. Fields follow the Info dictionary key order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
}
