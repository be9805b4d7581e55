//! Detection configuration and its lenient key/value parser.
//!
//! A [`Config`] is built once per invocation: defaults overlaid with any
//! recognized keys found in an optional `KEY: value` source. Parsing never
//! fails; a value that does not parse as the expected type keeps the prior
//! value and emits a diagnostic.

use serde::{Deserialize, Serialize};

/// Maximum length of a section title once embedded in a filename.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Pattern used for chapter headings when none is configured.
pub const DEFAULT_CHAPTER_REGEX: &str = r"^Chapter\s+\d+";

/// Patterns tried against OCR text when no custom list is configured.
const DEFAULT_OCR_REGEXES: &[&str] = &[
    r"^Chapter\s+\d+",
    r"^Section\s+\d+",
    r"^Part\s+[IVXLCDM\d]+",
    r"^Appendix\s+[A-Z0-9]",
    r"^Annex\s+[A-Z0-9]",
    r"^Cap[ií]tulo\s+\d+",
    r"^Secci[oó]n\s+\d+",
];

/// Thresholds and pattern sets consumed by the detection sources.
///
/// Immutable after construction; detection calls may share one instance
/// freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Regex a heading must match, anchored at the start, case-insensitive.
    pub chapter_regex: String,
    /// Minimum font size for a text run to qualify as a heading.
    pub min_font_size: f32,
    /// When true, the run's font name must carry a "bold" marker.
    pub must_be_bold: bool,
    /// Patterns tried against normalized OCR lines, in order.
    pub ocr_regexes: Vec<String>,
    /// Emit a single synthetic section at page 1 when OCR matches nothing.
    pub ocr_fallback_to_first_page: bool,
    /// Resolution passed to the page rasterizer for OCR.
    pub ocr_render_dpi: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chapter_regex: DEFAULT_CHAPTER_REGEX.to_string(),
            min_font_size: 16.0,
            must_be_bold: true,
            ocr_regexes: DEFAULT_OCR_REGEXES.iter().map(|p| p.to_string()).collect(),
            ocr_fallback_to_first_page: true,
            ocr_render_dpi: 300,
        }
    }
}

impl Config {
    /// Parses a line-oriented `KEY: value` source on top of the defaults.
    ///
    /// Lines without a `:` separator and lines starting with `<!--` are
    /// ignored, as are unknown keys. Each recognized key folds into the
    /// config independently: a malformed value keeps the previous one and
    /// never fails the parse.
    pub fn parse(source: &str) -> Self {
        let mut config = Self::default();
        for line in source.lines() {
            if !line.contains(':') || line.trim_start().starts_with("<!--") {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "CHAPTER_REGEX" => config.chapter_regex = value.to_string(),
                "MIN_FONT_SIZE" => match value.parse::<f32>() {
                    Ok(size) => config.min_font_size = size,
                    Err(_) => {
                        log::warn!("Ignoring unparsable MIN_FONT_SIZE value '{value}'");
                    }
                },
                "MUST_BE_BOLD" => config.must_be_bold = value.eq_ignore_ascii_case("true"),
                "OCR_REGEXES" => {
                    config.ocr_regexes = value
                        .split("||")
                        .map(str::trim)
                        .filter(|pattern| !pattern.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "OCR_FALLBACK_TO_FIRST_PAGE" => {
                    config.ocr_fallback_to_first_page = value.eq_ignore_ascii_case("true");
                }
                "OCR_RENDER_DPI" => match value.parse::<u32>() {
                    Ok(dpi) if dpi > 0 => config.ocr_render_dpi = dpi,
                    _ => {
                        log::warn!("Ignoring unparsable OCR_RENDER_DPI value '{value}'");
                    }
                },
                _ => {}
            }
        }
        config
    }
}
