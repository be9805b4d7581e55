//! OCR line normalization, pattern compilation, and chapter scanning.
//!
//! The scanner consumes recognized text one page at a time and applies the
//! same one-chapter-per-page rule as visual detection. Because OCR output
//! is noisy, every line is normalized before matching and a fallback title
//! is retained in case no pattern ever matches.

use regex::{Regex, RegexBuilder};

use crate::chapters::Chapter;
use crate::config::{Config, MAX_TITLE_LENGTH};
use crate::style::matches_at_start;

/// Title used for the synthetic first-page section when no recognized text
/// was ever seen.
pub const FALLBACK_SECTION_TITLE: &str = "Scanned_Section_1";

/// Builds the effective OCR pattern set: the configured title pattern
/// followed by the OCR patterns, trimmed, deduplicated, each compiled
/// case-insensitively. A pattern that fails to compile is skipped with a
/// diagnostic; it never aborts the scan.
pub fn compile_patterns(config: &Config) -> Vec<Regex> {
    let mut seen: Vec<&str> = Vec::new();
    let mut patterns = Vec::new();
    let candidates = std::iter::once(config.chapter_regex.as_str())
        .chain(config.ocr_regexes.iter().map(String::as_str));
    for raw in candidates {
        let raw = raw.trim();
        if raw.is_empty() || seen.contains(&raw) {
            continue;
        }
        seen.push(raw);
        match RegexBuilder::new(raw).case_insensitive(true).build() {
            Ok(pattern) => patterns.push(pattern),
            Err(err) => log::warn!("Skipping invalid OCR regex '{raw}': {err}"),
        }
    }
    if patterns.is_empty() {
        log::warn!("No valid OCR regex patterns available.");
    } else {
        let preview: Vec<&str> = patterns.iter().map(|p| p.as_str()).collect();
        log::info!("Using OCR patterns: {}", preview.join(", "));
    }
    patterns
}

/// Accumulates chapters from recognized page text.
///
/// Feed pages in ascending order with [`scan_page`](Self::scan_page), then
/// call [`finish`](Self::finish) once to apply the first-page fallback
/// rule. The fallback applies whether the OCR runtime matched nothing or
/// never ran at all.
#[derive(Debug)]
pub struct LineScanner {
    patterns: Vec<Regex>,
    whitespace: Regex,
    leading_noise: Regex,
    fallback_enabled: bool,
    chapters: Vec<Chapter>,
    fallback_title: Option<String>,
}

impl LineScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            patterns: compile_patterns(config),
            whitespace: Regex::new(r"\s+").unwrap(),
            leading_noise: Regex::new(r"^\W+").unwrap(),
            fallback_enabled: config.ocr_fallback_to_first_page,
            chapters: Vec::new(),
            fallback_title: None,
        }
    }

    /// Collapses whitespace runs, trims, and strips a leading run of
    /// non-word characters (scan-artifact noise).
    pub fn normalize(&self, line: &str) -> String {
        let collapsed = self.whitespace.replace_all(line, " ");
        let trimmed = collapsed.trim();
        self.leading_noise.replace(trimmed, "").into_owned()
    }

    /// Scans one page of recognized text. At most one chapter is recorded
    /// per page: the first normalized line matching any pattern at its
    /// start. The first non-empty normalized line seen anywhere also feeds
    /// the fallback title, even on pages that record a chapter.
    pub fn scan_page(&mut self, page: u32, text: &str) {
        let mut captured = false;
        for raw in text.lines() {
            let line = self.normalize(raw);
            if line.is_empty() {
                continue;
            }
            if self.fallback_title.is_none() {
                self.fallback_title = Some(line.chars().take(MAX_TITLE_LENGTH).collect());
            }
            if captured {
                continue;
            }
            if self
                .patterns
                .iter()
                .any(|pattern| matches_at_start(pattern, &line))
            {
                self.chapters.push(Chapter::new(line, page));
                captured = true;
            }
        }
    }

    /// Returns the matched chapters, or the synthetic first-page section
    /// when nothing matched, fallback is enabled, and the document has at
    /// least one page.
    pub fn finish(self, page_count: u32) -> Vec<Chapter> {
        if !self.chapters.is_empty() {
            return self.chapters;
        }
        if self.fallback_enabled && page_count > 0 {
            let title = self
                .fallback_title
                .unwrap_or_else(|| FALLBACK_SECTION_TITLE.to_string());
            log::info!("No chapter headings recognized; treating the document as a single section from page 1.");
            return vec![Chapter::new(title, 1)];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> LineScanner {
        LineScanner::new(&Config::default())
    }

    // =========================================================================
    // line normalization
    // =========================================================================

    #[test]
    fn normalization_collapses_whitespace_and_strips_noise() {
        let s = scanner();
        assert_eq!(s.normalize("  ###   Chapter   1   Intro  "), "Chapter 1 Intro");
        assert_eq!(s.normalize("\t~~ Section\t2"), "Section 2");
        assert_eq!(s.normalize("***"), "");
    }

    // =========================================================================
    // pattern compilation
    // =========================================================================

    #[test]
    fn title_pattern_joins_the_ocr_set_once() {
        let config = Config {
            ocr_regexes: vec![r"^Chapter\s+\d+".to_string(), r"^Part\s+\d+".to_string()],
            ..Config::default()
        };
        let patterns = compile_patterns(&config);
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn invalid_patterns_are_skipped() {
        let config = Config {
            ocr_regexes: vec!["(".to_string(), r"^Part\s+\d+".to_string()],
            ..Config::default()
        };
        let patterns = compile_patterns(&config);
        assert_eq!(patterns.len(), 2); // title pattern + the valid OCR one
    }

    // =========================================================================
    // page scanning
    // =========================================================================

    #[test]
    fn records_first_matching_line_per_page() {
        let mut s = scanner();
        s.scan_page(3, "noise line\nChapter 1 Beginnings\nChapter 2 Endings\n");
        let chapters = s.finish(10);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1 Beginnings");
        assert_eq!(chapters[0].page, 3);
    }

    #[test]
    fn matched_titles_keep_the_full_normalized_line() {
        let mut s = scanner();
        let long_tail = "x".repeat(150);
        s.scan_page(1, &format!("Chapter 1 {long_tail}"));
        let chapters = s.finish(5);
        assert_eq!(chapters[0].title.len(), "Chapter 1 ".len() + 150);
    }

    #[test]
    fn chapters_accumulate_across_pages() {
        let mut s = scanner();
        s.scan_page(1, "Chapter 1 Alpha");
        s.scan_page(4, "Chapter 2 Beta");
        let chapters = s.finish(10);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].page, 4);
    }

    // =========================================================================
    // first-page fallback
    // =========================================================================

    #[test]
    fn fallback_uses_first_nonempty_line_truncated() {
        let mut s = scanner();
        let first_line = "B".repeat(140);
        s.scan_page(1, &format!("\n\n{first_line}\nmore text"));
        s.scan_page(2, "nothing matching here");
        let chapters = s.finish(2);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].page, 1);
        assert_eq!(chapters[0].title, "B".repeat(100));
    }

    #[test]
    fn fallback_placeholder_when_no_text_was_seen() {
        let mut s = scanner();
        s.scan_page(1, "   \n\t\n");
        let chapters = s.finish(3);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, FALLBACK_SECTION_TITLE);
    }

    #[test]
    fn fallback_applies_when_no_page_was_ever_scanned() {
        let s = scanner();
        let chapters = s.finish(4);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].page, 1);
        assert_eq!(chapters[0].title, FALLBACK_SECTION_TITLE);
    }

    #[test]
    fn fallback_disabled_yields_empty() {
        let config = Config {
            ocr_fallback_to_first_page: false,
            ..Config::default()
        };
        let mut s = LineScanner::new(&config);
        s.scan_page(1, "no headings here");
        assert!(s.finish(3).is_empty());
    }

    #[test]
    fn fallback_requires_at_least_one_page() {
        let s = scanner();
        assert!(s.finish(0).is_empty());
    }

    #[test]
    fn no_fallback_once_a_chapter_matched() {
        let mut s = scanner();
        s.scan_page(1, "intro text");
        s.scan_page(2, "Chapter 5 Late Arrival");
        let chapters = s.finish(2);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].page, 2);
    }

    #[test]
    fn spanish_defaults_match() {
        let mut s = scanner();
        s.scan_page(1, "Capítulo 3 La Sombra");
        let chapters = s.finish(2);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Capítulo 3 La Sombra");
    }
}
