//! The text-style heading predicate used by visual chapter detection.

use regex::{Regex, RegexBuilder};

use crate::config::Config;

/// Compiles the configured title pattern case-insensitively.
///
/// Returns `None` when the pattern is malformed; detection treats that as
/// "no candidates" rather than an error.
pub fn compile_title_pattern(config: &Config) -> Option<Regex> {
    match RegexBuilder::new(&config.chapter_regex)
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => {
            log::info!("Using pattern to find chapters: '{}'", config.chapter_regex);
            Some(pattern)
        }
        Err(err) => {
            log::error!("Invalid regex in configuration: {err}");
            None
        }
    }
}

/// True when the pattern's leftmost match begins at the first character.
pub fn matches_at_start(pattern: &Regex, text: &str) -> bool {
    pattern.find(text).is_some_and(|m| m.start() == 0)
}

/// Decides whether one text run qualifies as a chapter heading.
///
/// `bold` reflects whether the run's font name carries a bold marker; it
/// only matters when the configuration requires bold headings.
pub fn is_chapter_title(
    text: &str,
    font_size: f32,
    bold: bool,
    pattern: &Regex,
    config: &Config,
) -> bool {
    font_size >= config.min_font_size
        && (!config.must_be_bold || bold)
        && matches_at_start(pattern, text)
}
