//! Page-range planning and output-name derivation for split and merge.
//!
//! A chapter list plus the document's page count turns into an ordered set
//! of inclusive [`SectionPlan`] ranges. Split mode writes one file per
//! plan; merge mode concatenates the same ranges into a single output.

use serde::{Deserialize, Serialize};

use crate::chapters::{normalize_chapters, Chapter};
use crate::config::MAX_TITLE_LENGTH;

/// Characters never allowed in a generated filename.
const FORBIDDEN_TITLE_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// One planned output section: an inclusive 1-based page range plus the
/// names derived from the chapter that opened it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPlan {
    /// Sequential 1-based output index; skipped ranges leave no gaps.
    pub index: usize,
    pub start_page: u32,
    pub end_page: u32,
    /// Original chapter title, untouched.
    pub title: String,
    /// Filesystem-safe stem derived from the title.
    pub file_stem: String,
}

impl SectionPlan {
    /// Output filename for split mode: `NN_stem.pdf` with a two-digit
    /// zero-padded index.
    pub fn file_name(&self) -> String {
        format!("{:02}_{}.pdf", self.index, self.file_stem)
    }

    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }
}

/// Converts a chapter title into a filesystem-safe stem.
///
/// Strips `\ / * ? : " < > |`, trims, replaces spaces with underscores and
/// caps the length at 100 characters. An empty result falls back to
/// `Section_<index>`.
pub fn sanitize_title(title: &str, index: usize) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !FORBIDDEN_TITLE_CHARS.contains(c))
        .collect();
    let cleaned: String = cleaned
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_TITLE_LENGTH)
        .collect();
    if cleaned.is_empty() {
        format!("Section_{index}")
    } else {
        cleaned
    }
}

/// Plans ranges for an already-normalized chapter list (sorted ascending,
/// in range, duplicate-free; see [`normalize_chapters`]).
///
/// Chapter `i` spans from its own page to the page before chapter `i + 1`,
/// or to the last page for the final chapter. A range whose start exceeds
/// its end is skipped with a diagnostic and does not consume an output
/// index.
pub fn plan_normalized(chapters: &[Chapter], page_count: u32) -> Vec<SectionPlan> {
    let mut plans: Vec<SectionPlan> = Vec::new();
    for (position, chapter) in chapters.iter().enumerate() {
        let start_page = chapter.page;
        let end_page = match chapters.get(position + 1) {
            Some(next) => next.page.saturating_sub(1),
            None => page_count,
        };
        if start_page > end_page {
            log::warn!("Skipping '{}' due to invalid page range.", chapter.title);
            continue;
        }
        let index = plans.len() + 1;
        plans.push(SectionPlan {
            index,
            start_page,
            end_page,
            title: chapter.title.clone(),
            file_stem: sanitize_title(&chapter.title, index),
        });
    }
    if plans.is_empty() {
        log::info!("No valid page ranges to produce.");
    }
    plans
}

/// Normalizes a raw chapter list and plans its ranges in one step.
pub fn plan_sections(chapters: &[Chapter], page_count: u32) -> Vec<SectionPlan> {
    plan_normalized(&normalize_chapters(chapters, page_count), page_count)
}
