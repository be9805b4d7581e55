//! The [`Chapter`] entity and chapter-list normalization.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One detected or requested section boundary: a title and the 1-based
/// page it starts on. Immutable once constructed; normalization produces
/// a new list rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub page: u32,
}

impl Chapter {
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }
}

/// Sorts chapters by page, keeps the first occurrence of each page, and
/// drops pages outside `1..=page_count` with a warning. A zero page count
/// yields an empty list.
///
/// The sort is stable, so among chapters sharing a page the one supplied
/// first wins, matching the tie-break used by the detection sources.
pub fn normalize_chapters(chapters: &[Chapter], page_count: u32) -> Vec<Chapter> {
    if page_count == 0 {
        return Vec::new();
    }
    let mut sorted = chapters.to_vec();
    sorted.sort_by_key(|chapter| chapter.page);

    let mut seen: HashSet<u32> = HashSet::new();
    let mut kept = Vec::new();
    for chapter in sorted {
        if seen.contains(&chapter.page) {
            continue;
        }
        if chapter.page < 1 || chapter.page > page_count {
            log::warn!(
                "Ignoring '{}' because page {} is outside valid range 1-{}",
                chapter.title,
                chapter.page,
                page_count
            );
            continue;
        }
        seen.insert(chapter.page);
        kept.push(chapter);
    }
    kept
}
