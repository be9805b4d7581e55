//! Parsing of user-supplied page lists into chapters.

use crate::chapters::Chapter;

/// A manual page list containing a token that is not a positive integer.
///
/// Distinct from the valid empty list: `""` and `",,,"` parse to zero
/// chapters, while `"abc"` fails with this error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid page list: '{token}' is not a positive page number")]
pub struct InvalidPageList {
    pub token: String,
}

/// Parses a comma-separated page list into chapters titled
/// `Section_Page_<n>`.
///
/// Tokens are trimmed and empty tokens dropped, so `"1,,3"` and `"1, 3, "`
/// both yield pages `[1, 3]`. Remaining tokens must parse as integers
/// strictly greater than zero or the whole parse fails. Pages are
/// deduplicated and sorted ascending. When exactly one page remains and it
/// is greater than 1, page 1 is prepended: a single requested split point
/// means "front matter plus everything from that page on".
pub fn parse_manual_pages(input: &str) -> Result<Vec<Chapter>, InvalidPageList> {
    let mut pages = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let page = token
            .parse::<u32>()
            .ok()
            .filter(|page| *page > 0)
            .ok_or_else(|| InvalidPageList {
                token: token.to_string(),
            })?;
        pages.push(page);
    }
    pages.sort_unstable();
    pages.dedup();
    if pages.len() == 1 && pages[0] > 1 {
        pages.insert(0, 1);
    }
    Ok(pages
        .into_iter()
        .map(|page| Chapter::new(format!("Section_Page_{page}"), page))
        .collect())
}
