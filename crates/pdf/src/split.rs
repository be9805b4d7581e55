//! Page-range extraction: the split and merge writers.
//!
//! Both writers are bytes-in/bytes-out over a clone of the loaded document:
//! delete every page outside the wanted ranges, drop the outline root (its
//! destinations would dangle), prune unreferenced objects, renumber and
//! serialize.

use lopdf::{Document, Object};

use crate::PdfError;

/// Serialize the pages in `[start, end]` (1-based, inclusive) as a new PDF.
pub fn extract_range(doc: &Document, start: u32, end: u32) -> Result<Vec<u8>, PdfError> {
    extract_pages(doc, &[(start, end)])
}

/// Serialize the union of the given ranges as one PDF, preserving the
/// original page order. Ranges are expected ascending and non-overlapping.
pub fn extract_merged(doc: &Document, ranges: &[(u32, u32)]) -> Result<Vec<u8>, PdfError> {
    extract_pages(doc, ranges)
}

fn extract_pages(doc: &Document, ranges: &[(u32, u32)]) -> Result<Vec<u8>, PdfError> {
    let mut out = doc.clone();

    let keep = |page: u32| ranges.iter().any(|&(start, end)| page >= start && page <= end);
    let delete: Vec<u32> = out
        .get_pages()
        .keys()
        .copied()
        .filter(|&page| !keep(page))
        .collect();

    if !delete.is_empty() {
        out.delete_pages(&delete);
    }

    strip_outline(&mut out);

    out.prune_objects();
    out.renumber_objects();
    out.compress();

    let mut bytes = Vec::new();
    out.save_to(&mut bytes)
        .map_err(|e| PdfError::Assemble(e.to_string()))?;

    Ok(bytes)
}

/// Remove the outline root from the catalog. Kept bookmarks would point at
/// pages the extracted document no longer contains.
fn strip_outline(doc: &mut Document) {
    let catalog_id = match doc.trailer.get(b"Root").and_then(Object::as_reference) {
        Ok(id) => id,
        Err(_) => return,
    };

    if let Ok(catalog) = doc.get_object_mut(catalog_id).and_then(Object::as_dict_mut) {
        catalog.remove(b"Outlines");
    }
}
