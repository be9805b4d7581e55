//! Outline (bookmark) tree traversal.
//!
//! Flattens the catalog's `/Outlines` tree into a list of entries carrying
//! their nesting level and, where resolvable, a 1-based destination page.
//! Destinations come in several shapes: explicit arrays, references to
//! arrays, dictionaries wrapping an array under `/D`, `GoTo` actions, and
//! named destinations resolved through the catalog's `/Dests` dictionary or
//! the `/Names` name tree.

use std::collections::{BTreeMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::parser::access::decode_text_bytes;

/// Name trees nest shallowly in practice; anything deeper is malformed.
const MAX_NAME_TREE_DEPTH: u32 = 16;

/// A flattened outline entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    /// Nesting depth; the outline root's direct children are level 1.
    pub level: u32,
    pub title: String,
    /// 1-based page number, `None` when the destination does not resolve.
    pub page: Option<u32>,
}

/// Flatten the document's outline tree in depth-first order.
///
/// Returns an empty list when the document has no outline. Malformed
/// entries (missing titles, dangling references, cyclic sibling chains)
/// degrade to partial results rather than errors.
pub fn outline_entries(doc: &Document) -> Vec<OutlineEntry> {
    let Some(root_id) = outline_root(doc) else {
        return Vec::new();
    };

    // Reverse page map for destination resolution.
    let page_numbers: BTreeMap<ObjectId, u32> = doc
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number))
        .collect();

    let mut entries = Vec::new();
    let mut visited = HashSet::new();

    if let Some(first) = dict_at(doc, root_id).and_then(|d| reference_entry(d, b"First")) {
        walk_siblings(doc, first, 1, &page_numbers, &mut visited, &mut entries);
    }

    entries
}

fn outline_root(doc: &Document) -> Option<ObjectId> {
    let catalog = doc.catalog().ok()?;
    catalog.get(b"Outlines").ok()?.as_reference().ok()
}

fn dict_at(doc: &Document, id: ObjectId) -> Option<&Dictionary> {
    doc.get_object(id).ok()?.as_dict().ok()
}

fn reference_entry(dict: &Dictionary, key: &[u8]) -> Option<ObjectId> {
    dict.get(key).ok()?.as_reference().ok()
}

/// Follow a single level of reference indirection.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn walk_siblings(
    doc: &Document,
    start: ObjectId,
    level: u32,
    page_numbers: &BTreeMap<ObjectId, u32>,
    visited: &mut HashSet<ObjectId>,
    entries: &mut Vec<OutlineEntry>,
) {
    let mut current = Some(start);

    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }

        let Some(item) = dict_at(doc, id) else {
            break;
        };

        let title = item
            .get(b"Title")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| match o {
                Object::String(bytes, _) => Some(decode_text_bytes(bytes)),
                _ => None,
            })
            .unwrap_or_default();

        let page = resolve_destination(doc, item, page_numbers);

        entries.push(OutlineEntry { level, title, page });

        if let Some(first_child) = reference_entry(item, b"First") {
            walk_siblings(doc, first_child, level + 1, page_numbers, visited, entries);
        }

        current = reference_entry(item, b"Next");
    }
}

/// Resolve an outline item's destination to a 1-based page number.
///
/// Checks `/Dest` first, then `/A` actions with subtype `GoTo`.
fn resolve_destination(
    doc: &Document,
    item: &Dictionary,
    page_numbers: &BTreeMap<ObjectId, u32>,
) -> Option<u32> {
    if let Ok(dest) = item.get(b"Dest") {
        return dest_to_page(doc, dest, page_numbers);
    }

    let action = resolve(doc, item.get(b"A").ok()?).as_dict().ok()?;
    let is_goto = action
        .get(b"S")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|name| name == b"GoTo");
    if !is_goto {
        return None;
    }

    dest_to_page(doc, action.get(b"D").ok()?, page_numbers)
}

/// Resolve a destination object. Named destinations are looked up once;
/// whatever they map to must then be an explicit destination.
fn dest_to_page(
    doc: &Document,
    dest: &Object,
    page_numbers: &BTreeMap<ObjectId, u32>,
) -> Option<u32> {
    let explicit = match resolve(doc, dest) {
        Object::Name(name) => resolve(doc, lookup_named_dest(doc, name)?),
        Object::String(name, _) => resolve(doc, lookup_named_dest(doc, name)?),
        other => other,
    };

    let array = match explicit {
        Object::Array(arr) => arr,
        Object::Dictionary(dict) => match resolve(doc, dict.get(b"D").ok()?) {
            Object::Array(arr) => arr,
            _ => return None,
        },
        _ => return None,
    };

    let page_id = array.first()?.as_reference().ok()?;
    page_numbers.get(&page_id).copied()
}

/// Find a named destination in the catalog's `/Dests` dictionary (PDF 1.1
/// style) or the `/Names` -> `/Dests` name tree.
fn lookup_named_dest<'a>(doc: &'a Document, name: &[u8]) -> Option<&'a Object> {
    let catalog = doc.catalog().ok()?;

    if let Some(dests) = catalog
        .get(b"Dests")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
    {
        if let Ok(found) = dests.get(name) {
            return Some(found);
        }
    }

    let names = catalog
        .get(b"Names")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())?;
    let tree_root = names
        .get(b"Dests")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())?;

    lookup_name_tree(doc, tree_root, name, 0)
}

/// Walk a name-tree node: leaves carry a flat `[key value ...]` array under
/// `/Names`, intermediate nodes a `/Kids` array.
fn lookup_name_tree<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    name: &[u8],
    depth: u32,
) -> Option<&'a Object> {
    if depth > MAX_NAME_TREE_DEPTH {
        return None;
    }

    if let Ok(names) = node.get(b"Names") {
        if let Object::Array(pairs) = resolve(doc, names) {
            for pair in pairs.chunks(2) {
                if let [key, value] = pair {
                    if let Object::String(key_bytes, _) = resolve(doc, key) {
                        if key_bytes.as_slice() == name {
                            return Some(value);
                        }
                    }
                }
            }
        }
    }

    if let Ok(kids) = node.get(b"Kids") {
        if let Object::Array(kids) = resolve(doc, kids) {
            for kid in kids {
                if let Ok(kid_dict) = resolve(doc, kid).as_dict() {
                    if let Some(found) = lookup_name_tree(doc, kid_dict, name, depth + 1) {
                        return Some(found);
                    }
                }
            }
        }
    }

    None
}
