use std::collections::BTreeMap;

use lopdf::{self, content::Content};
use unicode_normalization::UnicodeNormalization;

use crate::PdfError;

/// Identifies a page object; an alias of `lopdf::ObjectId`.
pub type PageId = lopdf::ObjectId;

// ---------------------------------------------------------------------------
// Page access seam
// ---------------------------------------------------------------------------

/// Read-only access to the pieces of a document that text reconstruction
/// needs: the page list, per-page fonts, and content streams.
///
/// Layout and detection never touch `lopdf` directly; they consume pages
/// through this trait, which keeps them testable against scripted fixtures.
pub trait PageAccess {
    /// Map of 1-based page numbers to page identifiers.
    fn page_map(&self) -> BTreeMap<u32, PageId>;

    /// Fonts referenced by a page's resource dictionary.
    fn fonts(&self, page: PageId) -> Result<Vec<FontInfo>, PdfError>;

    /// The page's decompressed content stream bytes.
    fn content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    /// Parse content stream bytes into operations.
    fn parse_content(&self, data: &[u8]) -> Result<Vec<StreamOp>, PdfError>;

    /// Decode string bytes shown by a text operator, honoring any encoding
    /// declared for the named font on the given page.
    fn decode_string(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Font attributes pulled from a page's resource dictionary.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// Resource key the content stream selects this font by (e.g. `b"F1"`).
    pub name: Vec<u8>,
    pub base_font: Option<String>,
    pub subtype: Option<String>,
    pub encoding: Option<String>,
}

/// One content-stream operation.
#[derive(Debug, Clone)]
pub struct StreamOp {
    pub operator: String,
    pub operands: Vec<Operand>,
}

/// A direct object appearing as a content-stream operand.
///
/// Content streams carry only direct objects, so there is no reference
/// variant; an indirect reference decodes to `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Dict(Vec<(Vec<u8>, Operand)>),
}

/// Numeric value of an operand, if it has one.
pub fn operand_number(operand: &Operand) -> Option<f32> {
    match operand {
        Operand::Integer(value) => Some(*value as f32),
        Operand::Real(value) => Some(*value),
        _ => None,
    }
}

/// Parse raw content-stream bytes into operations.
pub fn parse_content_ops(data: &[u8]) -> Result<Vec<StreamOp>, PdfError> {
    let content = Content::decode(data)
        .map_err(|e| PdfError::Parse(format!("malformed content stream: {e}")))?;

    Ok(content
        .operations
        .into_iter()
        .map(|op| StreamOp {
            operator: op.operator,
            operands: op.operands.iter().map(convert_operand).collect(),
        })
        .collect())
}

fn convert_operand(object: &lopdf::Object) -> Operand {
    use lopdf::Object;

    match object {
        Object::Null => Operand::Null,
        Object::Boolean(value) => Operand::Bool(*value),
        Object::Integer(value) => Operand::Integer(*value),
        Object::Real(value) => Operand::Real(*value),
        Object::Name(name) => Operand::Name(name.clone()),
        Object::String(bytes, _) => Operand::Str(bytes.clone()),
        Object::Array(items) => Operand::Array(items.iter().map(convert_operand).collect()),
        Object::Dictionary(dict) => Operand::Dict(convert_dict(dict)),
        Object::Stream(stream) => Operand::Dict(convert_dict(&stream.dict)),
        Object::Reference(_) => Operand::Null,
    }
}

fn convert_dict(dict: &lopdf::Dictionary) -> Vec<(Vec<u8>, Operand)> {
    dict.iter()
        .map(|(key, value)| (key.clone(), convert_operand(value)))
        .collect()
}

/// Decode raw PDF string bytes outside any font context.
///
/// Tries UTF-16BE behind a byte-order mark, then UTF-8, then falls back to
/// Latin-1. The first two results are NFC-normalized so decomposed accents
/// compare (and sanitize into filenames) like their composed forms.
pub fn decode_text_bytes(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units).nfc().collect();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.nfc().collect();
    }

    // Latin-1: each byte is the code point of the same value, and single
    // code points below U+0100 are already composed.
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// lopdf-backed implementation
// ---------------------------------------------------------------------------

pub struct LopdfDocument {
    doc: lopdf::Document,
}

impl LopdfDocument {
    /// Parse a PDF from an in-memory byte slice. Encrypted documents are
    /// rejected up front.
    pub fn load(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }
        Ok(Self { doc })
    }

    /// The wrapped `lopdf::Document`.
    pub fn inner(&self) -> &lopdf::Document {
        &self.doc
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Decoded string entries of the trailer's Info dictionary, keyed by
    /// `"Title"`, `"Author"`, `"Creator"`, `"Producer"` and `"Subject"`.
    /// Entries absent from the document are absent from the map.
    pub fn info_strings(&self) -> BTreeMap<String, String> {
        let mut meta = BTreeMap::new();
        let Some(info) = self.info_dict() else {
            return meta;
        };

        for key in [b"Title" as &[u8], b"Author", b"Creator", b"Producer", b"Subject"] {
            let Ok(value) = info.get(key) else {
                continue;
            };
            let decoded = match value {
                lopdf::Object::String(bytes, _) => decode_text_bytes(bytes),
                lopdf::Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
                _ => continue,
            };
            meta.insert(String::from_utf8_lossy(key).into_owned(), decoded);
        }

        meta
    }

    fn info_dict(&self) -> Option<&lopdf::Dictionary> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        match info {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?.as_dict().ok(),
            lopdf::Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Encoding name declared for a font on a page, when the Encoding entry
    /// is a name (custom encoding dictionaries yield `None`).
    fn encoding_of(&self, page: PageId, font_name: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let dict = fonts.get(font_name)?;
        name_entry(dict, b"Encoding")
    }
}

fn name_entry(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(lopdf::Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

impl PageAccess for LopdfDocument {
    fn page_map(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn fonts(&self, page: PageId) -> Result<Vec<FontInfo>, PdfError> {
        let fonts = self.doc.get_page_fonts(page).map_err(|e| {
            PdfError::Parse(format!("cannot read fonts for page object {page:?}: {e}"))
        })?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| FontInfo {
                name: name.clone(),
                base_font: name_entry(dict, b"BaseFont"),
                subtype: name_entry(dict, b"Subtype"),
                encoding: name_entry(dict, b"Encoding"),
            })
            .collect())
    }

    fn content(&self, page: PageId) -> Result<Vec<u8>, PdfError> {
        self.doc.get_page_content(page).map_err(|e| {
            PdfError::Parse(format!("cannot read content for page object {page:?}: {e}"))
        })
    }

    fn parse_content(&self, data: &[u8]) -> Result<Vec<StreamOp>, PdfError> {
        parse_content_ops(data)
    }

    fn decode_string(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        // Identity-H/V CID fonts show 2-byte codes; try UTF-16BE first and
        // keep it only when it yields something readable.
        let identity = self
            .encoding_of(page, font_name)
            .is_some_and(|encoding| encoding.contains("Identity"));
        if identity && bytes.len() >= 2 && bytes.len().is_multiple_of(2) {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&units);
            if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded.nfc().collect();
            }
        }

        decode_text_bytes(bytes)
    }
}
