//! Line reconstruction from PDF content streams.
//!
//! A content stream positions glyph runs; it knows nothing about lines. To
//! get something a title heuristic can look at, this module replays the
//! text-state operators (`BT`, `Tf`, `Tm`, `Td`, `TJ` and friends) into
//! positioned [`TextSpan`]s, then clusters spans that share a baseline into
//! [`TextLine`]s carrying the font size and weight of their runs.

use std::collections::BTreeMap;

use super::access::{
    decode_text_bytes, operand_number, FontInfo, Operand, PageAccess, PageId, StreamOp,
};
use crate::PdfError;

/// Spans whose baselines differ by no more than this many text-space units
/// land on the same line.
const BASELINE_TOLERANCE: f32 = 1.0;

/// Average glyph width as a fraction of font size. lopdf exposes no glyph
/// metrics, so width estimates and word-break decisions both lean on this.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// Horizontal gap between merged spans that reads as a word break.
const WORD_BREAK_GAP: f32 = 1.5;

/// Two font sizes closer than this count as the same style.
const STYLE_SIZE_SLACK: f32 = 0.5;

/// A run of text shown at one position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Resolved BaseFont name (e.g. `"Helvetica-Bold"`).
    pub font_name: String,
    /// Font size after the text matrix scale.
    pub font_size: f32,
    pub is_bold: bool,
    pub is_italic: bool,
    pub x: f32,
    pub y: f32,
    /// Estimated render width.
    pub width: f32,
}

/// Spans sharing a baseline, ordered left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub y: f32,
}

impl TextLine {
    /// All span texts joined with single spaces.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&span.text);
        }
        out
    }

    /// The font size covering the most characters, bucketed to hundredths
    /// to absorb float noise. Ties resolve to the larger size.
    pub fn dominant_size(&self) -> f32 {
        let mut weights: BTreeMap<i64, usize> = BTreeMap::new();
        for span in &self.spans {
            let bucket = (span.font_size * 100.0).round() as i64;
            *weights.entry(bucket).or_default() += span.text.chars().count();
        }
        weights
            .into_iter()
            .max_by_key(|&(bucket, chars)| (chars, bucket))
            .map_or(0.0, |(bucket, _)| bucket as f32 / 100.0)
    }
}

/// Whether a character comes from a script written without spaces between
/// words. Span merging must not invent separators inside such text.
fn is_spaceless_char(c: char) -> bool {
    matches!(c,
        // Han, kana and their extensions.
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{20000}'..='\u{2A6DF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{31F0}'..='\u{31FF}'
        // Hangul.
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{1100}'..='\u{11FF}'
        | '\u{3130}'..='\u{318F}'
        // CJK punctuation and full-width forms.
        | '\u{3000}'..='\u{303F}'
        | '\u{FF00}'..='\u{FFEF}'
        // Thai, Lao, Myanmar, Khmer, Tibetan.
        | '\u{0E00}'..='\u{0E7F}'
        | '\u{0E80}'..='\u{0EFF}'
        | '\u{1000}'..='\u{109F}'
        | '\u{1780}'..='\u{17FF}'
        | '\u{0F00}'..='\u{0FFF}'
    )
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// The font currently selected by `Tf`.
struct ActiveFont {
    /// Resource-dictionary key (e.g. `b"F1"`).
    key: Vec<u8>,
    /// Resolved BaseFont name, or the raw key when unresolved.
    name: String,
    size: f32,
    bold: bool,
    italic: bool,
}

/// Text-object state replayed from the stream: the text and line matrices
/// plus the spacing parameters that shift glyph positions.
struct Cursor {
    text: [f32; 6],
    line: [f32; 6],
    font: ActiveFont,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    rise: f32,
    leading: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            text: IDENTITY,
            line: IDENTITY,
            font: ActiveFont {
                key: Vec::new(),
                name: String::new(),
                size: 0.0,
                bold: false,
                italic: false,
            },
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            rise: 0.0,
            leading: 0.0,
        }
    }

    fn begin_text(&mut self) {
        self.text = IDENTITY;
        self.line = IDENTITY;
    }

    fn origin(&self) -> (f32, f32) {
        (self.text[4], self.text[5])
    }

    /// Font size as rendered, after the text matrix scale.
    fn rendered_size(&self) -> f32 {
        let [_, b, _, d, _, _] = self.text;
        (self.font.size * (b * b + d * d).sqrt()).abs()
    }

    fn set_matrix(&mut self, m: [f32; 6]) {
        self.text = m;
        self.line = m;
    }

    /// `Td`: offset the line matrix, then restart the text matrix there.
    fn next_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line;
        self.line[4] = tx * a + ty * c + e;
        self.line[5] = tx * b + ty * d + f;
        self.text = self.line;
    }

    /// `T*`: move down by the current leading.
    fn line_feed(&mut self) {
        self.next_line(0.0, -self.leading);
    }

    /// Advance the pen `dx` text-space units along the baseline.
    fn shift(&mut self, dx: f32) {
        self.text[4] += dx * self.text[0];
        self.text[5] += dx * self.text[1];
    }

    /// Advance past shown text using the width heuristic plus character and
    /// word spacing.
    fn advance_past(&mut self, text: &str) {
        let mut dx = 0.0;
        for c in text.chars() {
            dx += self.font.size * GLYPH_WIDTH_RATIO + self.char_spacing;
            if c == ' ' {
                dx += self.word_spacing;
            }
        }
        self.shift(dx * self.horizontal_scale);
    }

    fn select_font(&mut self, key: Vec<u8>, base_font: &str, size: f32) {
        let upper = base_font.to_uppercase();
        self.font = ActiveFont {
            key,
            name: base_font.to_string(),
            size,
            bold: upper.contains("BOLD"),
            italic: upper.contains("ITALIC") || upper.contains("OBLIQUE"),
        };
    }
}

/// Estimated render width of `text`. Real widths need per-glyph metrics;
/// this flat ratio is enough to tell kerning from word breaks.
fn approx_width(text: &str, size: f32, horizontal_scale: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO * horizontal_scale
}

fn first_number(args: &[Operand]) -> Option<f32> {
    args.first().and_then(operand_number)
}

fn pair_args(args: &[Operand]) -> Option<(f32, f32)> {
    Some((first_number(args)?, args.get(1).and_then(operand_number)?))
}

fn matrix_args(args: &[Operand]) -> Option<[f32; 6]> {
    let nums: Vec<f32> = args.iter().filter_map(operand_number).collect();
    nums.try_into().ok()
}

fn set_scalar(slot: &mut f32, args: &[Operand]) {
    if let Some(value) = first_number(args) {
        *slot = value;
    }
}

/// Replay a page's content stream and return its text spans in stream order.
pub fn page_text_spans<B: PageAccess>(doc: &B, page: PageId) -> Result<Vec<TextSpan>, PdfError> {
    let data = doc.content(page)?;
    let ops = doc.parse_content(&data)?;
    // A page with an unreadable font dictionary can still yield text; spans
    // then carry raw resource keys as font names.
    let fonts = doc.fonts(page).unwrap_or_default();

    let mut collector = SpanCollector {
        doc,
        page,
        fonts,
        cursor: Cursor::new(),
        spans: Vec::new(),
    };
    for op in &ops {
        collector.apply(op);
    }
    Ok(collector.spans)
}

struct SpanCollector<'a, B: PageAccess> {
    doc: &'a B,
    page: PageId,
    fonts: Vec<FontInfo>,
    cursor: Cursor,
    spans: Vec<TextSpan>,
}

impl<B: PageAccess> SpanCollector<'_, B> {
    fn apply(&mut self, op: &StreamOp) {
        let args = &op.operands;
        match op.operator.as_str() {
            "BT" => self.cursor.begin_text(),
            "Tf" => self.select_font(args),
            "Tm" => {
                if let Some(m) = matrix_args(args) {
                    self.cursor.set_matrix(m);
                }
            }
            "Td" => {
                if let Some((tx, ty)) = pair_args(args) {
                    self.cursor.next_line(tx, ty);
                }
            }
            "TD" => {
                if let Some((tx, ty)) = pair_args(args) {
                    self.cursor.leading = -ty;
                    self.cursor.next_line(tx, ty);
                }
            }
            "T*" => self.cursor.line_feed(),
            "TL" => set_scalar(&mut self.cursor.leading, args),
            "Tc" => set_scalar(&mut self.cursor.char_spacing, args),
            "Tw" => set_scalar(&mut self.cursor.word_spacing, args),
            "Ts" => set_scalar(&mut self.cursor.rise, args),
            "Tz" => {
                if let Some(percent) = first_number(args) {
                    self.cursor.horizontal_scale = percent / 100.0;
                }
            }
            "Tj" => self.show(args.first()),
            "'" => {
                self.cursor.line_feed();
                self.show(args.first());
            }
            "\"" => {
                if let Some(spacing) = first_number(args) {
                    self.cursor.word_spacing = spacing;
                }
                if let Some(spacing) = args.get(1).and_then(operand_number) {
                    self.cursor.char_spacing = spacing;
                }
                self.cursor.line_feed();
                self.show(args.get(2));
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = args.first() {
                    self.show_with_adjustments(items);
                }
            }
            _ => {}
        }
    }

    fn select_font(&mut self, args: &[Operand]) {
        let key = match args.first() {
            Some(Operand::Name(name)) => name.clone(),
            Some(Operand::Str(bytes)) => bytes.clone(),
            _ => return,
        };
        let size = args.get(1).and_then(operand_number).unwrap_or(0.0);

        match self.fonts.iter().find(|font| font.name == key) {
            Some(info) => {
                let base = info.base_font.clone().unwrap_or_default();
                self.cursor.select_font(key, &base, size);
            }
            None => {
                // Not in the resource dictionary; the raw key is still worth
                // matching style keywords against.
                let fallback = String::from_utf8_lossy(&key).into_owned();
                self.cursor.select_font(key, &fallback, size);
            }
        }
    }

    /// Decode a shown string through the current font's encoding.
    fn operand_text(&self, operand: &Operand) -> String {
        let Operand::Str(bytes) = operand else {
            return String::new();
        };
        if self.cursor.font.key.is_empty() {
            decode_text_bytes(bytes)
        } else {
            self.doc.decode_string(self.page, &self.cursor.font.key, bytes)
        }
    }

    fn show(&mut self, operand: Option<&Operand>) {
        let Some(operand) = operand else {
            return;
        };
        let text = self.operand_text(operand);
        if text.is_empty() {
            return;
        }
        let (x, _) = self.cursor.origin();
        self.push_span(&text, x);
        self.cursor.advance_past(&text);
    }

    /// `TJ` arrays interleave string fragments with kerning adjustments in
    /// negative thousandths of the font size. Fragments accumulate into one
    /// span; an adjustment wide enough to read as a word break inserts a
    /// space instead of splitting the span.
    fn show_with_adjustments(&mut self, items: &[Operand]) {
        let mut run = String::new();
        let mut run_x = 0.0;

        for item in items {
            match item {
                Operand::Str(_) => {
                    let fragment = self.operand_text(item);
                    if fragment.is_empty() {
                        continue;
                    }
                    if run.is_empty() {
                        run_x = self.cursor.origin().0;
                    }
                    run.push_str(&fragment);
                    self.cursor.advance_past(&fragment);
                }
                Operand::Integer(_) | Operand::Real(_) => {
                    let adjustment = operand_number(item).unwrap_or(0.0);
                    let dx = -adjustment / 1000.0
                        * self.cursor.font.size
                        * self.cursor.horizontal_scale;
                    if dx > self.word_break_threshold() && !run.is_empty() && !run.ends_with(' ') {
                        run.push(' ');
                    }
                    self.cursor.shift(dx);
                }
                _ => {}
            }
        }

        let text = run.trim_end();
        if !text.is_empty() {
            self.push_span(text, run_x);
        }
    }

    fn word_break_threshold(&self) -> f32 {
        self.cursor.font.size * GLYPH_WIDTH_RATIO * self.cursor.horizontal_scale * 0.3
    }

    fn push_span(&mut self, text: &str, x: f32) {
        let size = self.cursor.rendered_size();
        let (_, y) = self.cursor.origin();
        self.spans.push(TextSpan {
            text: text.to_string(),
            font_name: self.cursor.font.name.clone(),
            font_size: size,
            is_bold: self.cursor.font.bold,
            is_italic: self.cursor.font.italic,
            x,
            y: y + self.cursor.rise,
            width: approx_width(text, size, self.cursor.horizontal_scale),
        });
    }
}

/// Cluster spans into lines by baseline and return them in reading order.
///
/// Spans sort top to bottom (descending y, since PDF y grows upward) and
/// then left to right; a span within [`BASELINE_TOLERANCE`] of the line's
/// first span joins that line.
pub fn assemble_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<TextLine> = Vec::new();
    let mut cluster: Vec<TextSpan> = Vec::new();

    for span in spans {
        let anchored = cluster
            .first()
            .is_some_and(|anchor| (span.y - anchor.y).abs() <= BASELINE_TOLERANCE);
        if !cluster.is_empty() && !anchored {
            lines.push(merge_line(std::mem::take(&mut cluster)));
        }
        cluster.push(span);
    }
    if !cluster.is_empty() {
        lines.push(merge_line(cluster));
    }

    lines
}

/// Merge one baseline cluster left to right: adjacent same-style spans fuse
/// (with a space when the gap is word-sized), anything else stays its own
/// span.
fn merge_line(mut cluster: Vec<TextSpan>) -> TextLine {
    cluster.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut spans: Vec<TextSpan> = Vec::new();
    for span in cluster {
        let Some(prev) = spans.last_mut() else {
            spans.push(span);
            continue;
        };

        let gap = span.x - (prev.x + prev.width);
        let joins_word = gap < WORD_BREAK_GAP && gap > -prev.font_size;
        let joins_with_space = gap >= WORD_BREAK_GAP && gap < prev.font_size * 2.0;

        if !same_style(prev, &span) || !(joins_word || joins_with_space) {
            spans.push(span);
            continue;
        }

        if joins_with_space && !spaceless_boundary(&prev.text, &span.text) {
            prev.text.push(' ');
        }
        prev.text.push_str(&span.text);
        prev.width = (span.x + span.width) - prev.x;
    }

    let y = spans.first().map_or(0.0, |s| s.y);
    TextLine { spans, y }
}

fn same_style(a: &TextSpan, b: &TextSpan) -> bool {
    a.font_name == b.font_name
        && a.is_bold == b.is_bold
        && a.is_italic == b.is_italic
        && (a.font_size - b.font_size).abs() < STYLE_SIZE_SLACK
}

fn spaceless_boundary(left: &str, right: &str) -> bool {
    match (left.chars().next_back(), right.chars().next()) {
        (Some(a), Some(b)) => is_spaceless_char(a) && is_spaceless_char(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageId = (1, 0);

    struct ScriptedPage {
        fonts: Vec<FontInfo>,
        ops: Vec<StreamOp>,
    }

    impl PageAccess for ScriptedPage {
        fn page_map(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, PAGE)])
        }

        fn fonts(&self, _page: PageId) -> Result<Vec<FontInfo>, PdfError> {
            Ok(self.fonts.clone())
        }

        fn content(&self, _page: PageId) -> Result<Vec<u8>, PdfError> {
            Ok(Vec::new())
        }

        fn parse_content(&self, _data: &[u8]) -> Result<Vec<StreamOp>, PdfError> {
            Ok(self.ops.clone())
        }

        fn decode_string(&self, _page: PageId, _font_name: &[u8], bytes: &[u8]) -> String {
            decode_text_bytes(bytes)
        }
    }

    fn run_ops(fonts: Vec<FontInfo>, ops: Vec<StreamOp>) -> Vec<TextSpan> {
        let page = ScriptedPage { fonts, ops };
        page_text_spans(&page, PAGE).unwrap()
    }

    fn font(key: &[u8], base: &str) -> FontInfo {
        FontInfo {
            name: key.to_vec(),
            base_font: Some(base.to_string()),
            subtype: Some("Type1".to_string()),
            encoding: None,
        }
    }

    fn op(operator: &str, operands: Vec<Operand>) -> StreamOp {
        StreamOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn begin() -> StreamOp {
        op("BT", vec![])
    }

    fn end() -> StreamOp {
        op("ET", vec![])
    }

    fn select(key: &[u8], size: f32) -> StreamOp {
        op("Tf", vec![Operand::Name(key.to_vec()), Operand::Real(size)])
    }

    fn matrix(values: [f32; 6]) -> StreamOp {
        op("Tm", values.iter().map(|&v| Operand::Real(v)).collect())
    }

    fn offset(tx: f32, ty: f32) -> StreamOp {
        op("Td", vec![Operand::Real(tx), Operand::Real(ty)])
    }

    fn show(text: &str) -> StreamOp {
        op("Tj", vec![Operand::Str(text.as_bytes().to_vec())])
    }

    fn show_adjusted(items: Vec<Operand>) -> StreamOp {
        op("TJ", vec![Operand::Array(items)])
    }

    fn span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            font_name: "Body".to_string(),
            font_size: size,
            is_bold: false,
            is_italic: false,
            x,
            y,
            width: text.chars().count() as f32 * size * 0.5,
        }
    }

    fn heading_span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan {
            font_name: "Body-Bold".to_string(),
            is_bold: true,
            ..span(text, x, y, size)
        }
    }

    // ===== page_text_spans =====

    #[test]
    fn simple_show_text_becomes_one_span() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 12.0),
                matrix([1.0, 0.0, 0.0, 1.0, 72.0, 700.0]),
                show("Hello"),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Hello");
        assert!((spans[0].x - 72.0).abs() < 0.01);
        assert!((spans[0].y - 700.0).abs() < 0.01);
        assert!((spans[0].font_size - 12.0).abs() < 0.01);
        assert_eq!(spans[0].font_name, "Helvetica");
        assert!(!spans[0].is_bold);
    }

    #[test]
    fn bold_comes_from_base_font_name() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica"), font(b"F2", "Helvetica-Bold")],
            vec![
                begin(),
                select(b"F2", 18.0),
                matrix([1.0, 0.0, 0.0, 1.0, 72.0, 700.0]),
                show("Chapter 1"),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert!(spans[0].is_bold);
        assert!(!spans[0].is_italic);
        assert_eq!(spans[0].font_name, "Helvetica-Bold");
    }

    #[test]
    fn unresolved_font_key_still_names_the_span() {
        let spans = run_ops(
            vec![],
            vec![begin(), select(b"MyBoldFont", 14.0), show("text"), end()],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].font_name, "MyBoldFont");
        // Style keywords still match against the fallback name.
        assert!(spans[0].is_bold);
    }

    #[test]
    fn td_moves_to_next_line_origin() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 10.0),
                offset(72.0, 700.0),
                show("first"),
                offset(0.0, -14.0),
                show("second"),
                end(),
            ],
        );

        assert_eq!(spans.len(), 2);
        assert!((spans[0].y - 700.0).abs() < 0.01);
        assert!((spans[1].y - 686.0).abs() < 0.01);
        // Td offsets the line start, not the pen position after "first".
        assert!((spans[1].x - 72.0).abs() < 0.01);
    }

    #[test]
    fn t_star_descends_by_leading() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 10.0),
                op("TL", vec![Operand::Real(12.0)]),
                offset(72.0, 700.0),
                show("a"),
                op("T*", vec![]),
                show("b"),
                end(),
            ],
        );

        assert_eq!(spans.len(), 2);
        assert!((spans[1].y - 688.0).abs() < 0.01);
    }

    #[test]
    fn text_matrix_scale_grows_rendered_size() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 10.0),
                matrix([2.0, 0.0, 0.0, 2.0, 72.0, 700.0]),
                show("big"),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert!((spans[0].font_size - 20.0).abs() < 0.01);
    }

    #[test]
    fn kerning_adjustments_do_not_split_words() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 12.0),
                matrix([1.0, 0.0, 0.0, 1.0, 72.0, 700.0]),
                show_adjusted(vec![
                    Operand::Str(b"Cha".to_vec()),
                    Operand::Integer(-20),
                    Operand::Str(b"pter".to_vec()),
                ]),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Chapter");
    }

    #[test]
    fn wide_tj_adjustment_reads_as_space() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 12.0),
                matrix([1.0, 0.0, 0.0, 1.0, 72.0, 700.0]),
                show_adjusted(vec![
                    Operand::Str(b"Chapter".to_vec()),
                    Operand::Integer(-500),
                    Operand::Str(b"1".to_vec()),
                ]),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Chapter 1");
    }

    #[test]
    fn apostrophe_operator_feeds_line_then_shows() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 10.0),
                op("TL", vec![Operand::Real(14.0)]),
                offset(72.0, 700.0),
                op("'", vec![Operand::Str(b"next line".to_vec())]),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "next line");
        assert!((spans[0].y - 686.0).abs() < 0.01);
    }

    #[test]
    fn double_quote_sets_spacing_then_shows() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 10.0),
                op("TL", vec![Operand::Real(12.0)]),
                offset(72.0, 700.0),
                op(
                    "\"",
                    vec![
                        Operand::Real(2.0),
                        Operand::Real(0.5),
                        Operand::Str(b"spaced".to_vec()),
                    ],
                ),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "spaced");
        assert!((spans[0].y - 688.0).abs() < 0.01);
    }

    #[test]
    fn empty_show_strings_yield_no_spans() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![begin(), select(b"F1", 12.0), show(""), end()],
        );

        assert!(spans.is_empty());
    }

    #[test]
    fn text_rise_raises_baseline() {
        let spans = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 10.0),
                matrix([1.0, 0.0, 0.0, 1.0, 72.0, 500.0]),
                op("Ts", vec![Operand::Real(3.0)]),
                show("super"),
                end(),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert!((spans[0].y - 503.0).abs() < 0.01);
    }

    #[test]
    fn horizontal_scaling_widens_spans() {
        let narrow = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![begin(), select(b"F1", 10.0), show("wide"), end()],
        );
        let wide = run_ops(
            vec![font(b"F1", "Helvetica")],
            vec![
                begin(),
                select(b"F1", 10.0),
                op("Tz", vec![Operand::Real(200.0)]),
                show("wide"),
                end(),
            ],
        );

        assert!((wide[0].width - narrow[0].width * 2.0).abs() < 0.01);
    }

    // ===== assemble_lines =====

    #[test]
    fn same_baseline_spans_share_a_line() {
        let lines = assemble_lines(vec![
            span("world", 120.0, 700.0, 12.0),
            span("Hello", 72.0, 700.0, 12.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Hello world");
    }

    #[test]
    fn distinct_baselines_split_lines() {
        let lines = assemble_lines(vec![
            span("bottom", 72.0, 650.0, 12.0),
            span("top", 72.0, 700.0, 12.0),
        ]);

        assert_eq!(lines.len(), 2);
        // Reading order: top first.
        assert_eq!(lines[0].text(), "top");
        assert_eq!(lines[1].text(), "bottom");
    }

    #[test]
    fn slight_jitter_stays_on_one_line() {
        let lines = assemble_lines(vec![
            span("a", 72.0, 700.0, 12.0),
            span("b", 100.0, 700.5, 12.0),
        ]);

        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn no_spans_no_lines() {
        assert!(assemble_lines(Vec::new()).is_empty());
    }

    #[test]
    fn touching_spans_fuse_without_space() {
        // "Chap" spans 72..96; "ter" starts right at 96.
        let lines = assemble_lines(vec![
            span("Chap", 72.0, 700.0, 12.0),
            span("ter", 96.0, 700.0, 12.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].text, "Chapter");
    }

    #[test]
    fn word_sized_gap_becomes_space() {
        // "Chapter" ends at 114; a 4-unit gap is a word break at 12pt.
        let lines = assemble_lines(vec![
            span("Chapter", 72.0, 700.0, 12.0),
            span("One", 118.0, 700.0, 12.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].text, "Chapter One");
    }

    #[test]
    fn style_changes_keep_spans_apart() {
        let lines = assemble_lines(vec![
            heading_span("Chapter 1", 72.0, 700.0, 18.0),
            span("introduction", 160.0, 700.0, 12.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 2);
        assert!(lines[0].spans[0].is_bold);
        assert!(!lines[0].spans[1].is_bold);
    }

    #[test]
    fn cjk_neighbors_fuse_without_space() {
        let lines = assemble_lines(vec![
            span("\u{65E5}\u{672C}", 72.0, 700.0, 12.0),
            span("\u{8A9E}", 86.0, 700.0, 12.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].text, "\u{65E5}\u{672C}\u{8A9E}");
    }

    #[test]
    fn dominant_size_weighted_by_characters() {
        let lines = assemble_lines(vec![
            span("X", 72.0, 700.0, 24.0),
            span("a much longer run of body text", 100.0, 700.0, 12.0),
        ]);

        assert_eq!(lines.len(), 1);
        assert!((lines[0].dominant_size() - 12.0).abs() < 0.01);
    }

    #[test]
    fn line_text_joins_with_single_spaces() {
        let line = TextLine {
            spans: vec![
                heading_span("Chapter 3", 72.0, 700.0, 18.0),
                span("The Voyage", 180.0, 700.0, 18.0),
            ],
            y: 700.0,
        };
        assert_eq!(line.text(), "Chapter 3 The Voyage");
    }

    // ===== spaceless scripts =====

    #[test]
    fn spaceless_scripts_recognized() {
        assert!(is_spaceless_char('\u{65E5}')); // CJK
        assert!(is_spaceless_char('\u{3042}')); // Hiragana
        assert!(is_spaceless_char('\u{AC00}')); // Hangul
        assert!(is_spaceless_char('\u{0E01}')); // Thai
        assert!(!is_spaceless_char('a'));
        assert!(!is_spaceless_char('1'));
        assert!(!is_spaceless_char(' '));
    }
}
