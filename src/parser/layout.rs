//! Positioned text extraction from page content streams.
//!
//! The interpreter follows the text-showing operators closely enough to place
//! every glyph: it tracks the current transformation matrix, the text and line
//! matrices, and the text state parameters that affect advances. Output spans
//! are in top-left-origin page coordinates.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Document as LopdfDocument, Encoding, Object, ObjectId, Stream};
use unicode_normalization::UnicodeNormalization;

use super::fonts::{get_number, FontMetrics};
use crate::error::{Error, Result};
use crate::model::TextSpan;

/// Share of the font size above the baseline.
const ASCENT_RATIO: f32 = 0.8;

/// Visible page area in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Lower-left x
    pub llx: f32,
    /// Lower-left y
    pub lly: f32,
    /// Upper-right x
    pub urx: f32,
    /// Upper-right y
    pub ury: f32,
}

impl PageBox {
    /// US Letter, used when a page declares no usable box.
    pub const LETTER: PageBox = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    /// Build from a `[llx lly urx ury]` array, normalising corner order.
    pub fn from_array(values: &[f32]) -> Option<Self> {
        let [a, b, c, d] = <[f32; 4]>::try_from(values).ok()?;
        let page = Self {
            llx: a.min(c),
            lly: b.min(d),
            urx: a.max(c),
            ury: b.max(d),
        };
        (page.width() > 0.0 && page.height() > 0.0).then_some(page)
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    /// Height in points.
    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    /// Map a user-space point to top-left-origin page coordinates.
    fn to_top_left(self, x: f32, y: f32) -> (f32, f32) {
        (x - self.llx, self.ury - y)
    }
}

/// Extracts positioned text spans from pages of a lopdf document.
pub struct TextExtractor<'a> {
    doc: &'a LopdfDocument,
    normalize: bool,
}

impl<'a> TextExtractor<'a> {
    /// Create a new extractor.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self {
            doc,
            normalize: true,
        }
    }

    /// Enable or disable NFKC normalization of decoded text.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Extract text spans from a page.
    pub fn extract_page_spans(&self, page_id: ObjectId, page_box: PageBox) -> Result<Vec<TextSpan>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content = self.get_page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        self.interpret(&content, &fonts, page_box)
    }

    /// Get page content stream, concatenating arrays of streams.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // A page without contents is blank
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => stream_content(s),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match stream_content(s) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::debug!("Skipping undecodable content stream {:?}: {}", r, e),
                    }
                }
            }
        }
        content
    }

    /// Run the content stream and collect one span per shown string.
    pub(crate) fn interpret(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        page_box: PageBox,
    ) -> Result<Vec<TextSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let metrics: HashMap<Vec<u8>, FontMetrics> = fonts
            .iter()
            .map(|(name, dict)| (name.clone(), FontMetrics::from_dict(self.doc, dict)))
            .collect();

        let encodings: HashMap<Vec<u8>, Encoding<'_>> = fonts
            .iter()
            .filter_map(|(name, dict)| match dict.get_font_encoding(self.doc) {
                Ok(encoding) => Some((name.clone(), encoding)),
                Err(e) => {
                    log::debug!("No usable encoding for font {:?}: {}", name, e);
                    None
                }
            })
            .collect();

        let mut run = Interpreter {
            extractor: self,
            encodings: &encodings,
            metrics: &metrics,
            fallback_metrics: FontMetrics::default(),
            page_box,
            gs: GraphicsState::default(),
            stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            spans: Vec::new(),
        };

        for op in &content.operations {
            run.apply(&op.operator, &op.operands);
        }

        Ok(run.spans)
    }

    fn decode_code(&self, code: &[u8], encoding: Option<&Encoding<'_>>) -> String {
        let decoded = encoding
            .and_then(|enc| LopdfDocument::decode_text(enc, code).ok())
            .unwrap_or_else(|| decode_code_simple(code));

        if self.normalize {
            decoded.nfkc().collect()
        } else {
            decoded
        }
    }
}

/// 2D affine matrix `[a b c d e f]`, row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let n: Vec<f32> = operands.iter().filter_map(get_number).collect();
        let [a, b, c, d, e, f] = <[f32; 6]>::try_from(n.as_slice()).ok()?;
        Some(Self { a, b, c, d, e, f })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            text: TextState::default(),
        }
    }
}

/// Mutable state for one content stream run.
struct Interpreter<'r, 'a> {
    extractor: &'r TextExtractor<'a>,
    encodings: &'r HashMap<Vec<u8>, Encoding<'r>>,
    metrics: &'r HashMap<Vec<u8>, FontMetrics>,
    fallback_metrics: FontMetrics,
    page_box: PageBox,
    gs: GraphicsState,
    stack: Vec<GraphicsState>,
    tm: Matrix,
    tlm: Matrix,
    spans: Vec<TextSpan>,
}

impl Interpreter<'_, '_> {
    fn apply(&mut self, operator: &str, operands: &[Object]) {
        let num = |i: usize| operands.get(i).and_then(get_number);

        match operator {
            "q" => self.stack.push(self.gs.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.gs = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.gs.ctm = m.multiply(&self.gs.ctm);
                }
            }
            "BT" => {
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                if let (Some(Object::Name(name)), Some(size)) = (operands.first(), num(1)) {
                    self.gs.text.font_key = name.clone();
                    self.gs.text.font_size = size;
                }
            }
            "Tc" => {
                if let Some(v) = num(0) {
                    self.gs.text.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = num(0) {
                    self.gs.text.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = num(0) {
                    self.gs.text.horizontal_scale = v / 100.0;
                }
            }
            "TL" => {
                if let Some(v) = num(0) {
                    self.gs.text.leading = v;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.gs.text.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (num(0), num(1)) {
                    self.gs.text.word_spacing = aw;
                    self.gs.text.char_spacing = ac;
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = get_number(other) {
                                    let state = &self.gs.text;
                                    let tx = -adjust / 1000.0
                                        * state.font_size
                                        * state.horizontal_scale;
                                    self.tm = Matrix::translation(tx, 0.0).multiply(&self.tm);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.gs.text.leading;
        self.move_line(0.0, -leading);
    }

    /// Show one string, advancing the text matrix glyph by glyph.
    fn show(&mut self, bytes: &[u8]) {
        let state = self.gs.text.clone();
        let metrics = self
            .metrics
            .get(&state.font_key)
            .unwrap_or(&self.fallback_metrics);
        let encoding = self.encodings.get(&state.font_key);

        let trm = self.tm.multiply(&self.gs.ctm);
        let size = (state.font_size * trm.vertical_scale()).abs();
        let x_scale = trm.horizontal_scale();
        let (mut start_x, baseline) = (trm.e, trm.f);

        let mut text = String::new();
        let mut advances: Vec<f32> = Vec::new();
        let code_len = metrics.code_len();

        for code in bytes.chunks(code_len) {
            let value = code.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            let mut tx = metrics.width(value) / 1000.0 * state.font_size + state.char_spacing;
            if code_len == 1 && value == 32 {
                tx += state.word_spacing;
            }
            tx *= state.horizontal_scale;
            self.tm = Matrix::translation(tx, 0.0).multiply(&self.tm);

            let advance = tx * x_scale;
            let decoded = self.extractor.decode_code(code, encoding);
            let count = decoded.chars().count();
            if count == 0 {
                // Unmapped code: keep its advance so later glyphs stay in place
                match advances.last_mut() {
                    Some(last) => *last += advance,
                    None => start_x += advance,
                }
                continue;
            }
            text.push_str(&decoded);
            advances.extend(std::iter::repeat(advance / count as f32).take(count));
        }

        if text.trim().is_empty() || size <= 0.0 {
            return;
        }

        let (x, y) = self.page_box.to_top_left(start_x, baseline);
        let span = TextSpan::new(text, x, y - size * ASCENT_RATIO, size)
            .with_advances(advances)
            .with_font_name(metrics.base_font.clone());
        self.spans.push(span);
    }
}

/// Stream bytes with filters applied. Streams without `/Filter` are stored
/// as-is.
fn stream_content(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| Error::PdfParse(e.to_string()))
}

/// Fallback decoding when the font has no usable encoding.
///
/// One-byte codes are read as Latin-1, two-byte codes as UTF-16BE units.
fn decode_code_simple(code: &[u8]) -> String {
    match *code {
        [b] => char::from(b).to_string(),
        [hi, lo] => char::from_u32(u32::from(u16::from_be_bytes([hi, lo])))
            .map(String::from)
            .unwrap_or_default(),
        _ => String::new(),
    }
}
