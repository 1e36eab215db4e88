//! Content-stream walker that reduces raw PDF operations to `PageOperator`s.
//!
//! Form XObjects painted with `Do` are expanded in place, so a photo or a
//! filled rectangle wrapped in a form still shows up on the page that uses it.
//!
//! Inline images (`BI ... ID <data> EI`) are cut out before decoding. The
//! lopdf content parser stops at the binary image data, so everything after
//! the first inline image would otherwise be lost.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use tracing::debug;

use crate::models::page::{FontUsage, OperatorKind, PageOperator, PageSignals};
use crate::pdf::fonts::{get_dict, resolve, resolve_font_name};

const MAX_FORM_DEPTH: usize = 8;

/// Accumulates operators and font names for one page.
pub struct OperatorWalker<'a> {
    doc: &'a Document,
    operators: Vec<PageOperator>,
    fonts: FontUsage,
}

impl<'a> OperatorWalker<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            operators: Vec::new(),
            fonts: FontUsage::default(),
        }
    }

    /// Decodes `content` and appends its operators, resolving names against `resources`.
    pub fn walk(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        depth: usize,
    ) -> Result<(), lopdf::Error> {
        for segment in split_inline_images(content) {
            match segment {
                Segment::Operators(bytes) => self.walk_operators(bytes, resources, depth)?,
                Segment::InlineImage => {
                    self.operators.push(PageOperator::bare(OperatorKind::Other))
                }
            }
        }
        Ok(())
    }

    fn walk_operators(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        depth: usize,
    ) -> Result<(), lopdf::Error> {
        if content.iter().all(|b| is_whitespace(*b)) {
            return Ok(());
        }
        let content = Content::decode(content)?;
        for op in &content.operations {
            match op.operator.as_str() {
                "Tf" => {
                    if let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) {
                        if let Some(font) = resolve_font_name(self.doc, resources, name) {
                            self.fonts.insert(font);
                        }
                    }
                    self.operators.push(classify(op));
                }
                "Do" => self.paint_xobject(op, resources, depth),
                _ => self.operators.push(classify(op)),
            }
        }
        Ok(())
    }

    pub fn finish(self) -> PageSignals {
        PageSignals {
            operators: self.operators,
            fonts: self.fonts,
        }
    }

    fn paint_xobject(&mut self, op: &Operation, resources: Option<&'a Dictionary>, depth: usize) {
        let Some(stream) = self.lookup_xobject(op, resources) else {
            self.operators.push(PageOperator::bare(OperatorKind::Other));
            return;
        };

        let subtype = stream.dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok());
        if subtype == Some(b"Image".as_slice()) {
            let kind = if is_image_mask(self.doc, &stream.dict) {
                OperatorKind::Other
            } else if is_dct_encoded(self.doc, &stream.dict) {
                OperatorKind::PaintJpeg
            } else {
                OperatorKind::PaintImage
            };
            self.operators.push(PageOperator::bare(kind));
        } else if subtype == Some(b"Form".as_slice()) && depth < MAX_FORM_DEPTH {
            let content = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let form_resources = get_dict(self.doc, &stream.dict, b"Resources").or(resources);
            if let Err(e) = self.walk(&content, form_resources, depth + 1) {
                debug!(depth, error = %e, "Skipping undecodable form XObject");
            }
        } else {
            self.operators.push(PageOperator::bare(OperatorKind::Other));
        }
    }

    fn lookup_xobject(
        &self,
        op: &Operation,
        resources: Option<&'a Dictionary>,
    ) -> Option<&'a Stream> {
        let name = op.operands.first()?.as_name().ok()?;
        let xobjects = get_dict(self.doc, resources?, b"XObject")?;
        let obj = resolve(self.doc, xobjects.get(name).ok()?);
        obj.as_stream().ok()
    }
}

/// Maps one content-stream operation to its detector-facing kind.
pub fn classify(op: &Operation) -> PageOperator {
    let args = numeric_operands(&op.operands);
    let kind = match op.operator.as_str() {
        "g" => OperatorKind::SetFillGray,
        "rg" => OperatorKind::SetFillRgb,
        "k" => OperatorKind::SetFillCmyk,
        "sc" | "scn" => match args.len() {
            1 => OperatorKind::SetFillGray,
            3 => OperatorKind::SetFillRgb,
            4 => OperatorKind::SetFillCmyk,
            _ => OperatorKind::Other,
        },
        "f" | "F" => OperatorKind::FillPath,
        "f*" => OperatorKind::EvenOddFillPath,
        "sh" => OperatorKind::ShadingFill,
        _ => OperatorKind::Other,
    };
    PageOperator::new(kind, args)
}

fn numeric_operands(operands: &[Object]) -> Vec<f64> {
    operands
        .iter()
        .filter_map(|o| match o {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(f64::from(*r)),
            _ => None,
        })
        .collect()
}

fn is_dct_encoded(doc: &Document, dict: &Dictionary) -> bool {
    match dict.get(b"Filter").ok().map(|f| resolve(doc, f)) {
        Some(Object::Name(name)) => name.as_slice() == b"DCTDecode",
        Some(Object::Array(filters)) => filters
            .iter()
            .any(|f| matches!(f, Object::Name(n) if n.as_slice() == b"DCTDecode")),
        _ => false,
    }
}

/// Stencil masks paint the current fill color through a 1-bit shape. Icons
/// drawn this way are not photos.
fn is_image_mask(doc: &Document, dict: &Dictionary) -> bool {
    dict.get(b"ImageMask")
        .ok()
        .and_then(|o| resolve(doc, o).as_bool().ok())
        .unwrap_or(false)
}

#[derive(Debug, PartialEq)]
enum Segment<'c> {
    Operators(&'c [u8]),
    InlineImage,
}

/// Splits a content stream around its inline images. An inline image with no
/// closing `EI` is left in place for the decoder.
fn split_inline_images(content: &[u8]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut string_depth = 0usize;

    while i < content.len() {
        let b = content[i];
        if string_depth > 0 {
            match b {
                b'\\' => i += 1,
                b'(' => string_depth += 1,
                b')' => string_depth -= 1,
                _ => {}
            }
            i += 1;
            continue;
        }
        match b {
            b'(' => {
                string_depth = 1;
                i += 1;
            }
            b'%' => {
                while i < content.len() && content[i] != b'\n' && content[i] != b'\r' {
                    i += 1;
                }
            }
            _ if is_token_at(content, i, b"BI") => match inline_image_end(content, i + 2) {
                Some(end) => {
                    if i > start {
                        segments.push(Segment::Operators(&content[start..i]));
                    }
                    segments.push(Segment::InlineImage);
                    start = end;
                    i = end;
                }
                None => break,
            },
            _ => i += 1,
        }
    }

    if start < content.len() {
        segments.push(Segment::Operators(&content[start..]));
    }
    segments
}

/// Offset just past the `EI` closing an inline image whose dictionary starts at `from`.
fn inline_image_end(content: &[u8], from: usize) -> Option<usize> {
    let id = (from..content.len()).find(|&j| is_token_at(content, j, b"ID"))?;
    // One whitespace byte separates `ID` from the image data.
    let data = id + 3;
    (data..content.len())
        .find(|&k| {
            content[k..].starts_with(b"EI")
                && is_whitespace(content[k - 1])
                && content.get(k + 2).map_or(true, |&n| is_whitespace(n) || is_delimiter(n))
        })
        .map(|k| k + 2)
}

fn is_token_at(content: &[u8], i: usize, token: &[u8]) -> bool {
    if !content[i..].starts_with(token) {
        return false;
    }
    let before = i == 0 || {
        let p = content[i - 1];
        is_whitespace(p) || matches!(p, b')' | b'>' | b']' | b'}')
    };
    let after = content
        .get(i + token.len())
        .map_or(true, |&n| is_whitespace(n) || is_delimiter(n));
    before && after
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'\0')
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}
