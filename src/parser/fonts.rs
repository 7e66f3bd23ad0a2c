//! Font metrics needed to position glyphs.
//!
//! Only advance widths are read: `/Widths` + `/FirstChar` for simple fonts,
//! `/DW` + `/W` from the descendant font for composite (Type0) fonts.

use std::collections::HashMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::model::DEFAULT_ADVANCE_RATIO;

/// Default glyph width for composite fonts without `/DW`.
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// Advance widths for one font, in 1/1000 text-space units.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Base font name (e.g., "Helvetica-Bold")
    pub base_font: String,
    /// Whether character codes are two bytes wide (Type0 fonts)
    pub two_byte: bool,
    first_char: u32,
    widths: Vec<f32>,
    cid_widths: HashMap<u32, f32>,
    missing_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            base_font: "Unknown".to_string(),
            two_byte: false,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            missing_width: DEFAULT_ADVANCE_RATIO * 1000.0,
        }
    }
}

impl FontMetrics {
    /// Read metrics from a font dictionary.
    pub fn from_dict(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let mut metrics = Self {
            base_font: name_entry(font, b"BaseFont").unwrap_or_else(|| "Unknown".to_string()),
            ..Self::default()
        };

        let subtype = name_entry(font, b"Subtype").unwrap_or_default();
        if subtype == "Type0" {
            metrics.two_byte = true;
            metrics.missing_width = DEFAULT_CID_WIDTH;
            if let Some(descendant) = descendant_font(doc, font) {
                if let Some(dw) = number_entry(doc, descendant, b"DW") {
                    metrics.missing_width = dw;
                }
                if let Some(w) = array_entry(doc, descendant, b"W") {
                    metrics.cid_widths = parse_cid_widths(doc, w);
                }
            }
            return metrics;
        }

        if let Some(first) = number_entry(doc, font, b"FirstChar") {
            metrics.first_char = first.max(0.0) as u32;
        }
        if let Some(widths) = array_entry(doc, font, b"Widths") {
            metrics.widths = widths
                .iter()
                .map(|w| resolve_number(doc, w).unwrap_or(0.0))
                .collect();
        }
        if let Some(missing) = font_descriptor(doc, font)
            .and_then(|desc| number_entry(doc, desc, b"MissingWidth"))
            .filter(|w| *w > 0.0)
        {
            metrics.missing_width = missing;
        }

        metrics
    }

    /// Bytes per character code.
    pub fn code_len(&self) -> usize {
        if self.two_byte {
            2
        } else {
            1
        }
    }

    /// Advance width of a character code, in 1/1000 text-space units.
    pub fn width(&self, code: u32) -> f32 {
        if self.two_byte {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .unwrap_or(self.missing_width);
        }

        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(self.missing_width)
    }
}

/// Parse a CID `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_cid_widths(doc: &LopdfDocument, items: &[Object]) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < items.len() {
        let Some(start) = resolve_number(doc, &items[i]) else {
            break;
        };
        let start = start.max(0.0) as u32;

        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = resolve_number(doc, w) {
                        widths.insert(start + offset as u32, w);
                    }
                }
                i += 2;
            }
            Some(end) => {
                let end = get_number(end).unwrap_or(start as f32).max(0.0) as u32;
                let w = items
                    .get(i + 2)
                    .and_then(|o| resolve_number(doc, o))
                    .unwrap_or(DEFAULT_CID_WIDTH);
                // Guard against absurd ranges in damaged files
                for cid in start..=end.min(start.saturating_add(0xFFFF)) {
                    widths.insert(cid, w);
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

fn descendant_font<'a>(doc: &'a LopdfDocument, font: &'a Dictionary) -> Option<&'a Dictionary> {
    let fonts = array_entry(doc, font, b"DescendantFonts")?;
    resolve(doc, fonts.first()?).as_dict().ok()
}

fn font_descriptor<'a>(doc: &'a LopdfDocument, font: &'a Dictionary) -> Option<&'a Dictionary> {
    let obj = font.get(b"FontDescriptor").ok()?;
    resolve(doc, obj).as_dict().ok()
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    doc.dereference(obj).map(|(_, o)| o).unwrap_or(obj)
}

fn resolve_number(doc: &LopdfDocument, obj: &Object) -> Option<f32> {
    get_number(resolve(doc, obj))
}

fn number_entry(doc: &LopdfDocument, dict: &Dictionary, key: &[u8]) -> Option<f32> {
    resolve_number(doc, dict.get(key).ok()?)
}

fn array_entry<'a>(doc: &'a LopdfDocument, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [Object]> {
    let obj = dict.get(key).ok()?;
    resolve(doc, obj).as_array().ok().map(|a| a.as_slice())
}

fn name_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).to_string())
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_simple_font_widths() {
        let doc = LopdfDocument::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(667), Object::Integer(667)],
        };
        let metrics = FontMetrics::from_dict(&doc, &font);
        assert_eq!(metrics.base_font, "Helvetica");
        assert_eq!(metrics.code_len(), 1);
        assert_eq!(metrics.width(65), 667.0);
        assert_eq!(metrics.width(66), 667.0);
        // Outside the table falls back to the default advance
        assert_eq!(metrics.width(32), 500.0);
    }

    #[test]
    fn test_standard_font_without_widths() {
        let doc = LopdfDocument::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        };
        let metrics = FontMetrics::from_dict(&doc, &font);
        assert_eq!(metrics.width(b'A' as u32), 500.0);
    }

    #[test]
    fn test_cid_widths() {
        let doc = LopdfDocument::with_version("1.5");
        let items = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(250), Object::Integer(300)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(400),
        ];
        let widths = parse_cid_widths(&doc, &items);
        assert_eq!(widths.get(&1), Some(&250.0));
        assert_eq!(widths.get(&2), Some(&300.0));
        assert_eq!(widths.get(&11), Some(&400.0));
        assert_eq!(widths.len(), 5);
    }

    #[test]
    fn test_type0_font_defaults() {
        let doc = LopdfDocument::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "MSung-Light",
        };
        let metrics = FontMetrics::from_dict(&doc, &font);
        assert!(metrics.two_byte);
        assert_eq!(metrics.code_len(), 2);
        assert_eq!(metrics.width(0x4E00), 1000.0);
    }
}
