//! Page-level types.

use super::{TextLine, TextSpan};
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text lines, top to bottom
    pub lines: Vec<TextLine>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            lines: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Build a page from loose spans, grouping them into lines.
    pub fn from_spans(number: u32, width: f32, height: f32, spans: Vec<TextSpan>) -> Self {
        let mut page = Self::new(number, width, height);
        page.lines = group_spans_into_lines(spans);
        page
    }

    /// Add spans to the page, regrouping all lines.
    pub fn add_spans(&mut self, spans: impl IntoIterator<Item = TextSpan>) {
        let mut all: Vec<TextSpan> = std::mem::take(&mut self.lines)
            .into_iter()
            .flat_map(|line| line.spans)
            .collect();
        all.extend(spans);
        self.lines = group_spans_into_lines(all);
    }

    /// Page bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Get plain text content of the page, one line per text line.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text inside `clip`, one line per intersected text line.
    pub fn clipped_text(&self, clip: &Rect) -> String {
        self.lines
            .iter()
            .filter_map(|line| line.clipped_text(clip))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Boxes of every occurrence of `needle`, in reading order.
    pub fn search(&self, needle: &str) -> Vec<Rect> {
        self.lines.iter().flat_map(|line| line.find(needle)).collect()
    }

    /// Check if the page carries no text.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// Group spans into lines by their bottom edge, then order lines top to bottom.
fn group_spans_into_lines(spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // Sort spans by bottom edge, then X
    let mut spans = spans;
    spans.sort_by(|a, b| {
        a.bottom
            .partial_cmp(&b.bottom)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_line_spans: Vec<TextSpan> = Vec::new();
    let mut current_bottom: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3; // Allow 30% of font size variance

        match current_bottom {
            Some(bottom) if (span.bottom - bottom).abs() <= tolerance => {
                current_line_spans.push(span);
            }
            _ => {
                if !current_line_spans.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(
                        &mut current_line_spans,
                    )));
                }
                current_bottom = Some(span.bottom);
                current_line_spans.push(span);
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(TextLine::from_spans(current_line_spans));
    }

    lines
}
