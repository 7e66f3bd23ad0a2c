//! Positioned text: spans, glyphs and lines.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Fraction of the font size used as the advance when no metrics are known.
pub const DEFAULT_ADVANCE_RATIO: f32 = 0.5;

/// A run of text drawn by one text-showing operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position of the left edge
    pub x: f32,
    /// Top edge (top-left origin)
    pub top: f32,
    /// Bottom edge (top-left origin)
    pub bottom: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Horizontal advance of each character, in points
    pub advances: Vec<f32>,
}

impl TextSpan {
    /// Create a span whose characters all share the default advance.
    ///
    /// The span box is one font size tall, starting at `top`.
    pub fn new(text: impl Into<String>, x: f32, top: f32, font_size: f32) -> Self {
        let text = text.into();
        let advances = vec![font_size * DEFAULT_ADVANCE_RATIO; text.chars().count()];
        Self {
            text,
            x,
            top,
            bottom: top + font_size,
            font_size,
            font_name: "Unknown".to_string(),
            advances,
        }
    }

    /// Set per-character advances.
    ///
    /// If the count does not match the character count, the total is spread
    /// evenly across the characters instead.
    pub fn with_advances(mut self, advances: Vec<f32>) -> Self {
        let count = self.text.chars().count();
        if advances.len() == count {
            self.advances = advances;
        } else if count > 0 {
            let total: f32 = advances.iter().sum();
            self.advances = vec![total / count as f32; count];
        }
        self
    }

    /// Set the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    /// Total advance width.
    pub fn width(&self) -> f32 {
        self.advances.iter().sum()
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width()
    }

    /// Bounding box of the whole span.
    pub fn bbox(&self) -> Rect {
        Rect::new(self.x, self.top, self.right(), self.bottom)
    }

    /// Each character with its box.
    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        let mut x = self.x;
        self.text
            .chars()
            .zip(self.advances.iter())
            .map(move |(ch, &advance)| {
                let rect = Rect::new(x, self.top, x + advance, self.bottom);
                x += advance;
                Glyph { ch, rect }
            })
    }
}

/// A single character with its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// The character
    pub ch: char,
    /// Its box on the page
    pub rect: Rect,
}

/// A text line composed of spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        Self { spans }
    }

    /// Bounding box of the line, or `None` for an empty line.
    pub fn bbox(&self) -> Option<Rect> {
        self.spans
            .iter()
            .map(TextSpan::bbox)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Characters of the line in reading order.
    ///
    /// A synthetic space is inserted between spans separated by a visible
    /// gap, so words drawn by separate operators stay searchable.
    pub fn glyphs(&self) -> Vec<Glyph> {
        let mut glyphs: Vec<Glyph> = Vec::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                if needs_space_between(prev, span) {
                    let x0 = prev.right();
                    let x1 = span.x.max(x0);
                    glyphs.push(Glyph {
                        ch: ' ',
                        rect: Rect::new(
                            x0,
                            prev.top.min(span.top),
                            x1,
                            prev.bottom.max(span.bottom),
                        ),
                    });
                }
            }
            glyphs.extend(span.glyphs());
        }

        glyphs
    }

    /// Get the combined text of all spans with gap-based spacing.
    pub fn text(&self) -> String {
        self.glyphs().into_iter().map(|g| g.ch).collect()
    }

    /// Boxes of every non-overlapping occurrence of `needle`, left to right.
    pub fn find(&self, needle: &str) -> Vec<Rect> {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() {
            return Vec::new();
        }

        let glyphs = self.glyphs();
        let mut hits = Vec::new();
        let mut i = 0;
        while i + needle.len() <= glyphs.len() {
            let window = &glyphs[i..i + needle.len()];
            if window.iter().zip(&needle).all(|(g, c)| g.ch == *c) {
                let rect = window
                    .iter()
                    .map(|g| g.rect)
                    .reduce(|acc, r| acc.union(&r))
                    .unwrap_or_default();
                hits.push(rect);
                i += needle.len();
            } else {
                i += 1;
            }
        }
        hits
    }

    /// Characters whose horizontal centre lies inside `clip`, provided the
    /// line overlaps the clip vertically.
    pub fn clipped_text(&self, clip: &Rect) -> Option<String> {
        let bbox = self.bbox()?;
        if !bbox.overlaps_vertically(clip) {
            return None;
        }
        let text: String = self
            .glyphs()
            .into_iter()
            .filter(|g| clip.contains_x(g.rect.center_x()))
            .map(|g| g.ch)
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Decide whether two adjacent spans need a separating space.
fn needs_space_between(prev: &TextSpan, span: &TextSpan) -> bool {
    let gap = span.x - prev.right();

    // Estimate average character width from current span
    let char_count = span.advances.len();
    let avg_char_width = if char_count > 0 && span.width() > 0.0 {
        span.width() / char_count as f32
    } else {
        span.font_size * DEFAULT_ADVANCE_RATIO
    };

    if gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_last = prev.text.chars().last();
    let curr_first = span.text.chars().next();
    !(prev_last.is_some_and(char::is_whitespace) || curr_first.is_some_and(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32) -> TextSpan {
        TextSpan::new(text, x, 100.0, 10.0)
    }

    #[test]
    fn test_span_geometry() {
        let s = span("Date", 50.0);
        assert_eq!(s.width(), 20.0);
        assert_eq!(s.right(), 70.0);
        assert_eq!(s.bbox(), Rect::new(50.0, 100.0, 70.0, 110.0));

        let glyphs: Vec<_> = s.glyphs().collect();
        assert_eq!(glyphs.len(), 4);
        assert_eq!(glyphs[1].ch, 'a');
        assert_eq!(glyphs[1].rect.x0, 55.0);
    }

    #[test]
    fn test_with_advances_mismatch_spreads_total() {
        let s = span("abcd", 0.0).with_advances(vec![6.0, 6.0]);
        assert_eq!(s.advances, vec![3.0; 4]);

        let s = span("ab", 0.0).with_advances(vec![4.0, 8.0]);
        assert_eq!(s.width(), 12.0);
    }

    #[test]
    fn test_line_inserts_space_across_gap() {
        let line = TextLine::from_spans(vec![span("Date", 100.0), span("Edition", 10.0)]);
        assert_eq!(line.text(), "Edition Date");

        let touching = TextLine::from_spans(vec![span("Edi", 0.0), span("tion", 15.0)]);
        assert_eq!(touching.text(), "Edition");
    }

    #[test]
    fn test_line_keeps_existing_whitespace_across_gap() {
        let trailing = TextLine::from_spans(vec![span("Date: ", 0.0), span("01/02/2024", 60.0)]);
        assert_eq!(trailing.text(), "Date: 01/02/2024");

        let leading = TextLine::from_spans(vec![span("Date:", 0.0), span(" 01/02/2024", 60.0)]);
        assert_eq!(leading.text(), "Date: 01/02/2024");
    }

    #[test]
    fn test_line_find_multiple() {
        let line = TextLine::from_spans(vec![span("YES NO YES", 0.0)]);
        let hits = line.find("YES");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], Rect::new(0.0, 100.0, 15.0, 110.0));
        assert_eq!(hits[1].x0, 35.0);
        assert!(line.find("MAYBE").is_empty());
        assert!(line.find("").is_empty());
    }

    #[test]
    fn test_line_find_across_spans() {
        let line = TextLine::from_spans(vec![span("Edition", 10.0), span("Date", 100.0)]);
        let hits = line.find("Edition Date");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].x0, 10.0);
        assert_eq!(hits[0].x1, 120.0);
    }

    #[test]
    fn test_line_clipped_text() {
        let line = TextLine::from_spans(vec![span("Label 01/02/2024", 0.0)]);
        // "Label" ends at x = 25
        let clip = Rect::new(25.0, 100.0, 225.0, 110.0);
        assert_eq!(line.clipped_text(&clip).unwrap().trim(), "01/02/2024");

        let above = Rect::new(0.0, 80.0, 300.0, 100.0);
        assert!(line.clipped_text(&above).is_none());
    }

    #[test]
    fn test_empty_line() {
        let line = TextLine::default();
        assert!(line.bbox().is_none());
        assert_eq!(line.text(), "");
        assert!(line.clipped_text(&Rect::new(0.0, 0.0, 10.0, 10.0)).is_none());
    }
}
