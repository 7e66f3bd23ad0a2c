//! Document access abstraction.
//!
//! Checks query documents only through [`DocumentAccessor`]: page count,
//! whole-page text, text clipped to a rectangle and positional search.
//! No concrete PDF library types cross this boundary.

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::model::{Document, Page};

/// Read-only access to a paginated document's text and layout.
///
/// Page indices are 0-based; findings report them 1-based.
pub trait DocumentAccessor {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Page number shown to users for the page at `index`.
    ///
    /// Defaults to `index + 1`; documents holding a subset of pages report
    /// their numbers in the source file.
    fn page_number(&self, index: usize) -> u32 {
        index as u32 + 1
    }

    /// Page rectangle (origin at the top-left corner).
    fn page_bounds(&self, index: usize) -> Result<Rect>;

    /// Whole-page text, lines joined with `\n`.
    fn page_text(&self, index: usize) -> Result<String>;

    /// Text of the characters falling inside `clip`.
    fn clipped_text(&self, index: usize, clip: &Rect) -> Result<String>;

    /// Boxes of every literal occurrence of `needle` on the page.
    fn search(&self, index: usize, needle: &str) -> Result<Vec<Rect>>;

    /// Text of every page, concatenated.
    fn full_text(&self) -> Result<String> {
        let mut text = String::new();
        for index in 0..self.page_count() {
            if index > 0 {
                text.push_str("\n\n");
            }
            text.push_str(&self.page_text(index)?);
        }
        Ok(text)
    }
}

impl Document {
    fn page_at(&self, index: usize) -> Result<&Page> {
        self.pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index + 1, self.pages.len()))
    }
}

impl DocumentAccessor for Document {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_number(&self, index: usize) -> u32 {
        self.pages
            .get(index)
            .map_or(index as u32 + 1, |page| page.number)
    }

    fn page_bounds(&self, index: usize) -> Result<Rect> {
        Ok(self.page_at(index)?.bounds())
    }

    fn page_text(&self, index: usize) -> Result<String> {
        Ok(self.page_at(index)?.plain_text())
    }

    fn clipped_text(&self, index: usize, clip: &Rect) -> Result<String> {
        Ok(self.page_at(index)?.clipped_text(clip))
    }

    fn search(&self, index: usize, needle: &str) -> Result<Vec<Rect>> {
        Ok(self.page_at(index)?.search(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextSpan;

    fn doc() -> Document {
        let p1 = Page::from_spans(
            1,
            612.0,
            792.0,
            vec![TextSpan::new("Edition Date 01/02/2024", 72.0, 50.0, 10.0)],
        );
        let p2 = Page::letter(2);
        Document::from_pages(vec![p1, p2])
    }

    #[test]
    fn test_accessor_basics() {
        let doc = doc();
        let accessor: &dyn DocumentAccessor = &doc;
        assert_eq!(accessor.page_count(), 2);
        assert_eq!(accessor.page_text(0).unwrap(), "Edition Date 01/02/2024");
        assert_eq!(accessor.page_text(1).unwrap(), "");
        assert_eq!(
            accessor.page_bounds(1).unwrap(),
            Rect::new(0.0, 0.0, 612.0, 792.0)
        );
    }

    #[test]
    fn test_accessor_search_and_clip() {
        let doc = doc();
        let hits = doc.search(0, "Edition Date").unwrap();
        assert_eq!(hits.len(), 1);
        let label = hits[0];
        let clip = Rect::new(label.x1, label.y0, label.x1 + 200.0, label.y1);
        assert_eq!(doc.clipped_text(0, &clip).unwrap().trim(), "01/02/2024");
        assert!(doc.search(1, "Edition Date").unwrap().is_empty());
    }

    #[test]
    fn test_accessor_out_of_range() {
        let doc = doc();
        assert!(matches!(
            doc.page_text(5),
            Err(Error::PageOutOfRange(6, 2))
        ));
    }

    #[test]
    fn test_page_number_follows_page() {
        let doc = Document::from_pages(vec![Page::letter(3), Page::letter(7)]);
        assert_eq!(doc.page_number(0), 3);
        assert_eq!(doc.page_number(1), 7);
        assert_eq!(doc.page_number(2), 3);
    }

    #[test]
    fn test_full_text() {
        let doc = doc();
        assert_eq!(doc.full_text().unwrap(), "Edition Date 01/02/2024\n\n");
    }
}
