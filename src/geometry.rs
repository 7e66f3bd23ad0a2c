//! Page-space rectangles.
//!
//! Coordinates use a top-left origin with `y` growing downward, in PDF
//! points. The parser converts from PDF user space when building pages.

use serde::{Deserialize, Serialize};

/// Overlap below this many points is treated as touching, not intersecting.
const OVERLAP_EPSILON: f32 = 0.5;

/// An axis-aligned rectangle on a page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the rectangle (zero if inverted).
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height of the rectangle (zero if inverted).
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Whether the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Horizontal centre.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Whether `x` lies within the horizontal extent (edges inclusive).
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x0 && x <= self.x1
    }

    /// Whether the vertical extents of the two rectangles overlap.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        let overlap = self.y1.min(other.y1) - self.y0.max(other.y0);
        overlap > OVERLAP_EPSILON
    }

    /// Whether the two rectangles share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        let overlap_x = self.x1.min(other.x1) - self.x0.max(other.x0);
        overlap_x > 0.0 && self.overlaps_vertically(other)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1}, {:.1})",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10.0, 20.0, 110.0, 32.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 12.0);
        assert_eq!(r.center_x(), 60.0);
        assert!(!r.is_empty());
        assert!(Rect::new(5.0, 5.0, 5.0, 10.0).is_empty());
    }

    #[test]
    fn test_vertical_overlap_ignores_touching_edges() {
        let line = Rect::new(0.0, 100.0, 50.0, 112.0);
        let below = Rect::new(0.0, 112.0, 50.0, 124.0);
        let drop = Rect::new(0.0, 100.0, 50.0, 142.0);
        assert!(!line.overlaps_vertically(&below));
        assert!(drop.overlaps_vertically(&below));
    }

    #[test]
    fn test_intersects_and_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        let c = Rect::new(20.0, 0.0, 30.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.union(&c), Rect::new(0.0, 0.0, 30.0, 10.0));
    }
}
