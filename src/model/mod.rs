//! Document model types for positioned PDF text.
//!
//! This module defines the in-memory representation that bridges PDF
//! parsing and the checks. Checks never see it directly; they go through
//! [`DocumentAccessor`](crate::accessor::DocumentAccessor), which
//! [`Document`] implements.

mod document;
mod page;
mod text;

pub use document::{Document, Metadata};
pub use page::Page;
pub use text::{Glyph, TextLine, TextSpan, DEFAULT_ADVANCE_RATIO};
