//! PDF parsing module.

mod fonts;
mod layout;
mod options;
mod pdf_parser;

pub use fonts::FontMetrics;
pub use layout::{PageBox, TextExtractor};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_parser::PdfParser;
