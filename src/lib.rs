//! # formcheck
//!
//! Rule-based content checks for PDF form packages.
//!
//! A set of independent checks scans a PDF's text and layout for
//! domain-specific defects (inconsistent edition dates, stale or malformed
//! signature dates, missing pages, conflicting identifiers, suspicious
//! checkbox answers) and returns a flat list of findings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use formcheck::run_checks;
//!
//! fn main() -> formcheck::Result<()> {
//!     let bytes = std::fs::read("application.pdf")?;
//!     let report = run_checks(&bytes, &["all"])?;
//!     for finding in &report.findings {
//!         println!("{}", finding);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`parser`] turns PDF bytes into positioned text ([`model::Document`])
//! - [`accessor::DocumentAccessor`] is the only view checks get of a document
//! - [`checks`] holds the built-in rules and their [`CheckOptions`]
//! - [`registry::CheckRegistry`] maps names to checks
//! - [`runner::CheckRunner`] opens a document, runs the requested checks with
//!   per-check failure isolation and collects a [`CheckReport`]

pub mod accessor;
pub mod checks;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod registry;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use accessor::DocumentAccessor;
pub use checks::{CheckOptions, DocumentCheck};
pub use detect::{detect_format_from_bytes, is_pdf_bytes, is_pdf_content_type, PdfFormat};
pub use error::{Error, Result};
pub use geometry::Rect;
pub use model::{Document, Metadata, Page};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
pub use registry::{CheckRegistry, Resolution};
pub use report::{parse_check_list, CheckReport, Finding};
pub use runner::{CheckRunner, Upload};

use std::path::Path;

/// Run checks with default options against a PDF held in memory.
///
/// # Arguments
///
/// * `bytes` - PDF file content
/// * `requested` - Check names; `"all"` selects every built-in check
///
/// # Example
///
/// ```no_run
/// use formcheck::run_checks;
///
/// let bytes = std::fs::read("application.pdf").unwrap();
/// let report = run_checks(&bytes, &["edition_dates", "missing_pages"]).unwrap();
/// println!("{}", serde_json::to_string_pretty(&report).unwrap());
/// ```
pub fn run_checks<S: AsRef<str>>(bytes: &[u8], requested: &[S]) -> Result<CheckReport> {
    CheckRunner::default().run(bytes, requested)
}

/// Run checks with default options against a PDF file.
///
/// The file name is recorded in the report.
pub fn check_file<P: AsRef<Path>, S: AsRef<str>>(path: P, requested: &[S]) -> Result<CheckReport> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let report = run_checks(&bytes, requested)?;
    Ok(match path.file_name() {
        Some(name) => report.with_filename(name.to_string_lossy()),
        None => report,
    })
}

/// Parse a PDF file into positioned text.
///
/// # Example
///
/// ```no_run
/// use formcheck::parse_file;
///
/// let doc = parse_file("application.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = PdfParser::open(path)?;
    parser.parse()
}

/// Parse a PDF file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = PdfParser::from_bytes(data)?;
    parser.parse()
}

/// Extract plain text from a PDF file, pages separated by a blank line.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(doc.plain_text())
}
