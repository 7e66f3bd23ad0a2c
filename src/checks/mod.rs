//! Rule-based document checks.
//!
//! Each check scans a document through [`DocumentAccessor`] and returns the
//! defects it finds. Checks are independent of one another: they share no
//! state, never mutate the document and perform no I/O.
//!
//! # Example
//!
//! ```
//! use formcheck::checks::{builtin_checks, CheckOptions, DocumentCheck};
//! use formcheck::model::{Document, Page, TextSpan};
//!
//! let page = Page::from_spans(1, 612.0, 792.0, vec![TextSpan::new("A123456789", 72.0, 72.0, 10.0)]);
//! let doc = Document::from_pages(vec![page]);
//!
//! for check in builtin_checks() {
//!     let findings = check.run(&doc, &CheckOptions::default()).unwrap();
//!     println!("{}: {} finding(s)", check.name(), findings.len());
//! }
//! ```

mod checkbox;
mod dates;
mod identifiers;
mod options;
mod pages;
mod preparer;

pub use checkbox::check_form_i131_box_3a;
pub use dates::{check_edition_dates, check_signature_date_format, check_signature_date_recency};
pub use identifiers::check_a_number_consistency;
pub use options::CheckOptions;
pub use pages::check_missing_pages;
pub use preparer::check_preparer;

use crate::accessor::DocumentAccessor;
use crate::error::Result;
use crate::report::Finding;

/// Canonical check names.
pub mod names {
    /// Edition dates agree across the document
    pub const EDITION_DATES: &str = "edition_dates";
    /// Signature dates use mm/dd/yyyy
    pub const SIGNATURE_DATE_FORMAT: &str = "signature_date_format";
    /// Signature dates are recent
    pub const SIGNATURE_DATE_RECENCY: &str = "signature_date_recency";
    /// The expected preparer signed with a date
    pub const PREPARER: &str = "preparer";
    /// Every declared "Page X of Y" is present
    pub const MISSING_PAGES: &str = "missing_pages";
    /// Exactly one A-Number is used
    pub const A_NUMBER_CONSISTENCY: &str = "a_number_consistency";
    /// Form I-131 item 3a is not marked YES
    pub const FORM_I131_BOX_3A: &str = "form_i131_box_3a";
    /// Wildcard selecting every registered check
    pub const ALL: &str = "all";
}

/// A document inspection rule.
///
/// Implement this trait to add a check to a [`CheckRegistry`](crate::registry::CheckRegistry).
pub trait DocumentCheck: Send + Sync {
    /// Stable identifier used to request the check.
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Scan the document and return every defect found.
    fn run(&self, doc: &dyn DocumentAccessor, options: &CheckOptions) -> Result<Vec<Finding>>;
}

/// Signature shared by the built-in check functions.
pub type CheckFn = fn(&dyn DocumentAccessor, &CheckOptions) -> Result<Vec<Finding>>;

/// A check backed by a plain function.
#[derive(Clone, Copy)]
pub struct BuiltinCheck {
    name: &'static str,
    description: &'static str,
    func: CheckFn,
}

impl BuiltinCheck {
    /// Wrap a check function.
    pub const fn new(name: &'static str, description: &'static str, func: CheckFn) -> Self {
        Self {
            name,
            description,
            func,
        }
    }
}

impl std::fmt::Debug for BuiltinCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinCheck")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl DocumentCheck for BuiltinCheck {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn run(&self, doc: &dyn DocumentAccessor, options: &CheckOptions) -> Result<Vec<Finding>> {
        (self.func)(doc, options)
    }
}

/// The built-in checks, in canonical order.
pub fn builtin_checks() -> Vec<BuiltinCheck> {
    vec![
        BuiltinCheck::new(
            names::EDITION_DATES,
            "Edition dates printed next to \"Edition Date\" agree across the document",
            check_edition_dates,
        ),
        BuiltinCheck::new(
            names::SIGNATURE_DATE_FORMAT,
            "Dates near \"Signature of\" use the mm/dd/yyyy format",
            check_signature_date_format,
        ),
        BuiltinCheck::new(
            names::SIGNATURE_DATE_RECENCY,
            "Every mm/dd/yyyy date lies within the recency window",
            check_signature_date_recency,
        ),
        BuiltinCheck::new(
            names::PREPARER,
            "The expected preparer appears and their signature is dated",
            check_preparer,
        ),
        BuiltinCheck::new(
            names::MISSING_PAGES,
            "Every page declared by \"Page X of Y\" is present, per form",
            check_missing_pages,
        ),
        BuiltinCheck::new(
            names::A_NUMBER_CONSISTENCY,
            "Exactly one A-Number is used throughout the document",
            check_a_number_consistency,
        ),
        BuiltinCheck::new(
            names::FORM_I131_BOX_3A,
            "Form I-131 page 7 item 3a is not marked YES",
            check_form_i131_box_3a,
        ),
    ]
}

/// Render values the way the findings list them: `['a', 'b']`.
pub(crate) fn quoted_list<S: AsRef<str>>(values: &[S]) -> String {
    let items: Vec<String> = values.iter().map(|v| quote(v.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

/// Render numbers as `[2, 5]`.
pub(crate) fn number_list(values: &[u32]) -> String {
    let items: Vec<String> = values.iter().map(u32::to_string).collect();
    format!("[{}]", items.join(", "))
}

fn quote(value: &str) -> String {
    if value.contains('\'') && !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{Document, Page, TextSpan};

    /// One span per `(text, x, top)` on each page, 10pt, default advances.
    pub fn doc(pages: &[&[(&str, f32, f32)]]) -> Document {
        let pages = pages
            .iter()
            .enumerate()
            .map(|(i, spans)| {
                let spans = spans
                    .iter()
                    .map(|(text, x, top)| TextSpan::new(*text, *x, *top, 10.0))
                    .collect();
                Page::from_spans(i as u32 + 1, 612.0, 792.0, spans)
            })
            .collect();
        Document::from_pages(pages)
    }

    /// One line of text per entry, each page stacked from the top.
    pub fn text_doc(pages: &[&[&str]]) -> Document {
        let pages: Vec<Vec<(&str, f32, f32)>> = pages
            .iter()
            .map(|lines| {
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, text)| (*text, 72.0, 72.0 + 20.0 * i as f32))
                    .collect()
            })
            .collect();
        let refs: Vec<&[(&str, f32, f32)]> = pages.iter().map(Vec::as_slice).collect();
        doc(&refs)
    }
}
