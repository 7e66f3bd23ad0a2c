//! Preparer presence and signature date.

use super::dates::FULL_DATE;
use super::CheckOptions;
use crate::accessor::DocumentAccessor;
use crate::error::Result;
use crate::report::Finding;

const PREPARER_SIGNATURE_LABEL: &str = "Preparer's Signature";

/// The configured preparer must appear in the document, and every page
/// naming them next to a preparer signature must carry a mm/dd/yyyy date.
pub fn check_preparer(doc: &dyn DocumentAccessor, options: &CheckOptions) -> Result<Vec<Finding>> {
    let name = options.preparer_name.as_str();
    let mut findings = Vec::new();
    let mut found = false;

    for index in 0..doc.page_count() {
        if doc.search(index, name)?.is_empty() {
            continue;
        }
        found = true;

        let text = doc.page_text(index)?;
        if text.contains(PREPARER_SIGNATURE_LABEL) && !FULL_DATE.is_match(&text) {
            findings.push(Finding::on_page(
                doc.page_number(index),
                format!(
                    "{} listed as preparer, but signature date is missing or malformed.",
                    name
                ),
            ));
        }
    }

    if !found {
        findings.push(Finding::new(format!(
            "Preparer '{}' not found in the document.",
            name
        )));
    }

    Ok(findings)
}
