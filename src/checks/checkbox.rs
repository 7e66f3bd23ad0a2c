//! Location-anchored checkbox check for Form I-131.
//!
//! The checkbox is located relative to the end of the question text. A
//! sturdier approach would use the form's known checkbox coordinates; the
//! markers and offsets live in [`CheckOptions`] so they can be tuned per
//! form edition.

use super::CheckOptions;
use crate::accessor::DocumentAccessor;
use crate::error::Result;
use crate::geometry::Rect;
use crate::report::Finding;

const MARKED_ANSWER: &str = "YES";

/// Item 3a on page 7 of Form I-131 must not be answered YES.
pub fn check_form_i131_box_3a(
    doc: &dyn DocumentAccessor,
    options: &CheckOptions,
) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    for index in 0..doc.page_count() {
        let text = doc.page_text(index)?;
        if !text.contains(&options.i131_form_marker) || !text.contains(&options.i131_page_marker) {
            continue;
        }

        let hits = doc.search(index, &options.i131_question_anchor)?;
        let Some(anchor) = hits.first() else {
            log::debug!("Item 3a question not found on page {}", doc.page_number(index));
            continue;
        };

        let clip = Rect::new(anchor.x1 - options.checkbox_width, anchor.y0, anchor.x1, anchor.y1);
        if doc.clipped_text(index, &clip)?.contains(MARKED_ANSWER) {
            findings.push(Finding::new(
                "Form I-131, Page 7, Item 3a may be incorrectly marked YES instead of NO.",
            ));
        }
    }

    Ok(findings)
}
