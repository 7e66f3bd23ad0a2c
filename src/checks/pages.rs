//! Page sequence completeness.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::{number_list, CheckOptions};
use crate::accessor::DocumentAccessor;
use crate::error::Result;
use crate::report::Finding;

/// Form label used for pages without a recognisable form number.
const UNKNOWN_FORM: &str = "Unknown Form";

/// Declared totals above this are treated as misreads.
const MAX_DECLARED_PAGES: u32 = 10_000;

lazy_static! {
    /// Form identifier, e.g. "Form I-130" or "Form I-864A"
    static ref FORM_ID: Regex = Regex::new(r"Form\sI-\d{3,4}\w?").unwrap();

    /// Page footer, e.g. "Page 2 of 12"
    static ref PAGE_OF: Regex = Regex::new(r"Page\s(\d+)\s+of\s+(\d+)").unwrap();
}

struct FormPages {
    form: String,
    seen: BTreeSet<u32>,
    total: u32,
}

/// Every page declared by a "Page X of Y" footer must be present, per form.
///
/// Pages are grouped by the first form identifier on the page. Each group
/// keeps the most recently declared total.
pub fn check_missing_pages(doc: &dyn DocumentAccessor, _options: &CheckOptions) -> Result<Vec<Finding>> {
    let mut forms: Vec<FormPages> = Vec::new();

    for index in 0..doc.page_count() {
        let text = doc.page_text(index)?;

        let Some(caps) = PAGE_OF.captures(&text) else {
            continue;
        };
        let (Ok(current), Ok(total)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        if total > MAX_DECLARED_PAGES {
            log::debug!("Ignoring implausible page total {} on page {}", total, index + 1);
            continue;
        }

        let form = FORM_ID
            .find(&text)
            .map_or(UNKNOWN_FORM, |m| m.as_str());

        match forms.iter_mut().find(|f| f.form == form) {
            Some(entry) => {
                entry.seen.insert(current);
                entry.total = total;
            }
            None => forms.push(FormPages {
                form: form.to_string(),
                seen: BTreeSet::from([current]),
                total,
            }),
        }
    }

    let findings = forms
        .iter()
        .filter_map(|entry| {
            let missing: Vec<u32> = (1..=entry.total)
                .filter(|page| !entry.seen.contains(page))
                .collect();
            (!missing.is_empty()).then(|| {
                Finding::new(format!(
                    "Missing pages for {}: {}",
                    entry.form,
                    number_list(&missing)
                ))
            })
        })
        .collect();

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::text_doc;

    fn run(pages: &[&[&str]]) -> Vec<String> {
        check_missing_pages(&text_doc(pages), &CheckOptions::default())
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_missing_middle_page() {
        let findings = run(&[
            &["Form I-130", "Page 1 of 3"],
            &["Form I-130", "Page 3 of 3"],
        ]);
        assert_eq!(findings, vec!["Missing pages for Form I-130: [2]"]);
    }

    #[test]
    fn test_complete_sequence() {
        let findings = run(&[
            &["Form I-485 Page 1 of 2"],
            &["Form I-485 Page 2 of 2"],
        ]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_forms_grouped_separately() {
        let findings = run(&[
            &["Form I-864A", "Page 1 of 4"],
            &["Form I-130", "Page 2 of 2"],
            &["Page 1 of 2"],
            &["Form I-864A", "Page 4 of 4"],
        ]);
        assert_eq!(
            findings,
            vec![
                "Missing pages for Form I-864A: [2, 3]",
                "Missing pages for Form I-130: [1]",
                "Missing pages for Unknown Form: [2]",
            ]
        );
    }

    #[test]
    fn test_latest_total_wins() {
        let findings = run(&[
            &["Form I-130", "Page 1 of 2"],
            &["Form I-130", "Page 2 of 3"],
        ]);
        assert_eq!(findings, vec!["Missing pages for Form I-130: [3]"]);
    }

    #[test]
    fn test_pages_without_footer_ignored() {
        assert!(run(&[&["Form I-130"], &["cover letter"]]).is_empty());
        assert!(run(&[&["Page 1 of 99999999"]]).is_empty());
    }
}
