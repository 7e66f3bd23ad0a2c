//! Date checks: edition dates, signature date format and recency.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use super::{quoted_list, CheckOptions};
use crate::accessor::DocumentAccessor;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::report::Finding;

const EDITION_DATE_LABEL: &str = "Edition Date";
const SIGNATURE_LABEL: &str = "Signature of";

lazy_static! {
    /// Anything that looks like a date, e.g. "1/2/24"
    static ref LOOSE_DATE: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").unwrap();

    /// mm/dd/yyyy with month and day in range
    static ref STRICT_DATE_FORMAT: Regex =
        Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12]\d|3[01])/\d{4}$").unwrap();

    /// Two-digit month and day, four-digit year
    pub(crate) static ref FULL_DATE: Regex = Regex::new(r"\d{2}/\d{2}/\d{4}").unwrap();
}

/// Every "Edition Date" label must be followed by the same value.
///
/// The value is read from a strip `edition_date_width` wide immediately right
/// of each label.
pub fn check_edition_dates(doc: &dyn DocumentAccessor, options: &CheckOptions) -> Result<Vec<Finding>> {
    let mut dates = BTreeSet::new();

    for index in 0..doc.page_count() {
        for hit in doc.search(index, EDITION_DATE_LABEL)? {
            let clip = Rect::new(hit.x1, hit.y0, hit.x1 + options.edition_date_width, hit.y1);
            let text = doc.clipped_text(index, &clip)?;
            let text = text.trim();
            if !text.is_empty() {
                dates.insert(text.to_string());
            }
        }
    }

    if dates.len() > 1 {
        let dates: Vec<String> = dates.into_iter().collect();
        return Ok(vec![Finding::new(format!(
            "Inconsistent edition dates found. Dates found: {}",
            quoted_list(&dates)
        ))]);
    }
    Ok(Vec::new())
}

/// Dates near "Signature of" labels must be written mm/dd/yyyy.
///
/// The search area runs from the label to the right page edge and
/// `signature_date_drop` points below the label.
pub fn check_signature_date_format(
    doc: &dyn DocumentAccessor,
    options: &CheckOptions,
) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    for index in 0..doc.page_count() {
        let hits = doc.search(index, SIGNATURE_LABEL)?;
        if hits.is_empty() {
            continue;
        }
        let page_width = doc.page_bounds(index)?.width();

        for hit in hits {
            let clip = Rect::new(hit.x0, hit.y0, page_width, hit.y1 + options.signature_date_drop);
            let text = doc.clipped_text(index, &clip)?;

            for candidate in LOOSE_DATE.find_iter(&text) {
                let date = candidate.as_str();
                if !STRICT_DATE_FORMAT.is_match(date) {
                    findings.push(Finding::on_page(
                        doc.page_number(index),
                        format!(
                            "Invalid signature date format found: '{}'. Expected mm/dd/yyyy.",
                            date
                        ),
                    ));
                }
            }
        }
    }

    Ok(findings)
}

/// Every mm/dd/yyyy date in the document must fall within the last
/// `recency_days` days, today included.
///
/// Strings that are not real calendar dates are ignored.
pub fn check_signature_date_recency(
    doc: &dyn DocumentAccessor,
    options: &CheckOptions,
) -> Result<Vec<Finding>> {
    if options.recency_days < 0 {
        return Err(Error::Config(format!(
            "recency_days must not be negative (got {})",
            options.recency_days
        )));
    }
    let today = options.today();
    let earliest = Duration::try_days(options.recency_days)
        .and_then(|window| today.checked_sub_signed(window))
        .unwrap_or(NaiveDate::MIN);

    let mut findings = Vec::new();
    for index in 0..doc.page_count() {
        let text = doc.page_text(index)?;
        for candidate in FULL_DATE.find_iter(&text) {
            let raw = candidate.as_str();
            let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") else {
                continue;
            };
            if date < earliest || date > today {
                findings.push(Finding::on_page(
                    doc.page_number(index),
                    format!("Signature date '{}' is not within the last 3 months.", raw),
                ));
            }
        }
    }

    Ok(findings)
}
