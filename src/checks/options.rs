//! Check configuration.

use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable parameters shared by all checks.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use formcheck::CheckOptions;
///
/// let options = CheckOptions::from_json_str(r#"{"preparer_name": "Ada Lovelace"}"#).unwrap();
/// assert_eq!(options.preparer_name, "Ada Lovelace");
/// assert_eq!(options.recency_days, 90);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    /// Name expected in the preparer section
    pub preparer_name: String,

    /// Date treated as "today"; the local date when unset
    pub reference_date: Option<NaiveDate>,

    /// How many days back a signature date may lie
    pub recency_days: i64,

    /// Width of the area right of "Edition Date" holding the date
    pub edition_date_width: f32,

    /// How far below a "Signature of" label its date may appear
    pub signature_date_drop: f32,

    /// Width of the area left of the question end holding the checkbox text
    pub checkbox_width: f32,

    /// Text identifying the travel-document form
    pub i131_form_marker: String,

    /// Text identifying the page carrying item 3a
    pub i131_page_marker: String,

    /// Question text of item 3a
    pub i131_question_anchor: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            preparer_name: "Jeffrey Hales".to_string(),
            reference_date: None,
            recency_days: 90,
            edition_date_width: 200.0,
            signature_date_drop: 30.0,
            checkbox_width: 100.0,
            i131_form_marker: "I-131".to_string(),
            i131_page_marker: "Page 7 of".to_string(),
            i131_question_anchor:
                "3.a. Are you, or any other person included in this application, now in exclusion"
                    .to_string(),
        }
    }
}

impl CheckOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values no check can work with.
    pub fn validate(&self) -> Result<()> {
        if self.recency_days < 0 {
            return Err(Error::Config(format!(
                "recency_days must not be negative (got {})",
                self.recency_days
            )));
        }
        for (name, value) in [
            ("edition_date_width", self.edition_date_width),
            ("signature_date_drop", self.signature_date_drop),
            ("checkbox_width", self.checkbox_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number (got {})",
                    name, value
                )));
            }
        }
        if self.preparer_name.trim().is_empty() {
            return Err(Error::Config("preparer_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Set the preparer name.
    pub fn with_preparer_name(mut self, name: impl Into<String>) -> Self {
        self.preparer_name = name.into();
        self
    }

    /// Pin "today" to a fixed date.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Set the signature recency window.
    pub fn with_recency_days(mut self, days: i64) -> Self {
        self.recency_days = days;
        self
    }

    /// Set the edition-date search width.
    pub fn with_edition_date_width(mut self, width: f32) -> Self {
        self.edition_date_width = width;
        self
    }

    /// Set the signature-date search drop.
    pub fn with_signature_date_drop(mut self, drop: f32) -> Self {
        self.signature_date_drop = drop;
        self
    }

    /// Set the checkbox search width.
    pub fn with_checkbox_width(mut self, width: f32) -> Self {
        self.checkbox_width = width;
        self
    }

    /// The date checks treat as today.
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}
