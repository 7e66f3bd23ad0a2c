//! Findings and check reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One defect reported by a check.
///
/// Findings serialise as their display string, e.g.
/// `"Page 3: Signature date '01/02/2020' is not within the last 3 months."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Finding {
    /// 1-based page the finding refers to, if any
    pub page: Option<u32>,
    /// Message text without the page prefix
    pub message: String,
}

impl Finding {
    /// A document-level finding.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            page: None,
            message: message.into(),
        }
    }

    /// A finding tied to a page.
    pub fn on_page(page: u32, message: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            message: message.into(),
        }
    }

    /// Warning for a requested check name that is not registered.
    pub fn unknown_check(name: &str) -> Self {
        Self::new(format!("Warning: Unknown check '{}' requested.", name))
    }

    /// Error entry for a check that failed while running.
    pub fn check_failed(check: &str, reason: impl Into<String>) -> Self {
        let err = Error::CheckFailed {
            check: check.to_string(),
            reason: reason.into(),
        };
        Self::new(format!("Error: {}", err))
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(f, "Page {}: {}", page, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<Finding> for String {
    fn from(finding: Finding) -> Self {
        finding.to_string()
    }
}

impl From<String> for Finding {
    fn from(s: String) -> Self {
        if let Some(rest) = s.strip_prefix("Page ") {
            if let Some((num, message)) = rest.split_once(": ") {
                if let Ok(page) = num.parse() {
                    return Finding::on_page(page, message);
                }
            }
        }
        Finding::new(s)
    }
}

/// Result of running checks against one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Name of the checked file, passed through from the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// All findings, in resolved check order
    #[serde(rename = "programmatic_errors")]
    pub findings: Vec<Finding>,
}

impl CheckReport {
    /// Create a report from findings.
    pub fn new(findings: Vec<Finding>) -> Self {
        Self {
            filename: None,
            findings,
        }
    }

    /// Attach the file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Whether no findings were produced.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Whether the report holds no findings.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings rendered as strings.
    pub fn messages(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    /// Human-readable summary suitable for posting to a chat channel.
    pub fn summary_message(&self) -> String {
        let name = self.filename.as_deref().unwrap_or("document");
        if self.findings.is_empty() {
            return format!("✅ I've reviewed `{}` and found no programmatic errors.", name);
        }

        let list = self
            .findings
            .iter()
            .map(|f| format!("• {}", f))
            .collect::<Vec<_>>()
            .join("\n");
        format!("I found some issues in `{}`:\n\n{}", name, list)
    }
}

/// Split a form value such as `"edition_dates, preparer"` into check names.
///
/// Commas and whitespace both separate names; empty entries are dropped.
pub fn parse_check_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
