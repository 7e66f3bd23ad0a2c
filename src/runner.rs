//! Check runner: open a document, run the requested checks, collect findings.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::accessor::DocumentAccessor;
use crate::checks::{CheckOptions, DocumentCheck};
use crate::detect::ensure_pdf_content_type;
use crate::error::{Error, Result};
use crate::model::Document;
use crate::parser::{ParseOptions, PdfParser};
use crate::registry::CheckRegistry;
use crate::report::{CheckReport, Finding};

/// An uploaded file as received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-side file name
    pub filename: String,
    /// Declared MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create a new upload.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Runs checks from a registry against documents.
///
/// A runner holds no per-request state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct CheckRunner {
    registry: Arc<CheckRegistry>,
    options: CheckOptions,
    parse_options: ParseOptions,
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new(CheckRegistry::with_defaults())
    }
}

impl CheckRunner {
    /// Create a runner over a registry, with default options.
    pub fn new(registry: CheckRegistry) -> Self {
        Self::with_shared_registry(Arc::new(registry))
    }

    /// Create a runner over a registry shared with other runners.
    pub fn with_shared_registry(registry: Arc<CheckRegistry>) -> Self {
        Self {
            registry,
            options: CheckOptions::default(),
            parse_options: ParseOptions::default(),
        }
    }

    /// Set check options.
    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// The registry checks are resolved from.
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// The options passed to every check.
    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Open a PDF held in memory.
    ///
    /// Any failure is reported as [`Error::InvalidInput`].
    pub fn open(&self, bytes: &[u8]) -> Result<Document> {
        PdfParser::from_bytes_with_options(bytes, self.parse_options.clone())
            .and_then(|parser| parser.parse())
            .map_err(Error::into_invalid_input)
    }

    /// Run the requested checks against a PDF held in memory.
    ///
    /// Fails when the options are invalid or the document cannot be opened;
    /// check failures become findings.
    pub fn run<S: AsRef<str>>(&self, bytes: &[u8], requested: &[S]) -> Result<CheckReport> {
        self.options.validate()?;
        let document = self.open(bytes)?;
        log::debug!("Opened document with {} page(s)", document.page_count());
        Ok(self.run_document(&document, requested))
    }

    /// Validate an upload's declared type, then run the requested checks.
    pub fn run_upload<S: AsRef<str>>(&self, upload: &Upload, requested: &[S]) -> Result<CheckReport> {
        ensure_pdf_content_type(&upload.content_type)?;
        let report = self.run(&upload.bytes, requested)?;
        Ok(report.with_filename(upload.filename.clone()))
    }

    /// Run the requested checks against an already opened document.
    ///
    /// Findings appear in resolved check order, followed by one warning per
    /// unknown check name in request order.
    pub fn run_document<S: AsRef<str>>(
        &self,
        doc: &dyn DocumentAccessor,
        requested: &[S],
    ) -> CheckReport {
        let resolution = self.registry.resolve(requested);

        let mut findings = Vec::new();
        for check in &resolution.checks {
            findings.extend(self.run_check(check.as_ref(), doc));
        }
        for name in &resolution.unknown {
            log::warn!("Unknown check '{}' requested", name);
            findings.push(Finding::unknown_check(name));
        }

        CheckReport::new(findings)
    }

    /// Run one check, turning errors and panics into a single finding.
    fn run_check(&self, check: &dyn DocumentCheck, doc: &dyn DocumentAccessor) -> Vec<Finding> {
        let name = check.name();
        log::debug!("Running check '{}'", name);

        match panic::catch_unwind(AssertUnwindSafe(|| check.run(doc, &self.options))) {
            Ok(Ok(findings)) => {
                log::debug!("Check '{}' reported {} finding(s)", name, findings.len());
                findings
            }
            Ok(Err(e)) => {
                log::warn!("Check '{}' failed: {}", name, e);
                vec![Finding::check_failed(name, e.to_string())]
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                log::warn!("Check '{}' panicked: {}", name, reason);
                vec![Finding::check_failed(name, reason)]
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked".to_string()
    }
}
