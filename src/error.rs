//! Error types for formcheck.

use std::io;
use thiserror::Error;

/// Result type alias for formcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while opening documents or running checks.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The byte buffer is not a PDF or could not be opened.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The upload was declared with a content type other than PDF.
    #[error("Invalid file type '{0}'. Please upload a PDF.")]
    InvalidContentType(String),

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Invalid check configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single check could not complete.
    #[error("Check '{check}' failed: {reason}")]
    CheckFailed {
        /// Name of the failing check
        check: String,
        /// Human-readable cause
        reason: String,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap any error as a request-level invalid-input failure.
    ///
    /// Errors that already describe invalid input are returned unchanged.
    pub fn into_invalid_input(self) -> Self {
        match self {
            Error::InvalidInput(_) => self,
            other => Error::InvalidInput(other.to_string()),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
