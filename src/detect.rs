//! PDF format detection and upload validation.

use crate::error::{Error, Result};

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` header
    pub header_offset: usize,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept a header anywhere in the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// MIME type accepted for uploads.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Detect PDF format from bytes.
///
/// # Returns
/// * `Ok(PdfFormat)` if the data carries a valid PDF header
/// * `Err(Error::InvalidInput)` if the data is not a PDF
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC_LEN)
        .position(|w| w == PDF_MAGIC)
        .ok_or_else(|| Error::InvalidInput("not a PDF document".to_string()))?;

    let version_start = offset + PDF_MAGIC_LEN;
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or_else(|| Error::InvalidInput("truncated PDF header".to_string()))?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    // Validate version format (should be like "1.0" to "2.0")
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat {
        version,
        header_offset: offset,
    })
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes represent a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Check whether a declared MIME type names a PDF.
///
/// Parameters such as `; charset=binary` are ignored and the comparison
/// is case-insensitive.
pub fn is_pdf_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
}

/// Reject uploads whose declared content type is not PDF.
pub fn ensure_pdf_content_type(content_type: &str) -> Result<()> {
    if is_pdf_content_type(content_type) {
        Ok(())
    } else {
        Err(Error::InvalidContentType(content_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.header_offset, 0);
    }

    #[test]
    fn test_detect_header_after_garbage() {
        let data = b"\x00\x00junk%PDF-2.0\n";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, "2.0");
        assert_eq!(format.header_offset, 6);
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-1"),
            Err(Error::InvalidInput(_))
        ));
        assert!(detect_format_from_bytes(b"").is_err());
    }

    #[test]
    fn test_detect_bad_version() {
        let result = detect_format_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }

    #[test]
    fn test_content_type() {
        assert!(is_pdf_content_type("application/pdf"));
        assert!(is_pdf_content_type("Application/PDF; charset=binary"));
        assert!(!is_pdf_content_type("text/plain"));
        assert!(!is_pdf_content_type(""));

        assert!(ensure_pdf_content_type("application/pdf").is_ok());
        assert!(matches!(
            ensure_pdf_content_type("image/png"),
            Err(Error::InvalidContentType(t)) if t == "image/png"
        ));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("abc"));
    }
}
