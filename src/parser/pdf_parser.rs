//! PDF document parser using lopdf.

use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Page};

use super::fonts::get_number;
use super::layout::{PageBox, TextExtractor};
use super::options::{ErrorMode, ParseOptions};

/// Inherited page attributes are searched at most this many levels up.
const MAX_TREE_DEPTH: usize = 32;

/// PDF document parser.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        // Verify it's a PDF before handing it to lopdf
        let format = detect_format_from_bytes(data)?;
        log::debug!("Detected {} ({} bytes)", format, data.len());

        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;

        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may be unreadable");
        }

        Ok(Self { doc, options })
    }

    /// Parse the document into positioned text.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();
        let metadata = self.extract_metadata();

        let extractor = TextExtractor::new(&self.doc).with_normalization(self.options.normalize);

        for (page_num, page_id) in self.doc.get_pages() {
            if !self.options.pages.includes(page_num) {
                continue;
            }
            let page = self.parse_page(&extractor, page_num, page_id)?;
            document.add_page(page);
        }

        // Keep the declared total even when only some pages were selected
        document.metadata = Metadata {
            page_count: self.page_count(),
            ..metadata
        };

        Ok(document)
    }

    /// Parse a single page.
    fn parse_page(&self, extractor: &TextExtractor<'_>, page_num: u32, page_id: ObjectId) -> Result<Page> {
        let page_box = self.page_box(page_id);

        match extractor.extract_page_spans(page_id, page_box) {
            Ok(spans) => Ok(Page::from_spans(
                page_num,
                page_box.width(),
                page_box.height(),
                spans,
            )),
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                // In lenient mode, keep the page but without text
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                Ok(Page::new(page_num, page_box.width(), page_box.height()))
            }
        }
    }

    /// Visible area of a page: CropBox, else MediaBox, inherited through the
    /// page tree, defaulting to US Letter.
    fn page_box(&self, page_id: ObjectId) -> PageBox {
        self.inherited_box(page_id, b"CropBox")
            .or_else(|| self.inherited_box(page_id, b"MediaBox"))
            .unwrap_or(PageBox::LETTER)
    }

    fn inherited_box(&self, page_id: ObjectId, key: &[u8]) -> Option<PageBox> {
        let mut node = self.doc.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(obj) = node.get(key) {
                return self.box_from_object(obj);
            }
            let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }

        None
    }

    fn box_from_object(&self, obj: &Object) -> Option<PageBox> {
        let (_, obj) = self.doc.dereference(obj).ok()?;
        let values: Vec<f32> = obj
            .as_array()
            .ok()?
            .iter()
            .filter_map(|v| self.doc.dereference(v).ok())
            .filter_map(|(_, v)| get_number(v))
            .collect();
        PageBox::from_array(&values)
    }

    /// Extract document metadata.
    fn extract_metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.doc.version.to_string());

        let info_dict = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| self.doc.dereference(info).ok())
            .and_then(|(_, obj)| obj.as_dict().ok());

        if let Some(info_dict) = info_dict {
            metadata.title = get_string_from_dict(info_dict, b"Title");
            metadata.author = get_string_from_dict(info_dict, b"Author");
            metadata.creator = get_string_from_dict(info_dict, b"Creator");
            metadata.producer = get_string_from_dict(info_dict, b"Producer");

            if let Some(date_str) = get_string_from_dict(info_dict, b"CreationDate") {
                metadata.created = parse_pdf_date(&date_str);
            }
            if let Some(date_str) = get_string_from_dict(info_dict, b"ModDate") {
                metadata.modified = parse_pdf_date(&date_str);
            }
        }

        metadata.encrypted = self.doc.is_encrypted();
        metadata
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| {
        match obj {
            Object::String(bytes, _) => {
                // UTF-16BE with BOM is the PDF standard for Unicode
                if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                    let utf16: Vec<u16> = bytes[2..]
                        .chunks_exact(2)
                        .map(|c| u16::from_be_bytes([c[0], c[1]]))
                        .collect();
                    String::from_utf16(&utf16).ok()
                } else {
                    // Try as UTF-8, then Latin-1
                    String::from_utf8(bytes.clone())
                        .ok()
                        .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
                }
            }
            Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        }
    })
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    // At minimum we need YYYY
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
