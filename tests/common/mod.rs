//! Builds small single-font PDFs for integration tests.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
pub const FONT_SIZE: i64 = 10;

/// A line of text drawn at `x` on PDF baseline `y` (bottom-left origin).
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub x: i64,
    pub y: i64,
}

/// Top of a line in top-left coordinates.
pub fn top_of(baseline: i64) -> f32 {
    (PAGE_HEIGHT - baseline) as f32 - 0.8 * FONT_SIZE as f32
}

#[derive(Debug, Default)]
pub struct PdfBuilder {
    pages: Vec<Vec<Line>>,
    title: Option<String>,
    compressed: bool,
    contents_array: bool,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page with explicitly placed lines.
    pub fn page(mut self, lines: &[(&str, i64, i64)]) -> Self {
        self.pages.push(
            lines
                .iter()
                .map(|&(text, x, y)| Line {
                    text: text.to_string(),
                    x,
                    y,
                })
                .collect(),
        );
        self
    }

    /// Add a page whose lines run down from the top margin, 20pt apart.
    pub fn text_page(self, lines: &[&str]) -> Self {
        let placed: Vec<(&str, i64, i64)> = lines
            .iter()
            .enumerate()
            .map(|(i, &text)| (text, 72, 720 - 20 * i as i64))
            .collect();
        self.page(&placed)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Flate-compress every stream before saving.
    pub fn compressed(mut self) -> Self {
        self.compressed = true;
        self
    }

    /// Reference each page's content stream through a one-element array.
    pub fn contents_array(mut self) -> Self {
        self.contents_array = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in &self.pages {
            let mut operations = Vec::new();
            for line in lines {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
                operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(line.text.as_str())],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));

            let contents = if self.contents_array {
                Object::Array(vec![Object::Reference(content_id)])
            } else {
                Object::Reference(content_id)
            };

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => contents,
                "Resources" => resources_id,
                "MediaBox" => Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH),
                    Object::Integer(PAGE_HEIGHT),
                ]),
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(ref title) = self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title.as_str()),
            });
            doc.trailer.set("Info", info_id);
        }

        if self.compressed {
            doc.compress();
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("save pdf");
        buffer
    }

    pub fn save_to(&self, path: &Path) {
        std::fs::write(path, self.build()).expect("write pdf");
    }
}
