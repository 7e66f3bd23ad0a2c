//! Content stream layouts: compressed, uncompressed and array `/Contents`.

mod common;

use common::PdfBuilder;
use formcheck::checks::names;
use formcheck::{parse_bytes, run_checks};

fn packet() -> PdfBuilder {
    PdfBuilder::new()
        .text_page(&[
            "Form I-130 Petition for Alien Relative",
            "Beneficiary A-Number A123456789",
            "Edition Date 02/13/19",
            "Page 1 of 2",
        ])
        .text_page(&[
            "Form I-130 Petition for Alien Relative",
            "Petitioner A-Number A987654321",
            "Edition Date 02/13/19",
            "Page 2 of 2",
        ])
}

fn assert_packet_findings(bytes: &[u8]) {
    let report = run_checks(
        bytes,
        &[
            names::A_NUMBER_CONSISTENCY,
            names::EDITION_DATES,
            names::MISSING_PAGES,
        ],
    )
    .unwrap();
    assert_eq!(
        report.messages(),
        vec!["Inconsistent A-Numbers found across documents. Numbers found: ['A123456789', 'A987654321']"]
    );
}

fn first_content_has_filter(bytes: &[u8]) -> bool {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let mut contents = page.get(b"Contents").unwrap();
    if let Ok(items) = contents.as_array() {
        contents = &items[0];
    }
    let stream = doc
        .get_object(contents.as_reference().unwrap())
        .unwrap()
        .as_stream()
        .unwrap();
    stream.dict.get(b"Filter").is_ok()
}

#[test]
fn test_unfiltered_single_stream() {
    let bytes = packet().build();
    assert!(!first_content_has_filter(&bytes));

    let doc = parse_bytes(&bytes).unwrap();
    assert!(doc.pages[0].plain_text().contains("A123456789"));
    assert_packet_findings(&bytes);
}

#[test]
fn test_unfiltered_array_contents() {
    let bytes = packet().contents_array().build();
    assert!(!first_content_has_filter(&bytes));

    let doc = parse_bytes(&bytes).unwrap();
    assert!(doc.pages[1].plain_text().contains("A987654321"));
    assert_packet_findings(&bytes);
}

#[test]
fn test_flate_compressed_streams() {
    let bytes = packet().compressed().build();
    assert!(first_content_has_filter(&bytes));
    assert_packet_findings(&bytes);

    let bytes = packet().compressed().contents_array().build();
    assert!(first_content_has_filter(&bytes));
    assert_packet_findings(&bytes);
}

#[test]
fn test_array_contents_are_not_blank() {
    let bytes = PdfBuilder::new()
        .text_page(&["A-Number A123456789"])
        .contents_array()
        .build();
    let report = run_checks(&bytes, &[names::A_NUMBER_CONSISTENCY]).unwrap();
    assert!(report.is_clean());
}
