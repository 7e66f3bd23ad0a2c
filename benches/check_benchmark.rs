//! Benchmarks for formcheck parsing and check performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic form packets.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use formcheck::{CheckRunner, ParseOptions, PdfParser};

/// Creates a synthetic form packet with the given number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for i in 0..page_count {
        let content_obj = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_obj
        ));

        let text = format!(
            "BT /F1 10 Tf 72 720 Td (Form I-130 Edition Date 02/13/19) Tj ET \
             BT /F1 10 Tf 72 700 Td (A-Number A123456789) Tj ET \
             BT /F1 10 Tf 72 500 Td (Signature of Petitioner) Tj ET \
             BT /F1 10 Tf 72 485 Td (Date: 01/15/2024) Tj ET \
             BT /F1 10 Tf 450 40 Td (Page {} of {}) Tj ET",
            i + 1,
            page_count
        );
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            text.len(),
            text
        ));
    }

    let mut content = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(content.len());
        content.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = content.len();
    content.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    content.push_str("0000000000 65535 f \n");
    for offset in offsets {
        content.push_str(&format!("{:010} 00000 n \n", offset));
    }
    content.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    content.into_bytes()
}

/// Benchmark PDF format detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| formcheck::detect_format_from_bytes(black_box(&pdf_data)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| formcheck::detect_format_from_bytes(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark text extraction at various sizes.
fn bench_pdf_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf_parsing");

    for page_count in [1, 10, 50].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let options = ParseOptions::new().lenient();
                PdfParser::from_bytes_with_options(black_box(&data), options)
                    .and_then(|parser| parser.parse())
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark running every check against an already parsed document.
fn bench_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("checks");
    let runner = CheckRunner::default();

    for page_count in [1, 10, 50].iter() {
        let data = create_test_pdf(*page_count);
        let doc = runner.open(&data).unwrap();

        group.bench_function(format!("all_{}_pages", page_count), |b| {
            b.iter(|| runner.run_document(black_box(&doc), &["all"]));
        });
    }

    group.finish();
}

/// Benchmark the full open-and-check path.
fn bench_full_run(c: &mut Criterion) {
    let data = create_test_pdf(10);
    let runner = CheckRunner::default();

    c.bench_function("run_all_10_pages", |b| {
        b.iter(|| runner.run(black_box(&data), &["all"]).unwrap());
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_pdf_parsing,
    bench_checks,
    bench_full_run,
);
criterion_main!(benches);
