mod common;

use std::path::PathBuf;

use docxflow_pdf::{
    ConversionSession, ConversionState, ConvertOptions, Error, Milestone, Paragraph,
    convert_docx_bytes, convert_with_progress, pdf_file_name, render,
};

fn fixture_font() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/DejaVuSerif.ttf")
}

#[test]
fn short_document_fits_on_one_page() {
    let _ = env_logger::builder().is_test(true).try_init();
    let docx = common::build_docx(&["First paragraph.", "", "Second (and last) paragraph."]);
    let conversion = convert_docx_bytes(&docx, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.page_count, 1);
    assert_eq!(common::pdf_page_count(&conversion.pdf), 1);

    let streams = common::content_streams(&conversion.pdf);
    assert_eq!(streams.len(), 1);
    assert_eq!(
        common::shown_text(&streams[0]),
        ["First paragraph.", "Second (and last) paragraph."]
    );
}

#[test]
fn empty_body_still_produces_a_page() {
    let docx = common::build_docx(&[]);
    let conversion = convert_docx_bytes(&docx, &ConvertOptions::default()).unwrap();
    assert_eq!(conversion.page_count, 1);
    assert_eq!(common::pdf_page_count(&conversion.pdf), 1);
    let streams = common::content_streams(&conversion.pdf);
    assert!(common::shown_text(&streams[0]).is_empty());
}

#[test]
fn short_paragraphs_flow_onto_second_page() {
    // Each one-line paragraph takes 7mm + 3mm gap; 26 fit in 257mm
    let texts: Vec<String> = (1..=40).map(|i| format!("Paragraph {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let docx = common::build_docx(&refs);
    let conversion = convert_docx_bytes(&docx, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.page_count, 2);
    let streams = common::content_streams(&conversion.pdf);
    let page1 = common::shown_text(&streams[0]);
    let page2 = common::shown_text(&streams[1]);
    assert_eq!(page1.len(), 26);
    assert_eq!(page2.len(), 14);
    assert_eq!(page2[0], "Paragraph 27");

    for stream in &streams {
        let ys = common::baselines(stream);
        assert!(ys.windows(2).all(|w| w[1] < w[0]), "baselines must move down the page");
    }
}

#[test]
fn tables_are_flattened_with_warning() {
    let docx = common::build_docx_xml(
        r#"<w:tbl><w:tr>
           <w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc>
           <w:tc><w:p><w:r><w:t>Value</w:t></w:r></w:p></w:tc>
           </w:tr></w:tbl>"#,
    );
    let conversion = convert_docx_bytes(&docx, &ConvertOptions::default()).unwrap();
    assert_eq!(conversion.warnings.len(), 1);
    let streams = common::content_streams(&conversion.pdf);
    assert_eq!(common::shown_text(&streams[0]), ["Name", "Value"]);
}

#[test]
fn corrupt_input_is_an_extraction_error() {
    let err = convert_docx_bytes(b"PK\x03\x04 truncated", &ConvertOptions::default()).unwrap_err();
    assert!(err.is_extraction());
    assert_eq!(
        err.user_message(),
        "Failed to convert document. Please ensure it's a valid Word file."
    );
}

#[test]
fn bad_geometry_is_a_configuration_error() {
    let mut options = ConvertOptions::default();
    options.apply("margin", "120").unwrap();
    let docx = common::build_docx(&["text"]);
    let err = convert_docx_bytes(&docx, &options).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn milestones_arrive_in_order() {
    let docx = common::build_docx(&["one", "two"]);
    let mut seen = Vec::new();
    let conversion =
        convert_with_progress(&docx, &ConvertOptions::default(), |m| seen.push(m)).unwrap();
    assert_eq!(
        seen,
        [
            Milestone::Extracted {
                paragraphs: 2,
                warnings: 0
            },
            Milestone::Paginated { pages: 1 },
            Milestone::Serialized {
                bytes: conversion.pdf.len()
            },
        ]
    );
}

#[test]
fn conversion_is_deterministic() {
    let docx = common::build_docx(&["same input", "same output"]);
    let a = convert_docx_bytes(&docx, &ConvertOptions::default()).unwrap();
    let b = convert_docx_bytes(&docx, &ConvertOptions::default()).unwrap();
    assert_eq!(a.pdf, b.pdf);
}

#[test]
fn title_is_written_to_document_info() {
    let mut options = ConvertOptions::default();
    options.apply_pair("title=Quarterly").unwrap();
    let docx = common::build_docx(&["body"]);
    let conversion = convert_docx_bytes(&docx, &options).unwrap();
    let text = String::from_utf8_lossy(&conversion.pdf);
    assert!(text.contains("/Title (Quarterly)"));
    assert!(text.contains("/Producer (docxflow-pdf"));
}

#[test]
fn times_font_is_referenced() {
    let mut options = ConvertOptions::default();
    options.apply("font", "Times New Roman").unwrap();
    let docx = common::build_docx(&["serif text"]);
    let conversion = convert_docx_bytes(&docx, &options).unwrap();
    assert!(String::from_utf8_lossy(&conversion.pdf).contains("/BaseFont /Times-Roman"));
}

#[test]
fn truetype_font_is_embedded() {
    let mut options = ConvertOptions::default();
    options.font.font_file = Some(fixture_font());
    let text = "Embedded faces drive both measurement and drawing, \
                so wrapped lines must still fit the content width.";
    let paragraphs: Vec<String> = (0..6).map(|_| text.repeat(3)).collect();
    let refs: Vec<&str> = paragraphs.iter().map(String::as_str).collect();

    let conversion = convert_docx_bytes(&common::build_docx(&refs), &options).unwrap();
    let pdf = String::from_utf8_lossy(&conversion.pdf);
    assert!(pdf.contains("/Subtype /TrueType"));
    assert!(pdf.contains("/FontFile2"));
    assert!(pdf.contains("/BaseFont /DejaVuSerif"));
    assert!(pdf.contains("/Widths ["));

    let streams = common::content_streams(&conversion.pdf);
    assert_eq!(streams.len(), conversion.page_count);
    assert_eq!(common::shown_text(&streams[0])[0].split(' ').next(), Some("Embedded"));
}

#[test]
fn truetype_lines_fit_content_width() {
    let mut options = ConvertOptions::default();
    options.font.font_file = Some(fixture_font());
    let paragraphs: Vec<Paragraph> = (1..=12)
        .map(|i| Paragraph::new("Sphinx of black quartz, judge my vow. ".repeat(i)))
        .collect();

    let doc = render(&paragraphs, &options.geometry, &options.font).unwrap();
    assert!(doc.line_count() > paragraphs.len());
    for page in &doc.pages {
        for placed in &page.lines {
            assert!(placed.line.width > 0.0);
            assert!(
                placed.line.fits(options.geometry.content_width()),
                "{:?} overflows",
                placed.line.text
            );
        }
    }
}

#[test]
fn session_runs_end_to_end() {
    let docx = common::build_docx(&["hello"]);
    let mut session = ConversionSession::new(ConvertOptions::default());
    let state = session.run("Report.DOCX", &docx);
    let ConversionState::Success {
        pdf, page_count, ..
    } = state
    else {
        panic!("expected success, got {state:?}");
    };
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(*page_count, 1);
    assert_eq!(state.download_name().as_deref(), Some("Report.pdf"));

    // A failed run can be followed by a fresh one
    session.run("broken.docx", b"nope");
    assert!(matches!(session.state(), ConversionState::Error { .. }));
    assert!(matches!(
        session.run("again.docx", &docx),
        ConversionState::Success { .. }
    ));
}

#[test]
fn download_names() {
    assert_eq!(pdf_file_name("report.docx"), "report.pdf");
    assert_eq!(pdf_file_name("notes.DOC"), "notes.pdf");
}
