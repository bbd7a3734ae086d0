#![allow(dead_code)]

use std::io::{Cursor, Write};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Minimal DOCX whose body is one single-run paragraph per entry.
pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            format!(
                r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                xml_escape(p)
            )
        })
        .collect();
    build_docx_xml(&body)
}

/// DOCX with `body` placed verbatim inside `w:body`.
pub fn build_docx_xml(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{WML_NS}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(content_types.as_bytes()).unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn pdf_page_count(pdf: &[u8]) -> usize {
    let text = String::from_utf8_lossy(pdf);
    text.matches("/Type /Page").count() - text.matches("/Type /Pages").count()
}

/// Inflate every Flate-compressed stream, in file order.
pub fn content_streams(pdf: &[u8]) -> Vec<String> {
    let mut streams = Vec::new();
    let mut pos = 0;
    while let Some(offset) = find(&pdf[pos..], b"stream\n") {
        let start = pos + offset;
        pos = start + b"stream\n".len();
        if pdf[..start].ends_with(b"end") {
            continue;
        }
        let Some(len) = find(&pdf[pos..], b"\nendstream") else {
            break;
        };
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(&pdf[pos..pos + len]) {
            streams.push(String::from_utf8_lossy(&raw).into_owned());
        }
        pos += len;
    }
    streams
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Text shown with `Tj` in a content stream, one entry per draw.
pub fn shown_text(stream: &str) -> Vec<String> {
    stream
        .lines()
        .filter(|l| l.ends_with("Tj"))
        .filter_map(|l| {
            let open = l.find('(')?;
            let close = l.rfind(')')?;
            Some(
                l[open + 1..close]
                    .replace("\\(", "(")
                    .replace("\\)", ")")
                    .replace("\\\\", "\\"),
            )
        })
        .collect()
}

/// Baseline y of each `Td` in a content stream.
pub fn baselines(stream: &str) -> Vec<f32> {
    stream
        .lines()
        .filter(|l| l.ends_with("Td"))
        .filter_map(|l| l.split_whitespace().nth(1)?.parse().ok())
        .collect()
}
