use std::fmt;
use std::io::{Cursor, Read};

use crate::error::Error;
use crate::model::Paragraph;

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_MAGIC: &[u8] = b"PK";

/// Content the extractor saw but could not carry over as plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningKind {
    ImageDropped,
    TextBoxDropped,
    EmbeddedObjectDropped,
    TableFlattened,
    HeaderFooterIgnored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub count: usize,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::ImageDropped => "image(s) dropped",
            WarningKind::TextBoxDropped => "text box(es) dropped",
            WarningKind::EmbeddedObjectDropped => "embedded object(s) dropped",
            WarningKind::TableFlattened => "table(s) flattened into paragraphs",
            WarningKind::HeaderFooterIgnored => "header/footer part(s) ignored",
        };
        write!(f, "{} {what}", self.count)
    }
}

/// Paragraph text in document order plus non-fatal warnings.
#[derive(Debug, Default)]
pub struct Extraction {
    pub paragraphs: Vec<Paragraph>,
    pub warnings: Vec<Warning>,
}

impl Extraction {
    fn warn(&mut self, kind: WarningKind) {
        self.warn_n(kind, 1);
    }

    fn warn_n(&mut self, kind: WarningKind, n: usize) {
        match self.warnings.iter_mut().find(|w| w.kind == kind) {
            Some(w) => w.count += n,
            None => self.warnings.push(Warning { kind, count: n }),
        }
    }
}

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

fn has_text_box(node: roxmltree::Node) -> bool {
    node.descendants()
        .any(|n| n.tag_name().name() == "txbxContent" || n.tag_name().name() == "textbox")
}

pub fn parse_bytes(data: &[u8]) -> Result<Extraction, Error> {
    if data.starts_with(OLE_MAGIC) {
        return Err(Error::InvalidDocx(
            "legacy binary .doc format is not supported, save it as .docx".into(),
        ));
    }
    if !data.starts_with(ZIP_MAGIC) {
        return Err(Error::InvalidDocx("not a ZIP container".into()));
    }

    let mut zip = zip::ZipArchive::new(Cursor::new(data))?;

    let header_footer_parts = zip
        .file_names()
        .filter(|n| n.starts_with("word/header") || n.starts_with("word/footer"))
        .count();

    let mut xml_content = String::new();
    zip.by_name("word/document.xml")
        .map_err(|_| Error::InvalidDocx("missing word/document.xml".into()))?
        .read_to_string(&mut xml_content)?;

    let xml = roxmltree::Document::parse(&xml_content)?;
    let root = xml.root_element();
    let body = wml(root, "body").ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;

    let mut out = Extraction::default();
    collect_blocks(body, &mut out);
    if header_footer_parts > 0 {
        out.warn_n(WarningKind::HeaderFooterIgnored, header_footer_parts);
    }
    Ok(out)
}

/// Walk block-level content. Table cells and content controls are descended
/// into so their paragraphs come out in reading order.
fn collect_blocks(node: roxmltree::Node, out: &mut Extraction) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "p" => {
                let mut text = String::new();
                collect_text(child, &mut text, out);
                out.paragraphs.push(Paragraph::from(text));
            }
            "tbl" => {
                out.warn(WarningKind::TableFlattened);
                collect_blocks(child, out);
            }
            "tr" | "tc" | "sdt" | "sdtContent" | "customXml" | "ins" | "moveTo" => {
                collect_blocks(child, out)
            }
            _ => {}
        }
    }
}

/// Append the visible text of an inline subtree to `text`.
fn collect_text(node: roxmltree::Node, text: &mut String, out: &mut Extraction) {
    for child in node.children().filter(|n| n.is_element()) {
        let name = child.tag_name().name();
        match child.tag_name().namespace() {
            Some(WML_NS) => match name {
                "t" => text.push_str(child.text().unwrap_or("")),
                "tab" => text.push('\t'),
                "br" | "cr" => text.push(' '),
                "noBreakHyphen" => text.push('-'),
                "drawing" | "pict" => {
                    if has_text_box(child) {
                        out.warn(WarningKind::TextBoxDropped);
                    } else {
                        out.warn(WarningKind::ImageDropped);
                    }
                }
                "object" => out.warn(WarningKind::EmbeddedObjectDropped),
                // properties, deletions, field instructions
                "pPr" | "rPr" | "del" | "moveFrom" | "instrText" | "fldChar" | "softHyphen" => {}
                _ => collect_text(child, text, out),
            },
            // Only the preferred alternative, so nothing is counted twice
            Some(MC_NS) if name == "AlternateContent" => {
                if let Some(choice) = child
                    .children()
                    .find(|n| n.is_element() && n.tag_name().name() == "Choice")
                {
                    collect_text(choice, text, out);
                }
            }
            _ => {}
        }
    }
}
