use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::fonts::{to_winansi_bytes, write_font};
use crate::model::{Document, MM_TO_PT, Page};

const FONT_NAME: &[u8] = b"F1";
const PRODUCER: &str = concat!("docxflow-pdf ", env!("CARGO_PKG_VERSION"));

/// Write `doc` as a PDF: one page object per page, one text draw per line.
///
/// The output carries no timestamps, so equal documents give equal bytes.
pub fn serialize(doc: &Document) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let font_id = alloc();

    write_font(&mut pdf, &doc.metrics, font_id, &mut alloc);

    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let page_w = doc.geometry.page_width * MM_TO_PT;
    let page_h = doc.geometry.page_height * MM_TO_PT;

    for (i, page) in doc.pages.iter().enumerate() {
        let raw = page_content(doc, page);
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);

        let mut page_writer = pdf.page(page_ids[i]);
        page_writer
            .media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        page_writer.resources().fonts().pair(Name(FONT_NAME), font_id);
    }

    {
        let mut info = pdf.document_info(info_id);
        info.producer(TextStr(PRODUCER));
        if let Some(title) = &doc.title {
            info.title(TextStr(title));
        }
    }

    let bytes = pdf.finish();
    log::info!("Serialized {n} pages ({} bytes)", bytes.len());
    bytes
}

/// Uncompressed content stream for one page.
fn page_content(doc: &Document, page: &Page) -> Vec<u8> {
    let size = doc.font.point_size;
    let ascent = size * doc.metrics.ascender_ratio;
    let margin = doc.geometry.margin;
    let page_h = doc.geometry.page_height * MM_TO_PT;
    let x = margin * MM_TO_PT;

    let mut content = Content::new();
    for placed in &page.lines {
        // Rows are anchored at their top edge; PDF positions the baseline
        let baseline_y = page_h - (margin + placed.y) * MM_TO_PT - ascent;
        let text_bytes = to_winansi_bytes(&placed.line.text);
        content
            .begin_text()
            .set_font(Name(FONT_NAME), size)
            .next_line(x, baseline_y)
            .show(Str(&text_bytes))
            .end_text();
    }
    content.finish().as_slice().to_vec()
}
