mod wrap;

pub use wrap::wrap_text;

use crate::error::Error;
use crate::fonts::FontMetrics;
use crate::model::{Document, FontModel, Line, Page, PageGeometry, Paragraph, PlacedLine};

/// Vertical write position on the active page, measured from the top of the
/// content area.
#[derive(Clone, Copy, Debug, Default)]
struct Cursor {
    y: f32,
}

/// Single-run flow state: finished pages, the open page and its cursor.
struct Flow {
    pages: Vec<Page>,
    current: Page,
    cursor: Cursor,
    content_height: f32,
    line_advance: f32,
}

impl Flow {
    fn new(content_height: f32, line_advance: f32) -> Self {
        Flow {
            pages: Vec::new(),
            current: Page::default(),
            cursor: Cursor::default(),
            content_height,
            line_advance,
        }
    }

    fn place(&mut self, line: Line) {
        // An empty page always takes the line, even one taller than the page
        if !self.current.is_empty() && self.cursor.y + self.line_advance > self.content_height {
            self.pages.push(std::mem::take(&mut self.current));
            self.cursor = Cursor::default();
        }
        self.current.lines.push(PlacedLine {
            line,
            y: self.cursor.y,
        });
        self.cursor.y += self.line_advance;
    }

    /// Space after a paragraph. Not checked against the page bottom; the
    /// next line's fit test absorbs it.
    fn gap(&mut self, paragraph_gap: f32) {
        self.cursor.y += paragraph_gap;
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Wrap and paginate `paragraphs` with an injected measurement function.
///
/// All lengths are in mm. Returns at least one page; blank paragraphs are
/// skipped without moving the cursor.
pub fn paginate(
    paragraphs: &[Paragraph],
    geometry: &PageGeometry,
    line_advance: f32,
    paragraph_gap: f32,
    measure: impl Fn(&str) -> f32,
) -> Result<Vec<Page>, Error> {
    geometry.validate()?;
    let max_width = geometry.content_width();
    let mut flow = Flow::new(geometry.content_height(), line_advance);

    for para in paragraphs {
        if para.is_blank() {
            continue;
        }
        for line in wrap_text(&para.text, max_width, &measure) {
            flow.place(line);
        }
        flow.gap(paragraph_gap);
    }

    Ok(flow.finish())
}

/// Lay out `paragraphs` on pages of `geometry` using `font`.
///
/// Fails only with [`Error::Configuration`] when the geometry or font
/// settings cannot produce a layout.
pub fn render(
    paragraphs: &[Paragraph],
    geometry: &PageGeometry,
    font: &FontModel,
) -> Result<Document, Error> {
    font.validate()?;
    let metrics = FontMetrics::resolve(font)?;
    let point_size = font.point_size;

    let pages = paginate(
        paragraphs,
        geometry,
        font.line_advance,
        font.paragraph_gap,
        |s| metrics.text_width_mm(s, point_size),
    )?;

    let doc = Document {
        pages,
        geometry: *geometry,
        font: font.clone(),
        title: None,
        metrics,
    };
    log::debug!(
        "Laid out {} paragraphs into {} lines on {} pages",
        paragraphs.len(),
        doc.line_count(),
        doc.page_count()
    );
    Ok(doc)
}
