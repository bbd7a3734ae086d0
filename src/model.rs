use std::path::PathBuf;

use crate::error::Error;
use crate::fonts::FontMetrics;

/// Points per millimeter.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// One block of extracted plain text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph { text: text.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Paragraph {
    fn from(text: &str) -> Self {
        Paragraph::new(text)
    }
}

impl From<String> for Paragraph {
    fn from(text: String) -> Self {
        Paragraph { text }
    }
}

/// Page size and uniform margin, all in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 portrait
        PageGeometry {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    pub fn validate(&self) -> Result<(), Error> {
        // NaN fails both comparisons, so it is rejected too
        if !(self.content_width() > 0.0) {
            return Err(Error::Configuration(format!(
                "content width must be positive (page width {}mm, margin {}mm)",
                self.page_width, self.margin
            )));
        }
        if !(self.content_height() > 0.0) {
            return Err(Error::Configuration(format!(
                "content height must be positive (page height {}mm, margin {}mm)",
                self.page_height, self.margin
            )));
        }
        Ok(())
    }
}

/// Font and vertical rhythm shared by every output line.
#[derive(Clone, Debug, PartialEq)]
pub struct FontModel {
    pub family: String,
    pub point_size: f32,
    /// Vertical advance per line in mm, independent of `point_size`.
    pub line_advance: f32,
    /// Extra space after a paragraph's last line in mm.
    pub paragraph_gap: f32,
    /// TrueType/OpenType file used instead of a standard PDF font.
    pub font_file: Option<PathBuf>,
}

impl Default for FontModel {
    fn default() -> Self {
        FontModel {
            family: String::from("helvetica"),
            point_size: 12.0,
            line_advance: 7.0,
            paragraph_gap: 3.0,
            font_file: None,
        }
    }
}

impl FontModel {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.point_size > 0.0) {
            return Err(Error::Configuration(format!(
                "font size must be positive, got {}",
                self.point_size
            )));
        }
        if !(self.line_advance > 0.0) {
            return Err(Error::Configuration(format!(
                "line advance must be positive, got {}",
                self.line_advance
            )));
        }
        if !(self.paragraph_gap >= 0.0) {
            return Err(Error::Configuration(format!(
                "paragraph gap must not be negative, got {}",
                self.paragraph_gap
            )));
        }
        Ok(())
    }
}

/// One wrapped row of text. `width` is in mm.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
}

impl Line {
    /// False only for a single word wider than `max_width`, which is never split.
    pub fn fits(&self, max_width: f32) -> bool {
        self.width <= max_width
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub line: Line,
    /// Offset from the top of the content area (mm), taken before the line advance.
    pub y: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub struct Document {
    pub pages: Vec<Page>,
    pub geometry: PageGeometry,
    pub font: FontModel,
    /// Written to the PDF document info dictionary.
    pub title: Option<String>,
    pub(crate) metrics: FontMetrics,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}
