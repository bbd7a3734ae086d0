use std::path::PathBuf;

use crate::error::Error;
use crate::model::{FontModel, PageGeometry};

/// Everything a conversion can be tuned with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvertOptions {
    pub geometry: PageGeometry,
    pub font: FontModel,
    pub title: Option<String>,
}

fn parse_mm(key: &str, value: &str) -> Result<f32, Error> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("mm").unwrap_or(trimmed).trim();
    number
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Configuration(format!("{key}: expected a number, got {value:?}")))
}

impl ConvertOptions {
    /// Apply one `key=value` override.
    ///
    /// Returns `Ok(false)` for keys this crate does not know; those are left
    /// for the caller to ignore. Values are checked for syntax only; the
    /// resulting geometry is validated when the document is laid out.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<bool, Error> {
        let key = key.trim().to_lowercase().replace('-', "_");
        match key.as_str() {
            "page_width" => self.geometry.page_width = parse_mm(&key, value)?,
            "page_height" => self.geometry.page_height = parse_mm(&key, value)?,
            "margin" => self.geometry.margin = parse_mm(&key, value)?,
            "font" | "family" => self.font.family = value.trim().to_string(),
            "font_size" => self.font.point_size = parse_mm(&key, value)?,
            "line_advance" => self.font.line_advance = parse_mm(&key, value)?,
            "paragraph_gap" => self.font.paragraph_gap = parse_mm(&key, value)?,
            "font_file" => self.font.font_file = Some(PathBuf::from(value.trim())),
            "title" => self.title = Some(value.to_string()),
            _ => {
                log::debug!("Ignoring unknown option {key:?}");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Apply a `key=value` pair as written on the command line.
    pub fn apply_pair(&mut self, pair: &str) -> Result<bool, Error> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::Configuration(format!("expected key=value, got {pair:?}")))?;
        self.apply(key, value)
    }
}
