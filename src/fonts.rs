use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;
use crate::model::{FontModel, MM_TO_PT};

/// The base-14 fonts we can reference without embedding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    TimesRoman,
    Courier,
}

impl StandardFont {
    /// Map a family name (or common alias) to a standard font.
    pub fn from_family(family: &str) -> Option<Self> {
        match family.trim().to_lowercase().as_str() {
            "helvetica" | "arial" | "sans-serif" | "sans" => Some(StandardFont::Helvetica),
            "times" | "times-roman" | "times new roman" | "serif" => Some(StandardFont::TimesRoman),
            "courier" | "courier new" | "monospace" | "mono" => Some(StandardFont::Courier),
            _ => None,
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::Courier => "Courier",
        }
    }

    fn ascender(self) -> f32 {
        match self {
            StandardFont::Helvetica => 718.0,
            StandardFont::TimesRoman => 683.0,
            StandardFont::Courier => 629.0,
        }
    }

    /// AFM advance widths at 1000 units/em for WinAnsi 32..=255.
    /// ASCII is exact; the upper half uses a per-font average.
    fn widths(self) -> Vec<f32> {
        let (ascii, fallback) = match self {
            StandardFont::Helvetica => (&HELVETICA_ASCII, 556.0),
            StandardFont::TimesRoman => (&TIMES_ASCII, 500.0),
            StandardFont::Courier => (&COURIER_ASCII, 600.0),
        };
        (32u8..=255u8)
            .map(|b| match b {
                32..=126 => ascii[(b - 32) as usize] as f32,
                0xA0 => ascii[0] as f32, // no-break space
                0x95 => 350.0,           // bullet
                _ => fallback,
            })
            .collect()
    }
}

#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const TIMES_ASCII: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

const COURIER_ASCII: [u16; 95] = [600; 95];

#[derive(Clone)]
pub(crate) enum FontSource {
    Standard(StandardFont),
    TrueType {
        ps_name: String,
        data: Vec<u8>,
        face_index: u32,
    },
}

/// Resolved metrics for the single document font.
#[derive(Clone)]
pub(crate) struct FontMetrics {
    pub(crate) source: FontSource,
    /// Advance widths at 1000 units/em, indexed by WinAnsi byte - 32.
    pub(crate) widths_1000: Vec<f32>,
    pub(crate) ascender_ratio: f32,
}

impl FontMetrics {
    pub(crate) fn standard(font: StandardFont) -> Self {
        FontMetrics {
            source: FontSource::Standard(font),
            widths_1000: font.widths(),
            ascender_ratio: font.ascender() / 1000.0,
        }
    }

    pub(crate) fn resolve(font: &FontModel) -> Result<Self, Error> {
        if let Some(path) = &font.font_file {
            let data = std::fs::read(path).map_err(|e| {
                Error::Configuration(format!("cannot read font file {}: {e}", path.display()))
            })?;
            return Self::truetype(&font.family, data, 0);
        }
        match StandardFont::from_family(&font.family) {
            Some(std) => Ok(Self::standard(std)),
            None => {
                log::warn!("Font not found: {} — using Helvetica", font.family);
                Ok(Self::standard(StandardFont::Helvetica))
            }
        }
    }

    pub(crate) fn truetype(fallback_name: &str, data: Vec<u8>, face_index: u32) -> Result<Self, Error> {
        let face = Face::parse(&data, face_index)
            .map_err(|e| Error::Configuration(format!("unusable font file: {e}")))?;
        let units = face.units_per_em() as f32;

        let widths_1000: Vec<f32> = (32u8..=255u8)
            .map(|byte| {
                face.glyph_index(winansi_to_char(byte))
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * 1000.0)
                    .unwrap_or(0.0)
            })
            .collect();
        let ascender_ratio = face.ascender() as f32 / units;
        let family = font_family_name(&face).unwrap_or_else(|| fallback_name.to_string());
        let ps_name: String = family.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect();

        Ok(FontMetrics {
            source: FontSource::TrueType {
                ps_name,
                data,
                face_index,
            },
            widths_1000,
            ascender_ratio,
        })
    }

    pub(crate) fn base_font(&self) -> &str {
        match &self.source {
            FontSource::Standard(std) => std.base_font(),
            FontSource::TrueType { ps_name, .. } => ps_name,
        }
    }

    /// Width of `text` in mm when set at `point_size`.
    /// Characters outside WinAnsi are skipped, exactly as they are when drawn.
    pub(crate) fn text_width_mm(&self, text: &str, point_size: f32) -> f32 {
        let units: f32 = to_winansi_bytes(text)
            .iter()
            .map(|&b| self.widths_1000[(b - 32) as usize])
            .sum();
        units * point_size / 1000.0 / MM_TO_PT
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    // ID 1 (Family) rather than 16 (Typographic Family)
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Control characters and anything outside WinAnsi are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match c as u32 {
            0x0000..=0x001F => None,
            0x0020..=0x007F => Some(c as u8),
            0x00A0..=0x00FF => Some(c as u8),
            0x20AC => Some(0x80),
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85),
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95),
            0x2013 => Some(0x96),
            0x2014 => Some(0x97),
            0x02DC => Some(0x98),
            0x2122 => Some(0x99),
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        })
        .collect()
}

/// Write the font dictionary for `metrics` at `font_ref`.
/// TrueType faces are embedded whole; standard fonts are referenced by name.
pub(crate) fn write_font(
    pdf: &mut Pdf,
    metrics: &FontMetrics,
    font_ref: Ref,
    alloc: &mut impl FnMut() -> Ref,
) {
    match &metrics.source {
        FontSource::Standard(_) => {
            pdf.type1_font(font_ref)
                .base_font(Name(metrics.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
        FontSource::TrueType {
            ps_name,
            data,
            face_index,
        } => {
            let descriptor_ref = alloc();
            let data_ref = alloc();
            if !embed_truetype(pdf, font_ref, descriptor_ref, data_ref, ps_name, data, *face_index, &metrics.widths_1000) {
                log::warn!("Could not embed {ps_name} — using Helvetica");
                pdf.type1_font(font_ref)
                    .base_font(Name(b"Helvetica"))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    descriptor_ref: Ref,
    data_ref: Ref,
    ps_name: &str,
    font_data: &[u8],
    face_index: u32,
    widths: &[f32],
) -> bool {
    let Ok(face) = Face::parse(font_data, face_index) else {
        return false;
    };
    let Ok(data_len) = i32::try_from(font_data.len()) else {
        return false;
    };

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    pdf.stream(data_ref, font_data)
        .pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let mut d = pdf.indirect(font_ref).dict();
    d.pair(Name(b"Type"), Name(b"Font"));
    d.pair(Name(b"Subtype"), Name(b"TrueType"));
    d.pair(Name(b"BaseFont"), Name(ps_name.as_bytes()));
    d.pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
    d.pair(Name(b"FirstChar"), 32i32);
    d.pair(Name(b"LastChar"), 255i32);
    d.pair(Name(b"FontDescriptor"), descriptor_ref);
    d.insert(Name(b"Widths"))
        .array()
        .items(widths.iter().copied());
    true
}
