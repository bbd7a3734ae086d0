mod docx;
mod error;
mod fonts;
mod layout;
mod model;
mod options;
mod pdf;
mod session;

pub use docx::{Extraction, Warning, WarningKind};
pub use error::Error;
pub use fonts::StandardFont;
pub use layout::{paginate, render, wrap_text};
pub use model::{Document, FontModel, Line, MM_TO_PT, Page, PageGeometry, Paragraph, PlacedLine};
pub use options::ConvertOptions;
pub use pdf::serialize;
pub use session::{
    ConversionSession, ConversionState, InvalidTransition, MAX_UPLOAD_BYTES, pdf_file_name,
    validate_upload, validate_upload_file,
};

use std::path::Path;
use std::time::Instant;

/// Finished conversion: PDF bytes plus what the caller may want to report.
#[derive(Debug)]
pub struct Conversion {
    pub pdf: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<Warning>,
}

/// Pipeline checkpoints reported to a progress observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    Extracted { paragraphs: usize, warnings: usize },
    Paginated { pages: usize },
    Serialized { bytes: usize },
}

/// Extract paragraphs from DOCX bytes.
pub fn extract(input: &[u8]) -> Result<Extraction, Error> {
    docx::parse_bytes(input)
}

pub fn convert_docx_bytes(input: &[u8], options: &ConvertOptions) -> Result<Conversion, Error> {
    convert_with_progress(input, options, |_| {})
}

pub fn convert_with_progress(
    input: &[u8],
    options: &ConvertOptions,
    mut observer: impl FnMut(Milestone),
) -> Result<Conversion, Error> {
    let t0 = Instant::now();

    let extraction = docx::parse_bytes(input)?;
    for warning in &extraction.warnings {
        log::warn!("Extraction: {warning}");
    }
    observer(Milestone::Extracted {
        paragraphs: extraction.paragraphs.len(),
        warnings: extraction.warnings.len(),
    });
    let t_parse = t0.elapsed();

    let mut doc = layout::render(&extraction.paragraphs, &options.geometry, &options.font)?;
    doc.title = options.title.clone();
    observer(Milestone::Paginated {
        pages: doc.page_count(),
    });
    let t_layout = t0.elapsed();

    let pdf = pdf::serialize(&doc);
    observer(Milestone::Serialized { bytes: pdf.len() });
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, layout={:.1}ms, serialize={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_layout - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.page_count(),
        pdf.len(),
    );

    Ok(Conversion {
        pdf,
        page_count: doc.page_count(),
        warnings: extraction.warnings,
    })
}

/// Convert a file on disk with `options`, writing the PDF to `output`.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<Conversion, Error> {
    let data = std::fs::read(input)?;
    let conversion = convert_docx_bytes(&data, options)?;
    std::fs::write(output, &conversion.pdf).map_err(Error::Io)?;
    Ok(conversion)
}

pub fn convert_docx_to_pdf(input: &Path, output: &Path) -> Result<(), Error> {
    convert_file(input, output, &ConvertOptions::default()).map(|_| ())
}
