use clap::Parser;
use std::path::PathBuf;

use docxflow_pdf::{ConvertOptions, validate_upload_file};

#[derive(Parser)]
#[command(name = "docxflow-pdf", about = "Reflow the text of a DOCX file into a paginated PDF")]
struct Args {
    /// Input DOCX file
    input: PathBuf,
    /// Output PDF file (defaults to input with .pdf extension)
    output: Option<PathBuf>,
    /// Page width in mm
    #[arg(long)]
    page_width: Option<f32>,
    /// Page height in mm
    #[arg(long)]
    page_height: Option<f32>,
    /// Margin on all sides in mm
    #[arg(long)]
    margin: Option<f32>,
    /// Font family (helvetica, times, courier)
    #[arg(long)]
    font: Option<String>,
    /// TrueType/OpenType font to embed instead of a standard font
    #[arg(long)]
    font_file: Option<PathBuf>,
    /// Font size in points
    #[arg(long)]
    font_size: Option<f32>,
    /// Extra option as key=value; unknown keys are ignored
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

impl Args {
    fn options(&self) -> Result<ConvertOptions, docxflow_pdf::Error> {
        let mut opts = ConvertOptions::default();
        if let Some(v) = self.page_width {
            opts.geometry.page_width = v;
        }
        if let Some(v) = self.page_height {
            opts.geometry.page_height = v;
        }
        if let Some(v) = self.margin {
            opts.geometry.margin = v;
        }
        if let Some(v) = &self.font {
            opts.font.family = v.clone();
        }
        if let Some(v) = &self.font_file {
            opts.font.font_file = Some(v.clone());
        }
        if let Some(v) = self.font_size {
            opts.font.point_size = v;
        }
        for pair in &self.set {
            if !opts.apply_pair(pair)? {
                log::warn!("Ignoring unknown option: {pair}");
            }
        }
        Ok(opts)
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: file not found: {}", args.input.display());
        std::process::exit(1);
    }
    if let Err(e) = validate_upload_file(&args.input) {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let options = match args.options() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let output = args.output.clone().unwrap_or_else(|| {
        args.input
            .with_file_name(docxflow_pdf::pdf_file_name(&file_name))
    });

    match docxflow_pdf::convert_file(&args.input, &output, &options) {
        Ok(conversion) => {
            log::info!(
                "Wrote {} ({} pages)",
                output.display(),
                conversion.page_count
            );
        }
        Err(e) => {
            if e.is_extraction() {
                log::debug!("{e}");
            }
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}
