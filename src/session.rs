use std::fmt;
use std::path::Path;

use crate::error::Error;
use crate::options::ConvertOptions;
use crate::{Conversion, convert_docx_bytes};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const INVALID_EXTENSION: &str = "Please select a valid Word document (.doc or .docx)";
const FILE_TOO_LARGE: &str = "File size must be less than 10MB";

/// `name` without a trailing `.doc`/`.docx` (any case), if it has one.
fn word_stem(name: &str) -> Option<&str> {
    let lower = name.to_ascii_lowercase();
    [".docx", ".doc"]
        .into_iter()
        .find(|ext| lower.ends_with(ext))
        .map(|ext| &name[..name.len() - ext.len()])
}

/// Admission check run before any extraction.
pub fn validate_upload(file_name: &str, size_bytes: u64) -> Result<(), Error> {
    if word_stem(file_name).is_none() {
        return Err(Error::Validation(INVALID_EXTENSION.into()));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(Error::Validation(FILE_TOO_LARGE.into()));
    }
    Ok(())
}

/// Admission check for a file on disk. Unreadable metadata is an error,
/// never a pass.
pub fn validate_upload_file(path: &Path) -> Result<(), Error> {
    let meta = std::fs::metadata(path)?;
    if !meta.is_file() {
        return Err(Error::Validation(format!("not a file: {}", path.display())));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    validate_upload(&name, meta.len())
}

/// Download name for a converted file: `report.DOCX` becomes `report.pdf`.
pub fn pdf_file_name(file_name: &str) -> String {
    match word_stem(file_name) {
        Some(stem) => format!("{stem}.pdf"),
        None => format!("{file_name}.pdf"),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConversionState {
    Idle,
    Uploading {
        file_name: String,
    },
    Converting {
        file_name: String,
    },
    Success {
        file_name: String,
        pdf: Vec<u8>,
        page_count: usize,
    },
    Error {
        message: String,
    },
}

impl ConversionState {
    fn name(&self) -> &'static str {
        match self {
            ConversionState::Idle => "idle",
            ConversionState::Uploading { .. } => "uploading",
            ConversionState::Converting { .. } => "converting",
            ConversionState::Success { .. } => "success",
            ConversionState::Error { .. } => "error",
        }
    }

    /// Coarse progress in percent.
    pub fn progress(&self) -> u8 {
        match self {
            ConversionState::Idle | ConversionState::Error { .. } => 0,
            ConversionState::Uploading { .. } => 25,
            ConversionState::Converting { .. } => 50,
            ConversionState::Success { .. } => 100,
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            ConversionState::Idle => "",
            ConversionState::Uploading { .. } => "Uploading file...",
            ConversionState::Converting { .. } => "Converting to PDF...",
            ConversionState::Success { .. } => "Conversion complete!",
            ConversionState::Error { .. } => "Conversion failed",
        }
    }

    pub fn download_name(&self) -> Option<String> {
        match self {
            ConversionState::Success { file_name, .. } => Some(pdf_file_name(file_name)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: &'static str,
    pub action: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} while {}", self.action, self.from)
    }
}

impl std::error::Error for InvalidTransition {}

/// Drives one file at a time through idle → uploading → converting → success/error.
pub struct ConversionSession {
    state: ConversionState,
    options: ConvertOptions,
}

impl ConversionSession {
    pub fn new(options: ConvertOptions) -> Self {
        ConversionSession {
            state: ConversionState::Idle,
            options,
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    fn invalid(&self, action: &'static str) -> InvalidTransition {
        InvalidTransition {
            from: self.state.name(),
            action,
        }
    }

    /// Accept a file. A rejected file moves the session to `Error`.
    pub fn begin(&mut self, file_name: &str, size_bytes: u64) -> Result<(), InvalidTransition> {
        if self.state != ConversionState::Idle {
            return Err(self.invalid("begin"));
        }
        self.state = match validate_upload(file_name, size_bytes) {
            Ok(()) => ConversionState::Uploading {
                file_name: file_name.to_string(),
            },
            Err(e) => ConversionState::Error {
                message: e.user_message(),
            },
        };
        Ok(())
    }

    pub fn start_converting(&mut self) -> Result<(), InvalidTransition> {
        let ConversionState::Uploading { file_name } = &self.state else {
            return Err(self.invalid("start converting"));
        };
        self.state = ConversionState::Converting {
            file_name: file_name.clone(),
        };
        Ok(())
    }

    pub fn finish(&mut self, result: Result<Conversion, Error>) -> Result<(), InvalidTransition> {
        let ConversionState::Converting { file_name } = &self.state else {
            return Err(self.invalid("finish"));
        };
        self.state = match result {
            Ok(conversion) => ConversionState::Success {
                file_name: file_name.clone(),
                pdf: conversion.pdf,
                page_count: conversion.page_count,
            },
            Err(e) => {
                log::error!("Conversion of {file_name} failed: {e}");
                ConversionState::Error {
                    message: e.user_message(),
                }
            }
        };
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = ConversionState::Idle;
    }

    /// Run a whole conversion from a fresh state.
    pub fn run(&mut self, file_name: &str, data: &[u8]) -> &ConversionState {
        self.reset();
        if let Err(e) = self.begin(file_name, data.len() as u64) {
            log::error!("{e}");
            return &self.state;
        }
        if !matches!(self.state, ConversionState::Uploading { .. }) {
            return &self.state;
        }
        if let Err(e) = self.start_converting() {
            log::error!("{e}");
            return &self.state;
        }
        let result = convert_docx_bytes(data, &self.options);
        if let Err(e) = self.finish(result) {
            log::error!("{e}");
        }
        &self.state
    }
}
