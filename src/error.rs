use std::fmt;

pub(crate) const EXTRACTION_FAILED: &str =
    "Failed to convert document. Please ensure it's a valid Word file.";

#[derive(Debug)]
pub enum Error {
    /// Rejected before conversion (wrong extension, too large).
    Validation(String),
    InvalidDocx(String),
    Zip(zip::result::ZipError),
    Xml(roxmltree::Error),
    /// Page geometry or font settings that cannot produce a layout.
    Configuration(String),
    Io(std::io::Error),
}

impl Error {
    /// True for failures caused by an unreadable input document.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Error::InvalidDocx(_) | Error::Zip(_) | Error::Xml(_))
    }

    /// Message suitable for showing to the person who supplied the file.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            e if e.is_extraction() => EXTRACTION_FAILED.to_string(),
            e => e.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(reason) => write!(f, "{reason}"),
            Error::InvalidDocx(reason) => write!(f, "not a valid DOCX file: {reason}"),
            Error::Zip(e) => write!(f, "ZIP error: {e}"),
            Error::Xml(e) => write!(f, "XML error: {e}"),
            Error::Configuration(reason) => write!(f, "invalid configuration: {reason}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Zip(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
