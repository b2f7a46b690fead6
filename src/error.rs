//! Error types for the xltree library.

use std::io;
use thiserror::Error;

/// Result type alias for xltree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a workbook or building a tree.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required workbook component is missing from the archive.
    #[error("Missing workbook component: {0}")]
    MissingComponent(String),

    /// The requested sheet name is absent from the workbook.
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// The builder was called with a non-positive level count.
    #[error("Invalid level count: {0} (must be at least 1)")]
    InvalidLevels(usize),

    /// A multi-value metadata field holds a value that cannot be split.
    #[error("Malformed metadata in field '{field}': {reason}")]
    MalformedMetadata {
        /// Name of the offending field.
        field: String,
        /// What was wrong with the source value.
        reason: String,
    },

    /// Error while serializing the output.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
