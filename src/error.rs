//! Error types for the photo watermarker

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for watermarker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo watermarker
///
/// `InvalidInput`, `OutputDir` and `Listing` abort the whole run. Every
/// other variant is confined to the file that raised it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Provided path is not a directory: {path}")]
    InvalidInput { path: PathBuf },

    #[error("Could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not list files in the directory {path}: {source}")]
    Listing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No capture date in {path}")]
    NoDateInfo { path: PathBuf },

    #[error("Not a supported image: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid color value: '{value}'")]
    InvalidColor { value: String },

    #[error("Failed to decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode image {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("Cannot determine output format for {path}")]
    UnknownFormat { path: PathBuf },

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error ends the run instead of a single file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. } | Error::OutputDir { .. } | Error::Listing { .. }
        )
    }

    /// Whether this outcome is a deliberate skip rather than a failure
    ///
    /// Undecodable content counts as "not a supported image".
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Error::NoDateInfo { .. } | Error::UnsupportedFormat { .. } | Error::Decode { .. }
        )
    }
}
