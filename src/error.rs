//! Error types for certbatch library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for certbatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating certificates.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required input file (names list or template) does not exist.
    #[error("Input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The names file could not be decoded as UTF-8 text.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// The template image could not be decoded.
    #[error("Cannot load template image {}: {reason}", .path.display())]
    ImageLoad { path: PathBuf, reason: String },

    /// The font file is missing or malformed.
    #[error("Cannot load font {}: {reason}", .path.display())]
    FontLoad { path: PathBuf, reason: String },

    /// Text could not be placed on the template.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error encoding a rendered certificate.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Error persisting a rendered certificate.
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid configuration value (color, field spec, format name, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error is recoverable at the level of a single name.
    ///
    /// Fatal errors abort a run before any certificate is produced.
    pub fn is_per_name(&self) -> bool {
        matches!(
            self,
            Error::Render(_) | Error::Encode(_) | Error::Write { .. }
        )
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Encode(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
