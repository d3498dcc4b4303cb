//! Error types for spectra-core.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for sample-buffer, codec, and spectral operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A sound file could not be opened, read, or parsed.
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// A sound file could not be written, or the target format is invalid.
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    /// Two buffers combined by an operation disagree on a dimension.
    #[error("Shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A control function produced a value outside its usable domain.
    #[error("Invalid control value: {0}")]
    InvalidControl(String),

    #[error("Index out of range: {0}")]
    OutOfRange(String),
}

#[cfg_attr(not(feature = "wav"), allow(dead_code))]
impl Error {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Encode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
