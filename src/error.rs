//! Error types for the table writer.
//!
//! Only environmental failures (I/O, corrupt input to a decoder) and
//! configuration conflicts are represented here. Caller contract violations,
//! such as adding keys out of order or using a builder after it was closed,
//! panic instead.

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for table construction.
///
/// `Error` is `Clone` because the table builder latches the first failure and
/// hands the same value back from every later call.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// An I/O error occurred in the underlying sink.
    #[error("IO error: {0}")]
    Io(Arc<io::Error>),

    /// Encoded data could not be decoded.
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// An invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A block checksum did not match its payload.
    #[error("Checksum mismatch: expected {expected:#x}, got {actual:#x}")]
    ChecksumMismatch {
        /// The checksum stored in the block trailer.
        expected: u32,
        /// The checksum computed from the payload.
        actual: u32,
    },

    /// A configuration file could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Creates a new corruption error.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }

    /// Creates a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Returns true if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
