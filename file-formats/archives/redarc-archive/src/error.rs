//! Error types for the archive library

use std::io;
use thiserror::Error;

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for archive operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid archive format or corrupted container
    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    /// Unsupported archive format version
    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(u8),

    /// File not found in archive
    #[error("File not found in archive: {0}")]
    FileNotFound(String),

    /// Redundancy outside the supported range
    #[error("Invalid redundancy {0}: must be between 1 and 10")]
    InvalidRedundancy(u32),

    /// Every stored copy of a file failed its CRC check
    #[error("All {copies} copies of '{name}' failed CRC validation")]
    AllCopiesCorrupt {
        /// Name of the file in the archive
        name: String,
        /// Number of copies that were tried
        copies: usize,
    },
}

impl Error {
    /// Create a new `InvalidFormat` error
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFormat(msg.into())
    }

    /// Check if this error indicates a corrupted or malformed container
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::InvalidFormat(_) | Error::UnsupportedVersion(_) | Error::AllCopiesCorrupt { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_format("bad header");
        assert_eq!(err.to_string(), "Invalid archive format: bad header");

        let err = Error::FileNotFound("a.txt".to_string());
        assert_eq!(err.to_string(), "File not found in archive: a.txt");

        let err = Error::InvalidRedundancy(11);
        assert_eq!(
            err.to_string(),
            "Invalid redundancy 11: must be between 1 and 10"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::UnsupportedVersion(9).is_corruption());
        assert!(
            Error::AllCopiesCorrupt {
                name: "a".into(),
                copies: 3
            }
            .is_corruption()
        );
        assert!(!Error::FileNotFound("a".into()).is_corruption());
    }
}
