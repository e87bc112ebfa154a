//! Error types for the iskra-core library.
//!
//! Extraction itself never fails — unrecognizable input degrades to an
//! empty schema — so the variants here cover the surrounding surfaces:
//! file access, pattern compilation and structured serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for iskra operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all iskra operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to compile an extraction pattern
    #[error("failed to compile extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Failed to serialize the schema model
    #[error("failed to serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::file_read(
            "/no/such/bundle.js",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("failed to read file"));
        assert!(err.to_string().contains("/no/such/bundle.js"));
    }

    #[test]
    fn test_pattern_error_conversion() {
        let bad = regex::Regex::new("(unclosed").unwrap_err();
        let err = Error::from(bad);
        assert!(err.to_string().contains("extraction pattern"));
    }
}
