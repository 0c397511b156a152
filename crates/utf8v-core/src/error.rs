//! Error types for the utf8v-core library.
//!
//! The codec itself reports malformed input as data (a boolean, a padded
//! array, a required length). This error type covers the few places where
//! a caller asked for something that cannot be produced at all, plus the
//! I/O surrounding the codec.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for utf8v operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all utf8v operations
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

    /// Strict conversion was asked to encode a UTF-16 surrogate
    #[error("scalar U+{value:04X} is a UTF-16 surrogate and cannot be encoded strictly")]
    SurrogateScalar {
        /// The rejected scalar
        value: u32,
    },

    /// Scalar literal exceeds the 31-bit scalar space
    #[error("scalar {value:#x} exceeds the maximum scalar value {max:#x}")]
    ScalarOutOfRange {
        /// The rejected value
        value: u64,
        /// Largest representable scalar
        max: u32,
    },

    /// Scalar literal could not be parsed
    #[error("invalid scalar literal '{literal}'")]
    InvalidScalarLiteral {
        /// The offending text
        literal: String,
    },

    /// Buffer is not well-formed UTF-8
    #[error("invalid UTF-8 sequence at offset {valid_up_to}")]
    InvalidUtf8 {
        /// Length of the longest valid prefix
        valid_up_to: usize,
    },
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

    /// Creates a new invalid literal error
    pub fn invalid_scalar_literal(literal: impl Into<String>) -> Self {
        Self::InvalidScalarLiteral {
            literal: literal.into(),
        }
    }

    /// Creates a new invalid UTF-8 error
    pub fn invalid_utf8(valid_up_to: usize) -> Self {
        Self::InvalidUtf8 { valid_up_to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SurrogateScalar { value: 0xD800 };
        assert!(err.to_string().contains("U+D800"));
        assert!(err.to_string().contains("surrogate"));

        let err = Error::invalid_utf8(7);
        assert_eq!(err.to_string(), "invalid UTF-8 sequence at offset 7");
    }

    #[test]
    fn test_file_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::file_read("/missing", io);
        assert!(err.to_string().contains("/missing"));
        assert!(err.to_string().contains("gone"));
    }
}
