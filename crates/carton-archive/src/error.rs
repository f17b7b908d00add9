//! Error Types for Archive Operations
//!
//! This module provides the error taxonomy for encoding and decoding
//! values through the text archive.
//!
//! ## Error Categories
//!
//! - Emit failures: the writer or a value's field visitor failed mid-encode
//! - Malformed input: the encoded text does not match the target's shape
//! - Trailing content: valid document followed by extra input
//!
//! No error is ever suppressed or converted into a partial result; the
//! caller always sees either a fully constructed value or a failure.

use thiserror::Error;

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Archive encode/decode error types
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The writer or the value's own field visitor failed during encode.
    ///
    /// The partially written buffer is discarded; no encoded form is
    /// returned.
    #[error("failed to emit archive: {0}")]
    Emit(#[source] serde_json::Error),

    /// The encoded text does not match the expected structure.
    ///
    /// Covers a missing or mismatched root key, a missing required field,
    /// a wrong field type, and syntactically invalid input.
    #[error("malformed archive: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Extra content followed the archive document.
    #[error("trailing content after archive document")]
    TrailingContent,

    /// The encode buffer did not contain valid UTF-8.
    #[error("archive buffer is not valid UTF-8")]
    NonUtf8(#[from] std::string::FromUtf8Error),
}

impl ArchiveError {
    /// Check if this error was raised while emitting an encoded form
    pub fn is_emit(&self) -> bool {
        matches!(self, ArchiveError::Emit(_))
    }

    /// Check if this error describes malformed decode input
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ArchiveError::Malformed(_) | ArchiveError::TrailingContent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = ArchiveError::TrailingContent;
        assert!(err.is_malformed());
        assert!(!err.is_emit());
    }

    #[test]
    fn test_malformed_display_carries_reader_error() {
        let inner = serde_json::from_str::<i64>("not json").unwrap_err();
        let err = ArchiveError::Malformed(inner);
        assert!(err.to_string().starts_with("malformed archive:"));
    }
}
