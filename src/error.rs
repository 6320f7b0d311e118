//! Error types and handling infrastructure for logpager.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. The binary layers `anyhow` on top for context.
//!
//! Two families live here:
//!
//! - [`LogPagerError`]: fatal for the operation that raised it (construction, I/O,
//!   invalid search patterns).
//! - [`DecodeError`]: a single record that does not fit the expected field layout. These
//!   never abort a page; they are collected in [`Page::failures`](crate::page::Page).
//!
//! Reaching the beginning or end of the file is not an error anywhere in this crate.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for logpager operations.
#[derive(Error, Debug)]
pub enum LogPagerError {
    /// File system related errors (permission denied, read failures, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found at construction time
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Memory mapping related errors
    #[error("Memory mapping failed: {message}")]
    MemoryMappingError { message: String },

    /// The file holds no line matching the boundary pattern
    #[error("No log records found in {path}: no line matches the boundary pattern")]
    NoRecords { path: PathBuf },

    /// A boundary pattern or search expression failed to compile
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for logpager operations.
pub type Result<T> = std::result::Result<T, LogPagerError>;

impl LogPagerError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a MemoryMappingError with a descriptive message
    pub fn memory_mapping(message: impl Into<String>) -> Self {
        Self::MemoryMappingError {
            message: message.into(),
        }
    }

    /// Create an InvalidPattern error for a pattern that failed to compile
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Bare I/O errors are labelled with their kind
impl From<std::io::Error> for LogPagerError {
    fn from(err: std::io::Error) -> Self {
        Self::file_error(err.kind().to_string(), err)
    }
}

/// Which part of the first line could not be decoded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// No FATAL/ERROR/WARN/INFO/DEBUG/TRACE token after the timestamp
    #[error("missing log level")]
    MissingLevel,
    /// No `[thread]` after the level
    #[error("missing bracketed thread name")]
    MissingThread,
    /// The ` - logger - ` separators are missing
    #[error("missing ` - ` separator around logger name")]
    MissingSeparator,
}

/// A record whose first line does not fit the expected field layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot decode record at byte {offset} (line {start_line}): {kind}")]
pub struct DecodeError {
    /// First physical line of the record (0 when read in raw-offset mode)
    pub start_line: u64,
    /// Byte offset of the record's first line
    pub offset: u64,
    pub kind: DecodeErrorKind,
    /// The undecodable first line, verbatim
    pub line: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display_messages() {
        let path = PathBuf::from("/test/file.log");

        let file_not_found = LogPagerError::FileNotFound { path: path.clone() };
        assert_eq!(file_not_found.to_string(), "File not found: /test/file.log");

        let not_a_file = LogPagerError::NotAFile { path: path.clone() };
        assert_eq!(
            not_a_file.to_string(),
            "Path is not a regular file: /test/file.log"
        );

        let no_records = LogPagerError::NoRecords { path };
        assert!(no_records.to_string().contains("no line matches"));

        let pattern = LogPagerError::invalid_pattern("(", "unclosed group");
        assert_eq!(pattern.to_string(), "Invalid pattern `(`: unclosed group");
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            LogPagerError::memory_mapping("Failed to map file"),
            LogPagerError::MemoryMappingError { .. }
        ));
        assert!(matches!(
            LogPagerError::config("bad toml"),
            LogPagerError::ConfigError { .. }
        ));
        assert!(matches!(
            LogPagerError::other("Unknown error"),
            LogPagerError::Other { .. }
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LogPagerError = io_err.into();

        match err {
            LogPagerError::FileError { message, .. } => {
                assert_eq!(message, "permission denied");
            }
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError {
            start_line: 7,
            offset: 120,
            kind: DecodeErrorKind::MissingThread,
            line: "2024-01-01 00:00:00,000 INFO no thread".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot decode record at byte 120 (line 7): missing bracketed thread name"
        );
    }

    #[test]
    fn test_decode_error_kind_messages() {
        assert_eq!(DecodeErrorKind::MissingLevel.to_string(), "missing log level");
        assert_eq!(
            DecodeErrorKind::MissingSeparator.to_string(),
            "missing ` - ` separator around logger name"
        );
        let kind: &dyn std::error::Error = &DecodeErrorKind::MissingThread;
        assert!(kind.source().is_none());
    }
}
