//! # logpager - Paged Navigation over Large Log Files
//!
//! Random-access, bidirectional paging over multi-line structured log files (the classic
//! log4j `timestamp LEVEL [thread] - logger - message` layout) without loading the whole
//! file into memory.
//!
//! ## Features
//!
//! - **Large File Support**: Memory-mapped access above a configurable size threshold
//! - **Multi-line Records**: Stack traces and other continuation lines stay with their record
//! - **Bidirectional Paging**: Forward and backward pages from any record or from the end
//! - **Search and Filter**: Literal (SIMD `memmem`) or regex (ripgrep engine) matching
//! - **Position Index**: Visited records are never re-scanned to be found again
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Boundary pattern, timestamp format and storage settings
//! - [`file_handler`] - File access and byte-offset line reading
//! - [`parser`] - Record assembly, navigation, decoding and the file-backed pager
//! - [`pager`] / [`page`] / [`record`] - The public paging surface
//! - [`fixture`] - In-memory pager for smoke tests

// Core modules
pub mod config;
pub mod error;
pub mod file_handler;

// Public data model
pub mod page;
pub mod pager;
pub mod record;

// Core components
pub mod fixture;
pub mod parser;

// Re-export commonly used types for convenience
pub use error::{DecodeError, DecodeErrorKind, LogPagerError, Result};

// Public API surface for external usage
pub use config::ParserConfig;
pub use fixture::FixtureLogSource;
pub use page::Page;
pub use pager::{Anchor, Capabilities, LogPager};
pub use parser::{LogFileParser, Position};
pub use record::{LogLevel, LogRecord};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
