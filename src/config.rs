//! Parser configuration.
//!
//! The defaults describe the classic log4j layout
//! `%d{yyyy-MM-dd HH:mm:ss,SSS} %p [%t] - %c - %m%n`. With the `config` feature enabled the
//! same settings can be read from a TOML file; any field missing from the file keeps its
//! default.

#[cfg(feature = "config")]
use crate::error::{LogPagerError, Result};
#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// Start-of-record pattern matching `2024-01-31 23:59:59,999`
pub const DEFAULT_BOUNDARY_PATTERN: &str =
    "^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}";

/// chrono format of the leading timestamp field
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Files smaller than this are read into memory, larger ones are memory mapped
pub const DEFAULT_MEMORY_THRESHOLD: u64 = 1024 * 1024; // 1MB

/// Settings supplied to [`LogFileParser`](crate::parser::LogFileParser) at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ParserConfig {
    /// Regex a line must match to start a new record
    pub boundary_pattern: String,

    /// chrono `strftime` format of the fixed-width timestamp at the start of each record
    pub timestamp_format: String,

    /// Size in bytes at which the file is memory mapped instead of read into memory
    ///
    /// Files below the threshold are copied into the heap once at construction, so the
    /// threshold bounds the memory a parser holds. Mapped files are paged in by the OS on
    /// demand and never copied. Set it to 0 to map every non-empty file.
    pub memory_threshold: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            boundary_pattern: DEFAULT_BOUNDARY_PATTERN.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            memory_threshold: DEFAULT_MEMORY_THRESHOLD,
        }
    }
}

impl ParserConfig {
    pub fn with_boundary_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.boundary_pattern = pattern.into();
        self
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn with_memory_threshold(mut self, bytes: u64) -> Self {
        self.memory_threshold = bytes;
        self
    }
}

#[cfg(feature = "config")]
impl ParserConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| LogPagerError::config(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LogPagerError::file_error(format!("Failed to read config: {}", path.display()), e)
        })?;
        Self::from_toml_str(&text)
    }

    /// `<config_dir>/logpager/config.toml`, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logpager").join("config.toml"))
    }

    /// Load the default configuration file when present, defaults otherwise
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
