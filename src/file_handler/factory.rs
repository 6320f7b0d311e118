//! Factory for opening log files as [`ByteSource`]s.
//!
//! This module provides the FileSourceFactory which validates a path and selects the
//! storage strategy from the file size.

use crate::config::ParserConfig;
use crate::error::{LogPagerError, Result};
use crate::file_handler::source::ByteSource;
use crate::file_handler::validation::validate_file_path;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Factory for creating ByteSource instances
///
/// # Strategy Selection
/// - Files below `ParserConfig::memory_threshold`: In-memory (`ByteSource::InMemory`)
/// - Larger files: Memory mapping (`ByteSource::MemoryMapped`)
/// - Empty files are always in-memory, since a zero-length mapping is not portable
pub struct FileSourceFactory;

impl FileSourceFactory {
    /// Open `path` with the strategy matching its size
    ///
    /// # Errors
    /// * File validation errors (non-existent, directory, not readable)
    /// * Read or memory mapping failures
    pub fn open(path: &Path, config: &ParserConfig) -> Result<ByteSource> {
        let file_size = validate_file_path(path)?;

        let file = File::open(path).map_err(|e| {
            LogPagerError::file_error(format!("Failed to open file: {}", path.display()), e)
        })?;

        if file_size == 0 || file_size < config.memory_threshold {
            let mut content = Vec::with_capacity(file_size as usize);
            let mut file = file;
            file.read_to_end(&mut content)
                .map_err(|e| LogPagerError::file_error("Failed to read file", e))?;

            log::debug!(
                "loaded {} ({} bytes) into memory",
                path.display(),
                content.len()
            );
            Ok(ByteSource::InMemory(content))
        } else {
            // SAFETY: the mapping is read-only; truncating the file underneath it is
            // outside the supported use (no follow mode).
            let mmap = unsafe {
                Mmap::map(&file).map_err(|e| {
                    LogPagerError::memory_mapping(format!(
                        "Failed to memory map file {}: {}",
                        path.display(),
                        e
                    ))
                })?
            };

            #[cfg(unix)]
            {
                // Paging alternates between directions, so readahead buys little
                let _ = mmap.advise(memmap2::Advice::Random);
            }

            log::debug!("memory mapped {} ({} bytes)", path.display(), file_size);
            Ok(ByteSource::MemoryMapped(mmap))
        }
    }
}
