//! Path checks run before a log file is opened.
//!
//! Empty files pass; they are rejected later by the parser because they contain no record
//! boundary.

use crate::error::{LogPagerError, Result};
use std::io;
use std::path::Path;

/// Anything larger is assumed not to be a text log
const MAX_LOG_SIZE: u64 = 100 * 1024 * 1024 * 1024; // 100GB

/// Check that `path` names a regular file of plausible size
///
/// # Returns
/// * The file size in bytes
///
/// # Errors
/// * `FileNotFound` if nothing exists at `path`
/// * `NotAFile` for directories and other non-regular files
/// * `FileError` if the metadata is unreadable or the file is implausibly large
pub fn validate_file_path(path: &Path) -> Result<u64> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LogPagerError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(LogPagerError::file_error(
                format!("Failed to read metadata of {}", path.display()),
                e,
            ))
        }
    };

    if !metadata.is_file() {
        return Err(LogPagerError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let size = metadata.len();
    if size > MAX_LOG_SIZE {
        return Err(LogPagerError::file_error(
            format!("{} is {size} bytes, too large for a log", path.display()),
            io::Error::new(io::ErrorKind::InvalidData, "file too large"),
        ));
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_file_reports_size() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "2024-01-01 00:00:00,000 INFO [main] - app - started\n")
            .unwrap();

        assert_eq!(validate_file_path(file.path()).unwrap(), 52);
    }

    #[test]
    fn test_empty_file_is_accepted() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(validate_file_path(file.path()).unwrap(), 0);
    }

    #[test]
    fn test_missing_path() {
        let missing = Path::new("/this/file/does/not/exist.log");

        match validate_file_path(missing).unwrap_err() {
            LogPagerError::FileNotFound { path } => assert_eq!(path, missing),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            validate_file_path(dir.path()),
            Err(LogPagerError::NotAFile { .. })
        ));
    }
}
