//! File-level convenience wrappers around the codec.

use crate::codec::valid_up_to;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::trace;

/// Read a whole file into memory
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    trace!("Reading {}", path.display());
    std::fs::read(path).map_err(|e| Error::file_read(path, e))
}

/// Write `content` to a file, replacing any existing contents
pub fn write_file(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, content).map_err(|e| Error::file_write(path, e))
}

/// Check a file for well-formed UTF-8
///
/// Returns the file length and the length of its longest valid prefix.
pub fn check_file(path: impl AsRef<Path>) -> Result<(usize, usize)> {
    let data = read_file(path)?;
    Ok((data.len(), valid_up_to(&data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.txt");
        std::fs::write(&path, b"ok \xC3\xA9 \xE9").unwrap();
        assert_eq!(check_file(&path).unwrap(), (7, 6));
    }

    #[test]
    fn test_missing_file_is_file_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");
        let err = check_file(&path).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_write_into_missing_directory_is_file_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no").join("such").join("out.txt");
        let err = write_file(&path, b"x").unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        write_file(&path, "€".as_bytes()).unwrap();
        assert_eq!(read_file(&path).unwrap(), "€".as_bytes());
    }
}
