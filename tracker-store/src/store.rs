//! Append-only byte stores holding an activity log.
//!
//! The codec only needs two operations: read everything, append more.
//! Errors are plain `io::Error`s and are passed back untouched.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the activity log inside a user's directory.
pub const DATA_FILE_NAME: &str = "activity-tracker-data.csv";

/// Sequential read-all / append-all storage.
///
/// Implementations assume a single writer per log; concurrent appends must be
/// serialized by whoever owns the store.
pub trait ActivityStore {
    /// Entire prior content, empty if nothing was ever written.
    fn read_all(&mut self) -> io::Result<Vec<u8>>;

    /// Add `bytes` after the existing content, creating the store if needed.
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// A log kept in a local file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<user_dir>/activity-tracker-data.csv`
    pub fn in_dir(user_dir: &Path) -> Self {
        Self::new(user_dir.join(DATA_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActivityStore for FileStore {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "read activity log");
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no activity log yet");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "appended to activity log");
        Ok(())
    }
}

/// A log held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Vec<u8>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn contents(&self) -> &[u8] {
        &self.bytes
    }
}

impl ActivityStore for MemoryStore {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::in_dir(&dir.path().join("nobody"));
        assert!(store.read_all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_creates_and_extends() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::in_dir(&dir.path().join("sam"));

        store.append(b"first\n").unwrap();
        store.append(b"second\n").unwrap();
        store.append(b"").unwrap();

        assert_eq!(store.read_all().unwrap(), b"first\nsecond\n");
        assert!(store.path().ends_with("sam/activity-tracker-data.csv"));
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // a directory where the file should be
        let mut store = FileStore::new(dir.path());
        assert!(store.read_all().is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.read_all().unwrap().is_empty());
        store.append(b"abc").unwrap();
        store.append(b"def").unwrap();
        assert_eq!(store.contents(), b"abcdef");
    }
}
