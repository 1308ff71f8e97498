//! Persistence for the remembered login flag.
//!
//! The session store records whether a customer was signed in when the
//! application last ran, so the next start can show account UI
//! immediately while the profile refetch is in flight. Only this single
//! boolean is persisted; credentials and tokens never are.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Errors from reading or writing the persisted flag.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backing store for the "was signed in" flag.
pub trait LoginFlagStorage: Send + Sync {
    /// Read the persisted flag. A missing or unreadable value reads as
    /// `false`.
    fn read(&self) -> bool;

    /// Persist the flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing medium cannot be written.
    fn write(&self, logged_in: bool) -> Result<(), StorageError>;
}

/// File-backed flag, one word of text in a state file.
#[derive(Debug, Clone)]
pub struct FileLoginFlag {
    path: PathBuf,
}

impl FileLoginFlag {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LoginFlagStorage for FileLoginFlag {
    fn read(&self) -> bool {
        std::fs::read_to_string(&self.path)
            .map(|contents| contents.trim() == "true")
            .unwrap_or(false)
    }

    fn write(&self, logged_in: bool) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, if logged_in { "true" } else { "false" })?;
        Ok(())
    }
}

/// In-memory flag for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryLoginFlag {
    flag: AtomicBool,
}

impl MemoryLoginFlag {
    #[must_use]
    pub fn new(logged_in: bool) -> Self {
        Self {
            flag: AtomicBool::new(logged_in),
        }
    }
}

impl LoginFlagStorage for MemoryLoginFlag {
    fn read(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn write(&self, logged_in: bool) -> Result<(), StorageError> {
        self.flag.store(logged_in, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_flag_roundtrip() {
        let storage = MemoryLoginFlag::default();
        assert!(!storage.read());
        storage.write(true).unwrap();
        assert!(storage.read());
        storage.write(false).unwrap();
        assert!(!storage.read());
    }

    #[test]
    fn test_file_flag_roundtrip() {
        let dir = std::env::temp_dir().join(format!("wildberry-test-{}", std::process::id()));
        let storage = FileLoginFlag::new(dir.join("login-flag"));

        assert!(!storage.read(), "missing file reads as false");
        storage.write(true).unwrap();
        assert!(storage.read());
        storage.write(false).unwrap();
        assert!(!storage.read());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_flag_garbage_reads_false() {
        let dir = std::env::temp_dir().join(format!("wildberry-garbage-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("login-flag");
        std::fs::write(&path, "maybe?").unwrap();

        let storage = FileLoginFlag::new(&path);
        assert!(!storage.read());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
