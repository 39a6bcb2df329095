//! Native file-backed storage: each key is a file inside one directory

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{Storage, StorageError};

/// Directory-backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for storage, creating it if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Each write gets its own uniquely named sibling, renamed over the key
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("data")).unwrap();
        assert_eq!(storage.get_item("breakout_high_score").unwrap(), None);

        storage.set_item("breakout_high_score", "42").unwrap();
        storage.set_item("breakout_high_score", "43").unwrap();
        assert_eq!(
            storage.get_item("breakout_high_score").unwrap().as_deref(),
            Some("43")
        );

        // Reopening sees the same slot
        let reopened = FileStorage::open(storage.dir()).unwrap();
        assert_eq!(
            reopened.get_item("breakout_high_score").unwrap().as_deref(),
            Some("43")
        );
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(storage.get_item("").is_err());
    }

    #[test]
    fn test_concurrent_writers_leave_a_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        let writers: Vec<_> = (0..4)
            .map(|n| {
                let mut storage = storage.clone();
                std::thread::spawn(move || {
                    let value = n.to_string().repeat(4096);
                    for _ in 0..25 {
                        storage.set_item("settings", &value).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let value = storage.get_item("settings").unwrap().unwrap();
        assert_eq!(value.len(), 4096);
        let first = value.chars().next().unwrap();
        assert!(value.chars().all(|c| c == first));

        // No temp siblings left behind
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
