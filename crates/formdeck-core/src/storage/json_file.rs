//! File-per-key JSON storage.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a synced temp file in
//! the same directory that is then renamed over the target, so a crash
//! mid-write leaves either the old snapshot or the new one.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::traits::SnapshotStorage;
use crate::error::{FormError, Result};

/// Snapshot storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open (creating if needed) storage rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Storage` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            FormError::Storage(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that backs `key`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidInput` for keys that are not plain names.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FormError::InvalidInput(format!(
                "Invalid storage key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FormError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        write_atomic(&path, value.as_bytes())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| FormError::Storage("Invalid snapshot path".to_string()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| FormError::Storage("Invalid snapshot filename".to_string()))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| FormError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, nanos));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| FormError::Storage(format!("Temp file create failed: {}", e)))?;
    file.write_all(data)
        .and_then(|()| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            FormError::Storage(format!("Temp file write failed: {}", e))
        })?;
    drop(file);

    replace_file(&temp_path, path)
        .map_err(|e| FormError::Storage(format!("Atomic rename failed: {}", e)))
}

/// Rename `source` over `target`.
///
/// Some platforms refuse to rename onto an existing file; there the target is
/// removed and the rename retried. The temp file is cleaned up on failure.
fn replace_file(source: &Path, target: &Path) -> io::Result<()> {
    let Err(first) = fs::rename(source, target) else {
        return Ok(());
    };
    let _ = fs::remove_file(target);
    fs::rename(source, target).map_err(|retry| {
        let _ = fs::remove_file(source);
        io::Error::new(
            retry.kind(),
            format!("initial: {}, retry: {}", first, retry),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get("savedForms").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempdir().unwrap();
        let mut storage = JsonFileStorage::open(dir.path()).unwrap();
        storage.set("savedForms", "[]").unwrap();
        assert_eq!(storage.get("savedForms").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("savedForms.json").exists());
    }

    #[test]
    fn test_set_overwrites_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let mut storage = JsonFileStorage::open(dir.path()).unwrap();
        storage.set("currentForm", "old").unwrap();
        storage.set("currentForm", "new").unwrap();

        assert_eq!(storage.get("currentForm").unwrap().as_deref(), Some("new"));
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = JsonFileStorage::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.dir(), nested.as_path());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path()).unwrap();
        assert!(storage.path_for("../escape").is_err());
        assert!(storage.path_for("").is_err());
    }
}
