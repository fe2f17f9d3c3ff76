// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed slot storage.
//!
//! Each slot is a `<key>.json` file under the data directory. Writes go to a
//! temporary sibling first and are renamed over the slot, so a crash mid-write
//! leaves the previous blob in place.

use crate::db::{SlotStorage, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Slot storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    dir: PathBuf,
}

impl FileSlotStorage {
    /// The directory is created lazily on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Write(format!("invalid slot name: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStorage for FileSlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self
            .slot_path(key)
            .map_err(|e| StorageError::Read(e.to_string()))?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(format!("{}: {}", path.display(), e))),
        }
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));

        fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::Write(format!("{}: {}", self.dir.display(), e)))?;
        fs::write(&tmp_path, blob)
            .map_err(|e| StorageError::Write(format!("{}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| StorageError::Write(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), bytes = blob.len(), "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write(format!("{}: {}", path.display(), e))),
        }
    }
}
