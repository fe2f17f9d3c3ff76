// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process slot storage for tests and offline runs.

use crate::db::{SlotStorage, StorageError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Slot storage backed by a `HashMap`.
///
/// Writes can be made to fail on demand to simulate a full or unavailable
/// backend.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `write` calls fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots().contains_key(key)
    }

    /// Put a raw blob into a slot, bypassing failure injection.
    pub fn insert_raw(&self, key: &str, blob: &str) {
        self.slots().insert(key.to_string(), blob.to_string());
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots().get(key).cloned())
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write("quota exceeded".to_string()));
        }
        self.slots().insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_remove() {
        let storage = MemorySlotStorage::new();
        assert_eq!(storage.read("workouts").unwrap(), None);

        storage.write("workouts", "[]").unwrap();
        assert_eq!(storage.read("workouts").unwrap().as_deref(), Some("[]"));

        storage.remove("workouts").unwrap();
        assert!(!storage.contains("workouts"));
    }

    #[test]
    fn test_failed_write_keeps_previous_blob() {
        let storage = MemorySlotStorage::new();
        storage.write("workouts", "[1]").unwrap();
        storage.set_fail_writes(true);

        assert!(matches!(
            storage.write("workouts", "[2]"),
            Err(StorageError::Write(_))
        ));
        assert_eq!(storage.read("workouts").unwrap().as_deref(), Some("[1]"));
    }
}
