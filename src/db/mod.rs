// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer: named durable slots and the activity repository.

pub mod file;
pub mod memory;
pub mod repository;

pub use file::FileSlotStorage;
pub use memory::MemorySlotStorage;
pub use repository::ActivityRepository;

/// Slot names as constants.
pub mod keys {
    /// The activity list blob
    pub const WORKOUTS: &str = "workouts";
}

/// A durable key-value store holding one opaque blob per named slot.
///
/// `write` replaces the whole slot; readers never observe a partial blob.
/// Calls may block on I/O, so async code reaches storage only through
/// [`ActivityRepository`], which runs them on the blocking pool.
pub trait SlotStorage: Send + Sync {
    /// Read a slot. `Ok(None)` when the slot does not exist.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    fn write(&self, key: &str, blob: &str) -> Result<(), StorageError>;

    /// Delete a slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors from slot storage and the repository.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read slot: {0}")]
    Read(String),

    #[error("Failed to write slot: {0}")]
    Write(String),

    #[error("Saved data is corrupt: {0}")]
    Corrupt(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}
