// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity repository: the whole activity list as one JSON blob in one slot.
//!
//! Storage calls run under `spawn_blocking` so file I/O never stalls the
//! async runtime.

use crate::db::{SlotStorage, StorageError};
use crate::models::{Activity, StoredActivity};
use std::sync::Arc;

/// Saves and loads the ordered activity list.
#[derive(Clone)]
pub struct ActivityRepository {
    storage: Arc<dyn SlotStorage>,
    key: String,
}

impl ActivityRepository {
    pub fn new(storage: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize every activity, in order, and overwrite the slot.
    pub async fn save(&self, activities: &[Activity]) -> Result<(), StorageError> {
        let stored: Vec<StoredActivity> = activities.iter().map(Activity::to_stored).collect();
        let blob = serde_json::to_string(&stored)
            .map_err(|e| StorageError::Write(format!("serialization failed: {}", e)))?;
        self.blocking(move |storage, key| storage.write(key, &blob))
            .await
    }

    /// Read the raw records, reporting why nothing usable was found.
    pub async fn try_load(&self) -> Result<Option<Vec<StoredActivity>>, StorageError> {
        let Some(blob) = self.blocking(|storage, key| storage.read(key)).await? else {
            return Ok(None);
        };
        serde_json::from_str(&blob)
            .map(Some)
            .map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    /// Read the raw records. Missing, unreadable and corrupt slots are all
    /// "absent"; the latter two are logged.
    pub async fn load(&self) -> Option<Vec<StoredActivity>> {
        match self.try_load().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(slot = %self.key, error = %e, "Ignoring saved activities");
                None
            }
        }
    }

    /// Delete the slot.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.blocking(|storage, key| storage.remove(key)).await
    }

    /// Run one storage call on the blocking thread pool.
    async fn blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SlotStorage, &str) -> Result<T, StorageError> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || op(storage.as_ref(), &key))
            .await
            .map_err(|e| StorageError::Task(format!("join error: {}", e)))?
    }
}
