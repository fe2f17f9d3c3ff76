// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory ordered activity collection for the current session.

use crate::models::{Activity, InvalidInputError, StoredActivity};
use std::collections::HashMap;

/// Activities in insertion (display) order, with unique ids.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ActivityStore {
    activities: Vec<Activity>,
    index: HashMap<String, usize>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an activity. Rejects a duplicate id and leaves the store as is.
    pub fn add(&mut self, activity: Activity) -> Result<&Activity, StoreError> {
        if self.index.contains_key(activity.id()) {
            return Err(StoreError::DuplicateId(activity.id().to_string()));
        }
        let position = self.activities.len();
        self.index.insert(activity.id().to_string(), position);
        self.activities.push(activity);
        Ok(&self.activities[position])
    }

    /// Every activity, oldest first.
    pub fn all(&self) -> &[Activity] {
        &self.activities
    }

    pub fn find_by_id(&self, id: &str) -> Result<&Activity, StoreError> {
        self.index
            .get(id)
            .map(|&position| &self.activities[position])
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Hydrate from persisted records.
    ///
    /// Every record is rebuilt through [`Activity::restore`]. If any record is
    /// invalid or repeats an id, nothing is accepted and the store is left
    /// empty.
    pub fn replace_all(&mut self, records: &[StoredActivity]) -> Result<usize, StoreError> {
        self.clear();

        let mut staged = ActivityStore::new();
        for (position, record) in records.iter().enumerate() {
            let activity =
                Activity::restore(record).map_err(|source| StoreError::InvalidRecord {
                    position,
                    id: record.id.clone(),
                    source,
                })?;
            staged.add(activity)?;
        }

        *self = staged;
        Ok(self.len())
    }

    pub fn clear(&mut self) {
        self.activities.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Activity id already present: {0}")]
    DuplicateId(String),

    #[error("Activity not found: {0}")]
    NotFound(String),

    #[error("Saved activity #{position} ({id}) is invalid: {source}")]
    InvalidRecord {
        position: usize,
        id: String,
        source: InvalidInputError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use chrono::{Duration, TimeZone, Utc};

    fn run(offset_secs: i64) -> Activity {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap()
            + Duration::seconds(offset_secs);
        Activity::running(Coordinates::new(42.5, 23.3), 5.0, 25.0, 170.0, created).unwrap()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = ActivityStore::new();
        store.add(run(2)).unwrap();
        store.add(run(1)).unwrap();

        let ids: Vec<String> = store.all().iter().map(|a| a.id().to_string()).collect();
        assert_eq!(ids, vec![run(2).id().to_string(), run(1).id().to_string()]);
    }

    #[test]
    fn test_duplicate_id_rejected_without_change() {
        let mut store = ActivityStore::new();
        store.add(run(0)).unwrap();

        let err = store.add(run(0)).unwrap_err();

        assert!(matches!(err, StoreError::DuplicateId(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_by_id() {
        let mut store = ActivityStore::new();
        let activity = run(0);
        store.add(activity.clone()).unwrap();

        assert_eq!(store.find_by_id(activity.id()).unwrap(), &activity);
        assert!(matches!(
            store.find_by_id("nope"),
            Err(StoreError::NotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_replace_all_is_idempotent() {
        let records = vec![run(0).to_stored(), run(60).to_stored()];
        let mut store = ActivityStore::new();

        store.replace_all(&records).unwrap();
        let first = store.clone();
        store.replace_all(&records).unwrap();

        assert_eq!(store, first);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replace_all_fails_closed_on_invalid_record() {
        let mut bad = run(60).to_stored();
        bad.distance = 0.0;
        let records = vec![run(0).to_stored(), bad, run(120).to_stored()];

        let mut store = ActivityStore::new();
        store.add(run(999)).unwrap();
        let err = store.replace_all(&records).unwrap_err();

        assert!(matches!(err, StoreError::InvalidRecord { position: 1, .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_fails_closed_on_duplicate_ids() {
        let records = vec![run(0).to_stored(), run(0).to_stored()];
        let mut store = ActivityStore::new();

        assert!(matches!(
            store.replace_all(&records),
            Err(StoreError::DuplicateId(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = ActivityStore::new();
        store.add(run(0)).unwrap();
        store.clear();

        assert!(store.is_empty());
        assert!(store.find_by_id(run(0).id()).is_err());
    }
}
