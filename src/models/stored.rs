// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted activity shape.
//!
//! This is plain, untrusted data. It only becomes an [`Activity`] through
//! [`Activity::restore`], which revalidates and recomputes derived fields.
//!
//! [`Activity`]: crate::models::Activity
//! [`Activity::restore`]: crate::models::Activity::restore

use crate::models::activity::ActivityKind;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One entry of the persisted activity blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredActivity {
    pub id: String,
    /// RFC 3339 with the user's offset, which fixes the description's day
    pub created_at: DateTime<FixedOffset>,
    /// `[lat, lng]`
    pub coords: [f64; 2],
    /// Distance in km
    pub distance: f64,
    /// Duration in minutes
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Running only (steps per minute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<u32>,
    /// Cycling only (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
}
