// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity form input.

use crate::models::activity::{
    Activity, ActivityKind, Coordinates, InputField, InvalidInputError,
};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Values entered in the activity form. Missing numbers count as invalid.
///
/// Only the field belonging to the variant is read; the other one is ignored.
/// Without `variant` the form is read as whatever the session last toggled
/// to. `utc_offset_min` is the user's offset east of UTC in minutes (UTC-8 is
/// `-480`) and decides which calendar day the description names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActivityForm {
    #[serde(default)]
    pub variant: Option<ActivityKind>,
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    pub cadence: Option<f64>,
    pub elevation_gain_m: Option<f64>,
    #[serde(default)]
    pub utc_offset_min: Option<i32>,
}

impl ActivityForm {
    pub fn running(distance_km: f64, duration_min: f64, cadence: f64) -> Self {
        Self {
            variant: Some(ActivityKind::Running),
            distance_km: Some(distance_km),
            duration_min: Some(duration_min),
            cadence: Some(cadence),
            elevation_gain_m: None,
            utc_offset_min: None,
        }
    }

    pub fn cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self {
            variant: Some(ActivityKind::Cycling),
            distance_km: Some(distance_km),
            duration_min: Some(duration_min),
            cadence: None,
            elevation_gain_m: Some(elevation_gain_m),
            utc_offset_min: None,
        }
    }

    /// Set the user's UTC offset in minutes east.
    pub fn with_utc_offset_min(mut self, minutes: i32) -> Self {
        self.utc_offset_min = Some(minutes);
        self
    }

    /// The variant to build: the form's own, else `fallback`.
    pub fn variant_or(&self, fallback: ActivityKind) -> ActivityKind {
        self.variant.unwrap_or(fallback)
    }

    /// `None` when the offset is a day or more away from UTC.
    fn utc_offset(&self) -> Option<FixedOffset> {
        match self.utc_offset_min {
            None => Some(Utc.fix()),
            Some(minutes) => minutes.checked_mul(60).and_then(FixedOffset::east_opt),
        }
    }

    /// Build a `variant` activity at `coords`, created at `created_at`.
    pub fn build(
        &self,
        variant: ActivityKind,
        coords: Coordinates,
        created_at: DateTime<Utc>,
    ) -> Result<Activity, InvalidInputError> {
        let offset = self.utc_offset();
        let created_at = created_at.with_timezone(&offset.unwrap_or(Utc.fix()));
        let distance = self.distance_km.unwrap_or(f64::NAN);
        let duration = self.duration_min.unwrap_or(f64::NAN);
        let built = match variant {
            ActivityKind::Running => Activity::running(
                coords,
                distance,
                duration,
                self.cadence.unwrap_or(f64::NAN),
                created_at,
            ),
            ActivityKind::Cycling => Activity::cycling(
                coords,
                distance,
                duration,
                self.elevation_gain_m.unwrap_or(f64::NAN),
                created_at,
            ),
        };

        match (built, offset) {
            (built, Some(_)) => built,
            (Ok(_), None) => Err(InvalidInputError::new(vec![InputField::UtcOffset])),
            (Err(e), None) => Err(e.with_field(InputField::UtcOffset)),
        }
    }
}
