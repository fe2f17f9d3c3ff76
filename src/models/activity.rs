// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity records and the metric calculator.
//!
//! An [`Activity`] can only be obtained through [`Activity::running`],
//! [`Activity::cycling`] or [`Activity::restore`]. All three validate their
//! inputs and compute the derived pace/speed exactly once; there is no way to
//! mutate a record afterwards.

use crate::models::stored::StoredActivity;
use crate::time_utils::format_month_day;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of trailing millisecond digits kept in a derived activity id.
const ID_DIGITS: usize = 10;

/// A latitude/longitude pair. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

impl From<Coordinates> for geo::Point<f64> {
    /// geo uses x = longitude, y = latitude.
    fn from(c: Coordinates) -> Self {
        geo::Point::new(c.lng, c.lat)
    }
}

/// Activity variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Running,
    Cycling,
}

impl ActivityKind {
    /// Lowercase tag, as stored and used in CSS class names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn title(&self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ActivityKind::Running => "🏃‍♂️",
            ActivityKind::Cycling => "🚴‍♀️",
        }
    }

    /// The input field that only this variant uses.
    pub fn extra_field(&self) -> InputField {
        match self {
            ActivityKind::Running => InputField::Cadence,
            ActivityKind::Cycling => InputField::ElevationGain,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Id,
    Coordinates,
    Distance,
    Duration,
    Cadence,
    ElevationGain,
    UtcOffset,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::Id => "id",
            InputField::Coordinates => "coordinates",
            InputField::Distance => "distance_km",
            InputField::Duration => "duration_min",
            InputField::Cadence => "cadence",
            InputField::ElevationGain => "elevation_gain_m",
            InputField::UtcOffset => "utc_offset_min",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected activity input. Names every offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Inputs have to be positive numbers! (invalid: {})", join_fields(.fields))]
pub struct InvalidInputError {
    fields: Vec<InputField>,
}

impl InvalidInputError {
    pub fn new(fields: Vec<InputField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[InputField] {
        &self.fields
    }

    pub fn contains(&self, field: InputField) -> bool {
        self.fields.contains(&field)
    }

    /// Add one more offending field.
    pub fn with_field(mut self, field: InputField) -> Self {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }
}

fn join_fields(fields: &[InputField]) -> String {
    fields
        .iter()
        .map(InputField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── Metric Calculator ───────────────────────────────────────

/// Running pace in minutes per kilometre (lower is better).
pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

/// Cycling speed in kilometres per hour (higher is better).
pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// Variant-specific inputs plus the metric derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ActivityDetails {
    Running {
        /// Steps per minute
        cadence: u32,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

impl ActivityDetails {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetails::Running { .. } => ActivityKind::Running,
            ActivityDetails::Cycling { .. } => ActivityKind::Cycling,
        }
    }
}

/// One logged workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    id: String,
    /// Creation time in the user's UTC offset at the moment of logging.
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    created_at: DateTime<FixedOffset>,
    #[cfg_attr(feature = "binding-generation", ts(type = "[number, number]"))]
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    #[serde(flatten)]
    details: ActivityDetails,
}

impl Activity {
    /// Create a running activity. `cadence` must be a positive whole number.
    ///
    /// The description uses the calendar day of `created_at` in its own
    /// offset, so pass the user's local time to get their local date.
    pub fn running(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence: f64,
        created_at: impl Into<DateTime<FixedOffset>>,
    ) -> Result<Self, InvalidInputError> {
        let created_at = created_at.into();
        Self::build_running(
            derive_id(created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            cadence,
        )
    }

    /// Create a cycling activity. `elevation_gain_m` may be zero.
    pub fn cycling(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        created_at: impl Into<DateTime<FixedOffset>>,
    ) -> Result<Self, InvalidInputError> {
        let created_at = created_at.into();
        Self::build_cycling(
            derive_id(created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            elevation_gain_m,
        )
    }

    /// Rebuild an activity from persisted plain data.
    ///
    /// Goes through the same checks as live input; stored derived values are
    /// never trusted because none are stored.
    pub fn restore(stored: &StoredActivity) -> Result<Self, InvalidInputError> {
        let coords = Coordinates::from(stored.coords);
        match stored.kind {
            ActivityKind::Running => Self::build_running(
                stored.id.clone(),
                stored.created_at,
                coords,
                stored.distance,
                stored.duration,
                stored.cadence.map(f64::from).unwrap_or(f64::NAN),
            ),
            ActivityKind::Cycling => Self::build_cycling(
                stored.id.clone(),
                stored.created_at,
                coords,
                stored.distance,
                stored.duration,
                stored.elevation_gain.unwrap_or(f64::NAN),
            ),
        }
    }

    fn build_running(
        id: String,
        created_at: DateTime<FixedOffset>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence: f64,
    ) -> Result<Self, InvalidInputError> {
        let mut invalid = check_common(&id, coords, distance_km, duration_min);
        if !is_positive_whole(cadence) {
            invalid.push(InputField::Cadence);
        }
        if !invalid.is_empty() {
            return Err(InvalidInputError::new(invalid));
        }

        let details = ActivityDetails::Running {
            cadence: cadence as u32,
            pace_min_per_km: pace_min_per_km(distance_km, duration_min),
        };
        Ok(Self::assemble(
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            details,
        ))
    }

    fn build_cycling(
        id: String,
        created_at: DateTime<FixedOffset>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, InvalidInputError> {
        let mut invalid = check_common(&id, coords, distance_km, duration_min);
        if !(elevation_gain_m.is_finite() && elevation_gain_m >= 0.0) {
            invalid.push(InputField::ElevationGain);
        }
        if !invalid.is_empty() {
            return Err(InvalidInputError::new(invalid));
        }

        let details = ActivityDetails::Cycling {
            elevation_gain_m,
            speed_km_per_h: speed_km_per_h(distance_km, duration_min),
        };
        Ok(Self::assemble(
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            details,
        ))
    }

    fn assemble(
        id: String,
        created_at: DateTime<FixedOffset>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        details: ActivityDetails,
    ) -> Self {
        let description = format!(
            "{} on {}",
            details.kind().title(),
            format_month_day(&created_at)
        );
        Self {
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            description,
            details,
        }
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &ActivityDetails {
        &self.details
    }

    pub fn kind(&self) -> ActivityKind {
        self.details.kind()
    }

    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.details {
            ActivityDetails::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            ActivityDetails::Cycling { .. } => None,
        }
    }

    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.details {
            ActivityDetails::Cycling { speed_km_per_h, .. } => Some(speed_km_per_h),
            ActivityDetails::Running { .. } => None,
        }
    }

    pub fn cadence(&self) -> Option<u32> {
        match self.details {
            ActivityDetails::Running { cadence, .. } => Some(cadence),
            ActivityDetails::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain_m(&self) -> Option<f64> {
        match self.details {
            ActivityDetails::Cycling {
                elevation_gain_m, ..
            } => Some(elevation_gain_m),
            ActivityDetails::Running { .. } => None,
        }
    }

    /// Marker popup text: variant icon followed by the description.
    pub fn marker_label(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    /// CSS class for the marker popup, e.g. `running-popup`.
    pub fn marker_class(&self) -> String {
        format!("{}-popup", self.kind().as_str())
    }

    /// Plain data for persistence. Derived fields are dropped.
    pub fn to_stored(&self) -> StoredActivity {
        let (cadence, elevation_gain) = match self.details {
            ActivityDetails::Running { cadence, .. } => (Some(cadence), None),
            ActivityDetails::Cycling {
                elevation_gain_m, ..
            } => (None, Some(elevation_gain_m)),
        };
        StoredActivity {
            id: self.id.clone(),
            created_at: self.created_at,
            coords: self.coords.into(),
            distance: self.distance_km,
            duration: self.duration_min,
            kind: self.kind(),
            cadence,
            elevation_gain,
        }
    }
}

/// Id from the last [`ID_DIGITS`] digits of the creation time in milliseconds.
pub fn derive_id<Tz: TimeZone>(created_at: DateTime<Tz>) -> String {
    let millis = created_at.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(ID_DIGITS);
    millis[start..].to_string()
}

fn check_common(
    id: &str,
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
) -> Vec<InputField> {
    let mut invalid = Vec::new();
    if id.trim().is_empty() {
        invalid.push(InputField::Id);
    }
    if !coords.is_valid() {
        invalid.push(InputField::Coordinates);
    }
    if !is_positive(distance_km) {
        invalid.push(InputField::Distance);
    }
    if !is_positive(duration_min) {
        invalid.push(InputField::Duration);
    }
    invalid
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_positive_whole(value: f64) -> bool {
    is_positive(value) && value.fract() == 0.0 && value <= f64::from(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn here() -> Coordinates {
        Coordinates::new(42.5, 23.3)
    }

    #[test]
    fn test_running_pace_is_duration_over_distance() {
        let run = Activity::running(here(), 5.2, 28.0, 178.0, at(2024, 3, 7)).unwrap();

        assert_eq!(run.pace_min_per_km(), Some(28.0 / 5.2));
        assert!((run.pace_min_per_km().unwrap() - 5.3846).abs() < 1e-4);
        assert_eq!(run.cadence(), Some(178));
        assert_eq!(run.speed_km_per_h(), None);
        assert_eq!(run.description(), "Running on March 7");
    }

    #[test]
    fn test_cycling_allows_zero_elevation() {
        let ride = Activity::cycling(here(), 20.0, 60.0, 0.0, at(2024, 10, 16)).unwrap();

        assert_eq!(ride.speed_km_per_h(), Some(20.0));
        assert_eq!(ride.elevation_gain_m(), Some(0.0));
        assert_eq!(ride.description(), "Cycling on October 16");
        assert_eq!(ride.kind(), ActivityKind::Cycling);
    }

    #[test]
    fn test_invalid_input_names_every_field() {
        let err = Activity::running(here(), -1.0, f64::NAN, 0.0, at(2024, 1, 1)).unwrap_err();

        assert_eq!(
            err.fields(),
            &[InputField::Distance, InputField::Duration, InputField::Cadence]
        );
        assert!(err.to_string().contains("distance_km, duration_min, cadence"));
    }

    #[test]
    fn test_cycling_rejects_negative_or_infinite_elevation() {
        let err = Activity::cycling(here(), 10.0, 30.0, -5.0, at(2024, 1, 1)).unwrap_err();
        assert_eq!(err.fields(), &[InputField::ElevationGain]);

        let err =
            Activity::cycling(here(), 10.0, 30.0, f64::INFINITY, at(2024, 1, 1)).unwrap_err();
        assert_eq!(err.fields(), &[InputField::ElevationGain]);
    }

    #[test]
    fn test_fractional_cadence_rejected() {
        let err = Activity::running(here(), 5.0, 25.0, 170.5, at(2024, 1, 1)).unwrap_err();
        assert!(err.contains(InputField::Cadence));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let err = Activity::running(
            Coordinates::new(95.0, 10.0),
            5.0,
            25.0,
            170.0,
            at(2024, 1, 1),
        )
        .unwrap_err();
        assert_eq!(err.fields(), &[InputField::Coordinates]);
    }

    #[test]
    fn test_id_is_last_ten_millisecond_digits() {
        let created = Utc.timestamp_millis_opt(1_712_345_678_901).unwrap();
        assert_eq!(derive_id(created), "2345678901");

        let run = Activity::running(here(), 5.0, 25.0, 170.0, created).unwrap();
        assert_eq!(run.id(), "2345678901");
    }

    #[test]
    fn test_description_uses_local_calendar_day() {
        // 18:30 on March 7 in UTC-8 is already March 8 in UTC.
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        let evening = pacific.with_ymd_and_hms(2024, 3, 7, 18, 30, 0).unwrap();

        let run = Activity::running(here(), 5.0, 25.0, 170.0, evening).unwrap();

        assert_eq!(run.description(), "Running on March 7");
        assert_eq!(run.id(), derive_id(evening.with_timezone(&Utc)));
    }

    #[test]
    fn test_restore_keeps_local_day() {
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        let evening = pacific.with_ymd_and_hms(2024, 3, 7, 23, 45, 0).unwrap();
        let ride = Activity::cycling(here(), 20.0, 60.0, 10.0, evening).unwrap();

        let json = serde_json::to_string(&ride.to_stored()).unwrap();
        let stored: StoredActivity = serde_json::from_str(&json).unwrap();
        let restored = Activity::restore(&stored).unwrap();

        assert!(json.contains("2024-03-07T23:45:00-08:00"));
        assert_eq!(restored.description(), "Cycling on March 7");
        assert_eq!(restored.created_at().offset(), &pacific);
    }

    #[test]
    fn test_marker_label_and_class() {
        let ride = Activity::cycling(here(), 20.0, 60.0, 100.0, at(2024, 5, 1)).unwrap();
        assert_eq!(ride.marker_label(), "🚴‍♀️ Cycling on May 1");
        assert_eq!(ride.marker_class(), "cycling-popup");
    }

    #[test]
    fn test_restore_recomputes_derived_fields() {
        let run = Activity::running(here(), 10.0, 50.0, 180.0, at(2024, 6, 2)).unwrap();
        let restored = Activity::restore(&run.to_stored()).unwrap();

        assert_eq!(restored, run);
    }

    #[test]
    fn test_restore_requires_variant_field() {
        let mut stored = Activity::running(here(), 10.0, 50.0, 180.0, at(2024, 6, 2))
            .unwrap()
            .to_stored();
        stored.cadence = None;

        let err = Activity::restore(&stored).unwrap_err();
        assert_eq!(err.fields(), &[InputField::Cadence]);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let run = Activity::running(here(), 5.0, 25.0, 170.0, at(2024, 1, 1)).unwrap();
        let json = serde_json::to_value(&run).unwrap();

        assert_eq!(json["type"], "running");
        assert_eq!(json["coords"], serde_json::json!([42.5, 23.3]));
        assert_eq!(json["paceMinPerKm"], 5.0);
        assert_eq!(json["cadence"], 170);
    }
}
