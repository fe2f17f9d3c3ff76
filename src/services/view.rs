// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View notifier boundary.
//!
//! The map widget, the activity list and the form live outside this crate.
//! The session controller drives them through [`MapView`]; [`CommandBuffer`]
//! records those calls as [`ViewCommand`]s so a browser UI can replay them.

use crate::models::{Activity, ActivityDetails, ActivityKind, Coordinates};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Calls the core makes into the map/list/form UI.
///
/// Views are held across awaited saves, hence `Send`.
pub trait MapView: Send {
    /// Place a marker with an open popup.
    fn render_marker(&mut self, coords: Coordinates, label: &str, class_name: &str);

    /// Add an activity to the list.
    fn render_list_item(&mut self, activity: &Activity);

    /// Pan/zoom the map to a location.
    fn focus_location(&mut self, coords: Coordinates, zoom: u8);

    /// Show the form and focus the distance input.
    fn open_form(&mut self);

    /// Hide the form and clear its inputs.
    fn close_form(&mut self);

    /// Show the cadence or the elevation row, depending on `variant`.
    fn show_form_variant(&mut self, variant: ActivityKind);

    /// Blocking user-facing message.
    fn alert(&mut self, message: &str);

    /// Remove all markers and list items.
    fn clear_all(&mut self);
}

/// One recorded [`MapView`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(
    tag = "command",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ViewCommand {
    RenderMarker {
        #[cfg_attr(feature = "binding-generation", ts(type = "[number, number]"))]
        coords: Coordinates,
        label: String,
        class_name: String,
    },
    RenderListItem {
        item: ListItem,
    },
    FocusLocation {
        #[cfg_attr(feature = "binding-generation", ts(type = "[number, number]"))]
        coords: Coordinates,
        zoom: u8,
    },
    OpenForm,
    CloseForm,
    ShowFormVariant {
        variant: ActivityKind,
    },
    Alert {
        message: String,
    },
    ClearAll,
}

/// Display-ready list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub details: Vec<ListDetail>,
}

/// One icon/value/unit cell of a list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ListDetail {
    pub icon: String,
    pub value: String,
    pub unit: String,
}

impl ListDetail {
    fn new(icon: &str, value: String, unit: &str) -> Self {
        Self {
            icon: icon.to_string(),
            value,
            unit: unit.to_string(),
        }
    }
}

impl From<&Activity> for ListItem {
    fn from(activity: &Activity) -> Self {
        let mut details = vec![
            ListDetail::new(
                activity.kind().icon(),
                activity.distance_km().to_string(),
                "km",
            ),
            ListDetail::new("⏱", activity.duration_min().to_string(), "min"),
        ];
        match *activity.details() {
            ActivityDetails::Running {
                cadence,
                pace_min_per_km,
            } => {
                details.push(ListDetail::new(
                    "⚡️",
                    format!("{:.1}", pace_min_per_km),
                    "min/km",
                ));
                details.push(ListDetail::new("🦶🏼", cadence.to_string(), "spm"));
            }
            ActivityDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                details.push(ListDetail::new(
                    "⚡️",
                    format!("{:.1}", speed_km_per_h),
                    "km/h",
                ));
                details.push(ListDetail::new("⛰", elevation_gain_m.to_string(), "m"));
            }
        }

        Self {
            id: activity.id().to_string(),
            kind: activity.kind(),
            title: activity.description().to_string(),
            details,
        }
    }
}

/// Markers as a GeoJSON FeatureCollection for map layers that consume GeoJSON.
///
/// Geometries are points in GeoJSON's `[lng, lat]` order.
pub fn marker_features(activities: &[Activity]) -> geojson::FeatureCollection {
    let features = activities
        .iter()
        .map(|activity| {
            let point: geo::Point<f64> = activity.coords().into();
            let mut properties = geojson::JsonObject::new();
            properties.insert("id".to_string(), activity.id().into());
            properties.insert("label".to_string(), activity.marker_label().into());
            properties.insert("className".to_string(), activity.marker_class().into());
            properties.insert("type".to_string(), activity.kind().as_str().into());

            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&point))),
                id: Some(geojson::feature::Id::String(activity.id().to_string())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// [`MapView`] that records every call in order.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<ViewCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[ViewCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<ViewCommand> {
        self.commands
    }
}

impl MapView for CommandBuffer {
    fn render_marker(&mut self, coords: Coordinates, label: &str, class_name: &str) {
        self.commands.push(ViewCommand::RenderMarker {
            coords,
            label: label.to_string(),
            class_name: class_name.to_string(),
        });
    }

    fn render_list_item(&mut self, activity: &Activity) {
        self.commands.push(ViewCommand::RenderListItem {
            item: ListItem::from(activity),
        });
    }

    fn focus_location(&mut self, coords: Coordinates, zoom: u8) {
        self.commands
            .push(ViewCommand::FocusLocation { coords, zoom });
    }

    fn open_form(&mut self) {
        self.commands.push(ViewCommand::OpenForm);
    }

    fn close_form(&mut self) {
        self.commands.push(ViewCommand::CloseForm);
    }

    fn show_form_variant(&mut self, variant: ActivityKind) {
        self.commands.push(ViewCommand::ShowFormVariant { variant });
    }

    fn alert(&mut self, message: &str) {
        self.commands.push(ViewCommand::Alert {
            message: message.to_string(),
        });
    }

    fn clear_all(&mut self) {
        self.commands.push(ViewCommand::ClearAll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_running_list_item() {
        let created = Utc.with_ymd_and_hms(2024, 4, 5, 19, 0, 0).unwrap();
        let run = Activity::running(Coordinates::new(42.5, 23.3), 5.2, 28.0, 178.0, created)
            .unwrap();

        let item = ListItem::from(&run);

        assert_eq!(item.title, "Running on April 5");
        let values: Vec<(&str, &str)> = item
            .details
            .iter()
            .map(|d| (d.value.as_str(), d.unit.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![("5.2", "km"), ("28", "min"), ("5.4", "min/km"), ("178", "spm")]
        );
    }

    #[test]
    fn test_cycling_list_item() {
        let created = Utc.with_ymd_and_hms(2024, 4, 5, 19, 0, 0).unwrap();
        let ride = Activity::cycling(Coordinates::new(42.5, 23.3), 27.0, 95.0, 523.0, created)
            .unwrap();

        let item = ListItem::from(&ride);

        assert_eq!(item.kind, ActivityKind::Cycling);
        assert_eq!(item.details[2].value, "17.1");
        assert_eq!(item.details[2].unit, "km/h");
        assert_eq!(item.details[3].value, "523");
    }

    #[test]
    fn test_marker_features_use_lng_lat_order() {
        let created = Utc.with_ymd_and_hms(2024, 4, 5, 19, 0, 0).unwrap();
        let run = Activity::running(Coordinates::new(42.5, 23.3), 5.0, 25.0, 170.0, created)
            .unwrap();

        let collection = marker_features(std::slice::from_ref(&run));
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        let feature = &json["features"][0];
        assert_eq!(feature["id"], run.id());
        assert_eq!(
            feature["geometry"]["coordinates"],
            serde_json::json!([23.3, 42.5])
        );
        assert_eq!(feature["properties"]["id"], run.id());
        assert_eq!(feature["properties"]["label"], run.marker_label());
        assert_eq!(feature["properties"]["className"], "running-popup");
        assert_eq!(feature["properties"]["type"], "running");
    }

    #[test]
    fn test_command_serialization() {
        let mut view = CommandBuffer::new();
        view.render_marker(Coordinates::new(1.0, 2.0), "🏃‍♂️ Running on May 1", "running-popup");
        view.close_form();

        let json = serde_json::to_value(view.commands()).unwrap();

        assert_eq!(json[0]["command"], "renderMarker");
        assert_eq!(json[0]["coords"], serde_json::json!([1.0, 2.0]));
        assert_eq!(json[0]["className"], "running-popup");
        assert_eq!(json[1], serde_json::json!({ "command": "closeForm" }));
    }
}
