// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity list routes.

use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::routes::session::dispatch;
use crate::routes::EventResponse;
use crate::services::view::marker_features;
use crate::services::{EventOutcome, SessionEvent, ViewCommand};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).delete(reset_activities))
        .route("/api/activities/geojson", get(activities_geojson))
        .route("/api/activities/{id}", get(get_activity))
        .route("/api/activities/{id}/focus", post(focus_activity))
}

/// All activities, oldest first, with derived metrics.
async fn list_activities(State(state): State<Arc<AppState>>) -> Json<Vec<Activity>> {
    let session = state.session.lock().await;
    Json(session.store().all().to_vec())
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    let session = state.session.lock().await;
    let activity = session.store().find_by_id(&id)?;
    Ok(Json(activity.clone()))
}

/// Markers as GeoJSON.
async fn activities_geojson(
    State(state): State<Arc<AppState>>,
) -> Json<geojson::FeatureCollection> {
    let session = state.session.lock().await;
    Json(marker_features(session.store().all()))
}

/// A list item was clicked. Unknown ids produce no commands.
async fn focus_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>> {
    let (_, view) = dispatch(&state, SessionEvent::ListItemActivated(id)).await?;
    Ok(Json(view.into()))
}

/// Response for a reset.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResetResponse {
    pub removed: usize,
    pub persisted: bool,
    pub commands: Vec<ViewCommand>,
}

/// Delete every activity, including the saved copy. Irreversible.
async fn reset_activities(State(state): State<Arc<AppState>>) -> Result<Json<ResetResponse>> {
    let (outcome, view) = dispatch(&state, SessionEvent::ResetRequested).await?;
    let EventOutcome::Reset(receipt) = outcome else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Unexpected outcome for reset: {:?}",
            outcome
        )));
    };

    Ok(Json(ResetResponse {
        removed: receipt.removed,
        persisted: receipt.persisted,
        commands: view.into_commands(),
    }))
}
