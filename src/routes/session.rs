// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session, map and form event routes.

use crate::error::{AppError, Result};
use crate::models::{ActivityForm, ActivityKind, Coordinates};
use crate::routes::EventResponse;
use crate::services::{CommandBuffer, EventOutcome, SessionEvent, SessionState, ViewCommand};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session).post(start_session))
        .route("/api/map/ready", post(map_ready))
        .route("/api/map/position", post(report_position))
        .route("/api/map/click", post(select_location))
        .route("/api/form/variant", put(toggle_variant))
        .route("/api/form/submit", post(submit_form))
        .route("/api/form/cancel", post(cancel_form))
}

/// Run one event through the session and collect the view commands.
pub(crate) async fn dispatch(
    state: &AppState,
    event: SessionEvent,
) -> Result<(EventOutcome, CommandBuffer)> {
    let mut session = state.session.lock().await;
    let mut view = CommandBuffer::new();
    let outcome = session.handle(event, &mut view).await?;
    Ok((outcome, view))
}

// ─── Session ─────────────────────────────────────────────────

/// Current session state.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// "idle" or "awaiting_submission"
    pub state: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "[number, number] | null"))]
    pub pending: Option<Coordinates>,
    pub form_variant: ActivityKind,
    pub map_ready: bool,
    pub activity_count: usize,
}

async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    let state_name = match session.state() {
        SessionState::Idle => "idle",
        SessionState::AwaitingSubmission { .. } => "awaiting_submission",
    };

    Json(SessionResponse {
        state: state_name.to_string(),
        pending: session.pending(),
        form_variant: session.form_variant(),
        map_ready: session.is_map_ready(),
        activity_count: session.store().len(),
    })
}

/// Response for a (re)started session.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StartResponse {
    pub restored: usize,
    pub commands: Vec<ViewCommand>,
}

/// Start a page session: rehydrate from the saved slot and list everything.
async fn start_session(State(state): State<Arc<AppState>>) -> Json<StartResponse> {
    let mut session = state.session.lock().await;
    let mut view = CommandBuffer::new();
    let restored = session.start(&mut view).await;

    Json(StartResponse {
        restored,
        commands: view.into_commands(),
    })
}

// ─── Map Events ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    /// `[lat, lng]`
    pub coords: Coordinates,
}

/// Geolocation result; `coords` is absent or null when unavailable.
#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    #[serde(default)]
    pub coords: Option<Coordinates>,
}

async fn map_ready(State(state): State<Arc<AppState>>) -> Result<Json<EventResponse>> {
    let (_, view) = dispatch(&state, SessionEvent::MapReady).await?;
    Ok(Json(view.into()))
}

async fn report_position(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PositionRequest>,
) -> Result<Json<EventResponse>> {
    if req.coords.is_some_and(|coords| !coords.is_valid()) {
        return Err(AppError::BadRequest(
            "coords must be [lat, lng] within range".to_string(),
        ));
    }
    let (_, view) = dispatch(&state, SessionEvent::PositionAcquired(req.coords)).await?;
    Ok(Json(view.into()))
}

async fn select_location(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocationRequest>,
) -> Result<Json<EventResponse>> {
    if !req.coords.is_valid() {
        return Err(AppError::BadRequest(
            "coords must be [lat, lng] within range".to_string(),
        ));
    }
    let (_, view) = dispatch(&state, SessionEvent::LocationSelected(req.coords)).await?;
    Ok(Json(view.into()))
}

// ─── Form Events ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VariantRequest {
    pub variant: ActivityKind,
}

async fn toggle_variant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VariantRequest>,
) -> Result<Json<EventResponse>> {
    let (_, view) = dispatch(&state, SessionEvent::VariantToggled(req.variant)).await?;
    Ok(Json(view.into()))
}

/// A created activity plus what to render for it.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubmitResponse {
    pub id: String,
    /// False when saving failed; the activity is kept for this session only.
    pub persisted: bool,
    pub commands: Vec<ViewCommand>,
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ActivityForm>,
) -> Result<Json<SubmitResponse>> {
    let (outcome, view) = dispatch(&state, SessionEvent::FormSubmitted(form)).await?;
    let EventOutcome::Created(receipt) = outcome else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Unexpected outcome for form submission: {:?}",
            outcome
        )));
    };

    Ok(Json(SubmitResponse {
        id: receipt.id,
        persisted: receipt.persisted,
        commands: view.into_commands(),
    }))
}

async fn cancel_form(State(state): State<Arc<AppState>>) -> Result<Json<EventResponse>> {
    let (_, view) = dispatch(&state, SessionEvent::FormCancelled).await?;
    Ok(Json(view.into()))
}
