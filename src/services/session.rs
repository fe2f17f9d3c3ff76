// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session controller.
//!
//! Owns the interaction state machine and sequences every event:
//! 1. Validate form input into an [`Activity`]
//! 2. Append it to the [`ActivityStore`]
//! 3. Persist the whole list through the [`ActivityRepository`]
//! 4. Tell the [`MapView`] what to render
//!
//! Events run to completion one at a time; the pending map location is the
//! only state carried between them. Saves are awaited inside the event so they
//! land in event order, while the I/O itself runs off the async workers.

use crate::db::ActivityRepository;
use crate::models::{Activity, ActivityForm, ActivityKind, Coordinates, InvalidInputError};
use crate::services::store::ActivityStore;
use crate::services::view::MapView;
use crate::time_utils::Clock;
use std::sync::Arc;

/// Shown when the submitted form does not validate.
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";
/// Shown when the browser cannot report a position.
pub const POSITION_UNAVAILABLE_MESSAGE: &str = "Could not get your position!";

/// Interaction state.
///
/// The state after a successful submission is the same as `Idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    /// No location selected.
    Idle,
    /// A map location was selected and the form is open.
    AwaitingSubmission { pending: Coordinates },
}

/// External events that drive the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// One-shot geolocation result; `None` when unavailable.
    PositionAcquired(Option<Coordinates>),
    MapReady,
    LocationSelected(Coordinates),
    VariantToggled(ActivityKind),
    FormSubmitted(ActivityForm),
    FormCancelled,
    ListItemActivated(String),
    ResetRequested,
}

/// Result of a handled event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Applied,
    Created(SubmitReceipt),
    Reset(ResetReceipt),
}

/// A created activity.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub id: String,
    /// False when the write failed; the activity still exists in memory.
    pub persisted: bool,
}

/// A completed reset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetReceipt {
    pub removed: usize,
    /// False when the saved slot could not be removed.
    pub persisted: bool,
}

/// Why a submission created nothing.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("No map location selected")]
    NoPendingLocation,

    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("Activity id already present: {0}")]
    DuplicateId(String),
}

/// Session state plus the collaborators it needs.
pub struct SessionController {
    store: ActivityStore,
    repository: ActivityRepository,
    clock: Arc<dyn Clock>,
    zoom_level: u8,
    state: SessionState,
    form_variant: ActivityKind,
    map_ready: bool,
    position_resolved: bool,
    /// Ids whose markers wait for the map.
    deferred_markers: Vec<String>,
}

impl SessionController {
    pub fn new(repository: ActivityRepository, clock: Arc<dyn Clock>, zoom_level: u8) -> Self {
        Self {
            store: ActivityStore::new(),
            repository,
            clock,
            zoom_level,
            state: SessionState::Idle,
            form_variant: ActivityKind::default(),
            map_ready: false,
            position_resolved: false,
            deferred_markers: Vec::new(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pending(&self) -> Option<Coordinates> {
        match self.state {
            SessionState::AwaitingSubmission { pending } => Some(pending),
            SessionState::Idle => None,
        }
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn form_variant(&self) -> ActivityKind {
        self.form_variant
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }

    // ─── Startup ─────────────────────────────────────────────

    /// Begin a session: hydrate from the saved slot and render the list.
    ///
    /// Markers are held back until [`Self::map_ready`]. Any invalid saved
    /// record discards the whole saved list. Returns the number of activities
    /// loaded.
    pub async fn start(&mut self, view: &mut dyn MapView) -> usize {
        self.state = SessionState::Idle;
        self.map_ready = false;
        self.position_resolved = false;
        self.deferred_markers.clear();

        let Some(records) = self.repository.load().await else {
            self.store.clear();
            tracing::info!("No saved activities");
            return 0;
        };

        match self.store.replace_all(&records) {
            Ok(count) => {
                tracing::info!(count, "Activities restored");
                for activity in self.store.all() {
                    view.render_list_item(activity);
                    self.deferred_markers.push(activity.id().to_string());
                }
                count
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    records = records.len(),
                    "Discarding saved activities, starting empty"
                );
                0
            }
        }
    }

    // ─── Events ──────────────────────────────────────────────

    /// Dispatch one event.
    pub async fn handle(
        &mut self,
        event: SessionEvent,
        view: &mut dyn MapView,
    ) -> Result<EventOutcome, SubmitError> {
        match event {
            SessionEvent::PositionAcquired(position) => self.position_acquired(position, view),
            SessionEvent::MapReady => self.map_ready(view),
            SessionEvent::LocationSelected(coords) => self.select_location(coords, view),
            SessionEvent::VariantToggled(variant) => self.toggle_variant(variant, view),
            SessionEvent::FormSubmitted(form) => {
                return self.submit(&form, view).await.map(EventOutcome::Created);
            }
            SessionEvent::FormCancelled => self.cancel(view),
            SessionEvent::ListItemActivated(id) => self.activate_list_item(&id, view),
            SessionEvent::ResetRequested => {
                return Ok(EventOutcome::Reset(self.reset(view).await));
            }
        }
        Ok(EventOutcome::Applied)
    }

    /// Geolocation answered. Only the first answer counts.
    pub fn position_acquired(&mut self, position: Option<Coordinates>, view: &mut dyn MapView) {
        if self.position_resolved {
            tracing::debug!("Ignoring repeated position report");
            return;
        }
        self.position_resolved = true;

        match position {
            Some(coords) => {
                tracing::debug!(lat = coords.lat, lng = coords.lng, "Position acquired");
                view.focus_location(coords, self.zoom_level);
            }
            None => {
                tracing::warn!("Position unavailable");
                view.alert(POSITION_UNAVAILABLE_MESSAGE);
            }
        }
    }

    /// The map exists: flush markers held back during hydration.
    pub fn map_ready(&mut self, view: &mut dyn MapView) {
        if self.map_ready {
            tracing::debug!("Map already ready");
            return;
        }
        self.map_ready = true;

        let deferred = std::mem::take(&mut self.deferred_markers);
        tracing::debug!(count = deferred.len(), "Map ready, rendering deferred markers");
        for id in deferred {
            if let Ok(activity) = self.store.find_by_id(&id) {
                render_marker(view, activity);
            }
        }
    }

    /// A map location was clicked. Replaces any earlier pending location.
    pub fn select_location(&mut self, coords: Coordinates, view: &mut dyn MapView) {
        tracing::debug!(lat = coords.lat, lng = coords.lng, "Location selected");
        self.state = SessionState::AwaitingSubmission { pending: coords };
        view.open_form();
    }

    /// Switch between the cadence and elevation inputs.
    pub fn toggle_variant(&mut self, variant: ActivityKind, view: &mut dyn MapView) {
        if self.form_variant != variant {
            self.form_variant = variant;
            view.show_form_variant(variant);
        }
    }

    /// Create an activity at the pending location.
    ///
    /// On invalid input the user is alerted and the pending location is kept
    /// so they can correct the form. A form without a variant is read as the
    /// last toggled one.
    pub async fn submit(
        &mut self,
        form: &ActivityForm,
        view: &mut dyn MapView,
    ) -> Result<SubmitReceipt, SubmitError> {
        let SessionState::AwaitingSubmission { pending } = self.state else {
            tracing::warn!("Form submitted without a selected location");
            return Err(SubmitError::NoPendingLocation);
        };

        let variant = form.variant_or(self.form_variant);
        let activity = match form.build(variant, pending, self.clock.now()) {
            Ok(activity) => activity,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected form input");
                view.alert(INVALID_INPUT_MESSAGE);
                return Err(e.into());
            }
        };

        let id = activity.id().to_string();
        if let Err(e) = self.store.add(activity) {
            tracing::warn!(activity_id = %id, error = %e, "Activity not added");
            return Err(SubmitError::DuplicateId(id));
        }
        let persisted = self.persist().await;

        if let Ok(activity) = self.store.find_by_id(&id) {
            if self.map_ready {
                render_marker(view, activity);
            } else {
                self.deferred_markers.push(id.clone());
            }
            view.render_list_item(activity);
        }

        self.state = SessionState::Idle;
        self.form_variant = variant;
        view.close_form();

        tracing::info!(activity_id = %id, kind = %variant, persisted, "Activity created");
        Ok(SubmitReceipt { id, persisted })
    }

    /// Close the form and forget the pending location.
    pub fn cancel(&mut self, view: &mut dyn MapView) {
        if let SessionState::AwaitingSubmission { .. } = self.state {
            self.state = SessionState::Idle;
            view.close_form();
            tracing::debug!("Form cancelled");
        }
    }

    /// Focus the map on a listed activity. Unknown ids are logged and ignored.
    pub fn activate_list_item(&mut self, id: &str, view: &mut dyn MapView) {
        match self.store.find_by_id(id) {
            Ok(activity) => view.focus_location(activity.coords(), self.zoom_level),
            Err(e) => tracing::warn!(activity_id = %id, error = %e, "List item not found"),
        }
    }

    /// Delete every activity, in memory and in the saved slot.
    ///
    /// This cannot be undone.
    pub async fn reset(&mut self, view: &mut dyn MapView) -> ResetReceipt {
        let removed = self.store.len();
        self.store.clear();
        self.deferred_markers.clear();
        self.state = SessionState::Idle;

        let persisted = match self.repository.clear().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to remove saved activities");
                false
            }
        };

        view.close_form();
        view.clear_all();
        tracing::info!(removed, persisted, "All activities reset");
        ResetReceipt { removed, persisted }
    }

    /// Write the whole list. Failures are logged; memory stays authoritative.
    async fn persist(&self) -> bool {
        match self.repository.save(self.store.all()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    count = self.store.len(),
                    "Failed to save activities, keeping them in memory"
                );
                false
            }
        }
    }
}

fn render_marker(view: &mut dyn MapView, activity: &Activity) {
    view.render_marker(
        activity.coords(),
        &activity.marker_label(),
        &activity.marker_class(),
    );
}
