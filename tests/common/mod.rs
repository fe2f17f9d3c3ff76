// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use workout_tracker::config::Config;
use workout_tracker::db::{ActivityRepository, MemorySlotStorage};
use workout_tracker::routes::create_router;
use workout_tracker::services::SessionController;
use workout_tracker::time_utils::SteppingClock;
use workout_tracker::AppState;

/// Slot name used by every test.
#[allow(dead_code)]
pub const SLOT: &str = "workouts";

/// Clock starting 2024-04-05 19:00 UTC, one minute per call.
#[allow(dead_code)]
pub fn test_clock() -> Arc<SteppingClock> {
    let start = Utc.with_ymd_and_hms(2024, 4, 5, 19, 0, 0).unwrap();
    Arc::new(SteppingClock::new(start, Duration::minutes(1)))
}

/// Create a controller over the given memory storage.
#[allow(dead_code)]
pub fn test_session(storage: Arc<MemorySlotStorage>) -> SessionController {
    let repository = ActivityRepository::new(storage, SLOT);
    SessionController::new(repository, test_clock(), 13)
}

/// Create a test app with in-memory storage.
/// Returns the router, the shared state and the storage.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemorySlotStorage>) {
    let storage = Arc::new(MemorySlotStorage::new());
    let state = Arc::new(AppState::new(
        Config::default(),
        test_session(storage.clone()),
    ));
    (create_router(state.clone()), state, storage)
}
