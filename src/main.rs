// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Tracker API Server
//!
//! Serves the session API for the map UI and keeps the activity list in a
//! file under the configured data directory.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker::{
    config::Config,
    db::{ActivityRepository, FileSlotStorage},
    services::{CommandBuffer, SessionController},
    time_utils::SystemClock,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Workout Tracker API");

    // Saved activity slot
    let storage = Arc::new(FileSlotStorage::new(&config.data_dir));
    tracing::info!(
        dir = %config.data_dir.display(),
        slot = %config.storage_key,
        "Using file storage"
    );
    let repository = ActivityRepository::new(storage, config.storage_key.clone());

    // Hydrate once at boot so problems with saved data show up in the logs
    // immediately; each page load starts its own session via POST /api/session.
    let mut session = SessionController::new(
        repository,
        Arc::new(SystemClock),
        config.map_zoom_level,
    );
    let restored = session.start(&mut CommandBuffer::new()).await;
    tracing::info!(restored, "Session initialized");

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), session));

    // Build router
    let app = workout_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("workout_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
