// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Tracker: log runs and rides on a map
//!
//! This crate provides the activity model, the session state machine that
//! turns map clicks and form submissions into saved activities, and the HTTP
//! API a browser map UI uses to drive it.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::SessionController;
use tokio::sync::Mutex;

/// Shared application state.
///
/// The mutex serializes events: each one runs to completion before the next
/// is looked at.
pub struct AppState {
    pub config: Config,
    pub session: Mutex<SessionController>,
}

impl AppState {
    pub fn new(config: Config, session: SessionController) -> Self {
        Self {
            config,
            session: Mutex::new(session),
        }
    }
}
