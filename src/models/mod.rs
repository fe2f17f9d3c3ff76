// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod form;
pub mod stored;

pub use activity::{
    Activity, ActivityDetails, ActivityKind, Coordinates, InputField, InvalidInputError,
};
pub use form::ActivityForm;
pub use stored::StoredActivity;
