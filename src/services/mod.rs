// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session logic layer.

pub mod session;
pub mod store;
pub mod view;

pub use session::{
    EventOutcome, ResetReceipt, SessionController, SessionEvent, SessionState, SubmitError,
    SubmitReceipt,
};
pub use store::{ActivityStore, StoreError};
pub use view::{CommandBuffer, ListItem, MapView, ViewCommand};
