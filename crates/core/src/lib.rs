// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Week-control state machine rules.
//!
//! Everything here is a pure decision over values read by the caller. The
//! persistence layer reads state under a lock, asks these functions what to
//! do, and writes the outcome in the same transaction.

mod close;
mod config;
mod error;
mod gating;
mod rollover;

#[cfg(test)]
mod tests;

pub use close::{CloseBlocker, ClosePolicy, authorize_close, close_transition, evaluate_close};
pub use config::{DEFAULT_MAX_ROLLOVER_WEEKS, EngineConfig};
pub use error::CoreError;
pub use gating::{
    AssignmentDeletePlan, ensure_can_open_budget, ensure_early_close_allowed,
    ensure_no_open_week, ensure_not_before_latest_week, ensure_registry_writable,
    ensure_week_editable, plan_assignment_delete, registry_change,
};
pub use rollover::{RolloverPlan, plan_rollover};
