// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Close gating.
//!
//! A week only closes after a validation pass. The validation result is
//! turned into a list of blockers according to the close policy; an empty
//! list authorises the `Open -> Closed` transition.

use crate::error::CoreError;
use hourledger_domain::{DomainError, ValidationResult, WeekControl, WeekControlState};
use time::OffsetDateTime;

/// Which checks a close has to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePolicy {
    /// End-of-week close by the person: the week must be over, the quota met
    /// and no pair over its assignment.
    Regular,
    /// Close ahead of schedule after a supervisor approved an early-close
    /// request. Only an assignment overflow blocks it.
    EarlyApproved,
}

/// A reason validation refused to close a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseBlocker {
    /// At least one (budget, role) pair logged more than was assigned.
    AssignationOverflowed,
    /// The calendar week has not ended yet.
    WeekNotOver,
    /// Logged hours are below the fixed weekly quota.
    WeekIncomplete,
}

impl CloseBlocker {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AssignationOverflowed => "hours exceed the assignment for a budget and role",
            Self::WeekNotOver => "the week has not ended yet",
            Self::WeekIncomplete => "logged hours are below the weekly quota",
        }
    }
}

/// Lists every blocker `result` raises under `policy`.
#[must_use]
pub fn evaluate_close(result: &ValidationResult, policy: ClosePolicy) -> Vec<CloseBlocker> {
    let mut blockers: Vec<CloseBlocker> = Vec::new();

    if result.assignation_overflowed {
        blockers.push(CloseBlocker::AssignationOverflowed);
    }

    if policy == ClosePolicy::Regular {
        if !result.time_completed {
            blockers.push(CloseBlocker::WeekNotOver);
        }
        if !result.week_completed {
            blockers.push(CloseBlocker::WeekIncomplete);
        }
    }

    blockers
}

/// Computes the closed state for `control` at instant `at`.
///
/// # Errors
///
/// Returns `DomainError::WeekAlreadyClosed` if the control is not open.
pub fn close_transition(
    control: &WeekControl,
    at: OffsetDateTime,
) -> Result<WeekControlState, CoreError> {
    match control.state {
        WeekControlState::Open => Ok(WeekControlState::Closed { at }),
        WeekControlState::Closed { .. } => Err(CoreError::DomainViolation(
            DomainError::WeekAlreadyClosed {
                week_control_id: control.week_control_id,
            },
        )),
    }
}

/// Validates-then-closes: the only path to a closed state.
///
/// # Errors
///
/// Returns `CoreError::CloseRejected` with every blocker when validation
/// refuses the close, or `DomainError::WeekAlreadyClosed` when the control
/// is already closed.
pub fn authorize_close(
    control: &WeekControl,
    result: &ValidationResult,
    policy: ClosePolicy,
    at: OffsetDateTime,
) -> Result<WeekControlState, CoreError> {
    let next_state: WeekControlState = close_transition(control, at)?;

    let blockers: Vec<CloseBlocker> = evaluate_close(result, policy);
    if !blockers.is_empty() {
        return Err(CoreError::CloseRejected {
            week_control_id: control.week_control_id,
            blockers,
        });
    }

    Ok(next_state)
}
