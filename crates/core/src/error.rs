// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::close::CloseBlocker;
use hourledger_domain::{DomainError, WeekCode};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// Validation did not allow the week to close.
    CloseRejected {
        /// The control record that was to be closed.
        week_control_id: i64,
        /// Every reason the close was refused.
        blockers: Vec<CloseBlocker>,
    },
    /// Rollover scanned its whole horizon without finding a working week.
    RolloverExhausted {
        /// The week rollover started after.
        after: WeekCode,
        /// Number of weeks scanned.
        weeks_scanned: u32,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::CloseRejected {
                week_control_id,
                blockers,
            } => {
                let reasons: Vec<&'static str> =
                    blockers.iter().map(CloseBlocker::description).collect();
                write!(
                    f,
                    "Week control {week_control_id} cannot be closed: {}",
                    reasons.join("; ")
                )
            }
            Self::RolloverExhausted {
                after,
                weeks_scanned,
            } => {
                write!(
                    f,
                    "No week with a working day found in the {weeks_scanned} weeks after {after}"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
