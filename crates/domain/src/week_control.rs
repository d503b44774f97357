// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week control records.
//!
//! One record exists per (person, ISO week). A record is either open or
//! closed at a known instant; "closed without a close date" and "open with a
//! close date" are not representable.

use crate::dates::WeekCode;
use crate::error::DomainError;
use time::OffsetDateTime;

/// Lifecycle state of a control week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekControlState {
    Open,
    Closed { at: OffsetDateTime },
}

impl WeekControlState {
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    #[must_use]
    pub const fn closed_at(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Open => None,
            Self::Closed { at } => Some(*at),
        }
    }

    /// Rebuilds a state from its stored `(closed, close_date)` pair.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeekControlState` when the flag and the
    /// timestamp disagree.
    pub fn from_parts(
        week_control_id: i64,
        closed: bool,
        close_date: Option<OffsetDateTime>,
    ) -> Result<Self, DomainError> {
        match (closed, close_date) {
            (false, None) => Ok(Self::Open),
            (true, Some(at)) => Ok(Self::Closed { at }),
            (false, Some(_)) => Err(DomainError::InvalidWeekControlState {
                week_control_id,
                reason: String::from("open record carries a close date"),
            }),
            (true, None) => Err(DomainError::InvalidWeekControlState {
                week_control_id,
                reason: String::from("closed record has no close date"),
            }),
        }
    }
}

/// The per-person, per-week record gating whether time entries may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekControl {
    pub week_control_id: i64,
    pub person_id: i64,
    pub week: WeekCode,
    pub state: WeekControlState,
}

impl WeekControl {
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}
