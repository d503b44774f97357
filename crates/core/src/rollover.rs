// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use hourledger_domain::{Calendar, CalendarWeek, WeekCode};

/// The control records a rollover must create, in week order.
///
/// Every skipped week is recorded as already closed so the gap stays
/// auditable. Only `open` becomes the person's new open week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverPlan {
    /// Weeks without a single working day, oldest first.
    pub skipped: Vec<WeekCode>,
    /// The first following week with at least one working day.
    pub open: WeekCode,
}

impl RolloverPlan {
    /// Every week the plan touches, skipped weeks first.
    pub fn weeks(&self) -> impl Iterator<Item = WeekCode> + '_ {
        self.skipped.iter().copied().chain(std::iter::once(self.open))
    }
}

/// Plans the successor weeks for a person whose last week was `previous`.
///
/// Scanning starts strictly after `previous` ends and stops at the first
/// week holding a working day.
///
/// # Errors
///
/// Returns `CoreError::RolloverExhausted` if `max_weeks` weeks are scanned
/// without finding a working day, or a domain error on date overflow.
pub fn plan_rollover<C: Calendar + ?Sized>(
    previous: WeekCode,
    calendar: &C,
    max_weeks: u32,
) -> Result<RolloverPlan, CoreError> {
    let mut skipped: Vec<WeekCode> = Vec::new();
    let mut candidate: WeekCode = previous.next()?;

    for _ in 0..max_weeks {
        let week: CalendarWeek = candidate.calendar_week()?;
        if calendar.working_days_in(&week) > 0 {
            return Ok(RolloverPlan {
                skipped,
                open: candidate,
            });
        }
        skipped.push(candidate);
        candidate = week.next_code()?;
    }

    Err(CoreError::RolloverExhausted {
        after: previous,
        weeks_scanned: max_weeks,
    })
}
