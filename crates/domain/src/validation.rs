// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::Calendar;
use crate::dates::{CalendarWeek, DayCode, WeekCode};
use crate::error::DomainError;
use crate::hours::Hours;
use crate::types::{AllocationKey, Assignment, PendingEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Validates that a display name is usable.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty or only whitespace.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a dated entry belongs to the week it is filed under.
///
/// # Errors
///
/// Returns `DomainError::DateOutsideWeek` if `day` is outside `week`, or a
/// decoding error if either code is invalid.
pub fn validate_day_in_week(day: DayCode, week: WeekCode) -> Result<(), DomainError> {
    let date: Date = day.to_date()?;
    if WeekCode::containing(date) != week {
        return Err(DomainError::DateOutsideWeek { day, week });
    }
    Ok(())
}

/// Planned versus logged hours for one (budget, role) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairBalance {
    pub key: AllocationKey,
    /// Sum of assignment hours for the pair in the week.
    pub expected: Hours,
    /// Submitted hours, or `None` when nothing was submitted for the pair.
    pub executed: Option<Hours>,
}

impl PairBalance {
    #[must_use]
    pub fn is_overflowed(&self) -> bool {
        self.executed.is_some_and(|executed| executed > self.expected)
    }
}

/// Outcome of validating a week.
///
/// The four flags are independent metrics. `assignation_overflowed` compares
/// against per-pair assignment totals while `week_completed` and
/// `week_overflowed` compare against the fixed daily quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub assignation_overflowed: bool,
    pub time_completed: bool,
    pub week_completed: bool,
    pub week_overflowed: bool,
    pub pairs: Vec<PairBalance>,
    pub executed_total: Hours,
    pub quota_total: Hours,
}

impl ValidationResult {
    /// Pairs whose logged hours exceed their planned hours.
    pub fn overflowed_pairs(&self) -> impl Iterator<Item = &PairBalance> {
        self.pairs.iter().filter(|pair| pair.is_overflowed())
    }
}

/// Validates a person's week against their assignments and submitted hours.
///
/// Assignments belonging to another person or week are ignored. Entries for a
/// pair with no assignment are reconciled against zero planned hours; entries
/// repeated for one pair are summed. `today` decides whether the week is over:
/// it must be at least the day after the week's Sunday.
///
/// # Errors
///
/// Returns `DomainError::InvalidHours` if any pair total, the executed total
/// or the quota total is not finite.
pub fn validate_week<C: Calendar + ?Sized>(
    person_id: i64,
    week: &CalendarWeek,
    assignments: &[Assignment],
    entries: &[PendingEntry],
    calendar: &C,
    daily_quota: Hours,
    today: Date,
) -> Result<ValidationResult, DomainError> {
    let mut expected: BTreeMap<AllocationKey, Hours> = BTreeMap::new();
    for assignment in assignments
        .iter()
        .filter(|a| a.person_id == person_id && a.week == week.code())
    {
        let slot: &mut Hours = expected.entry(assignment.key()).or_insert(Hours::ZERO);
        *slot = slot.checked_add(assignment.hours)?;
    }

    let mut executed: BTreeMap<AllocationKey, Hours> = BTreeMap::new();
    for entry in entries {
        let slot: &mut Hours = executed.entry(entry.key()).or_insert(Hours::ZERO);
        *slot = slot.checked_add(entry.hours)?;
    }

    let mut keys: Vec<AllocationKey> = expected.keys().chain(executed.keys()).copied().collect();
    keys.sort_unstable();
    keys.dedup();

    let pairs: Vec<PairBalance> = keys
        .into_iter()
        .map(|key| PairBalance {
            key,
            expected: expected.get(&key).copied().unwrap_or(Hours::ZERO),
            executed: executed.get(&key).copied(),
        })
        .collect();

    let executed_total: Hours = Hours::checked_sum(executed.values().copied())?;
    let quota_total: Hours = daily_quota.checked_times(calendar.working_days_in(week))?;

    Ok(ValidationResult {
        assignation_overflowed: pairs.iter().any(PairBalance::is_overflowed),
        time_completed: today > week.end(),
        week_completed: executed_total >= quota_total,
        week_overflowed: executed_total > quota_total,
        pairs,
        executed_total,
        quota_total,
    })
}
