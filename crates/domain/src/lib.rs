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

mod budget;
mod calendar;
mod dates;
mod error;
mod hours;
mod types;
mod validation;
mod week_control;

#[cfg(test)]
mod tests;

pub use budget::{Budget, BudgetStatus};
pub use calendar::{Calendar, HolidayCalendar, is_weekend};
pub use dates::{CalendarWeek, DayCode, WeekCode};
pub use error::DomainError;
pub use hours::{DEFAULT_DAILY_QUOTA_HOURS, Hours};
pub use types::{
    AllocationKey, Assignment, EarlyCloseRequest, PendingEntry, Person, Project, Registry, Role,
};
pub use validation::{
    PairBalance, ValidationResult, validate_day_in_week, validate_name, validate_week,
};
pub use week_control::{WeekControl, WeekControlState};
