// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dates::{DayCode, WeekCode};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Hours value is negative, NaN or infinite.
    InvalidHours(String),
    /// Integer is not a real `YYYYMMDD` day.
    InvalidDayCode(i32),
    /// Integer is not a real ISO `YYYYWW` week.
    InvalidWeekCode(i32),
    /// A dated entry does not fall inside the week it is filed under.
    DateOutsideWeek {
        /// The offending day.
        day: DayCode,
        /// The week the entry was filed under.
        week: WeekCode,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Working-day search exhausted its horizon.
    NoWorkingDayFound {
        /// The day the search started from.
        after: DayCode,
        /// Consecutive non-working days scanned before giving up.
        scanned_days: u32,
    },
    /// Stored budget status is not recognised.
    InvalidBudgetStatus(String),
    /// Stored week control columns contradict each other.
    InvalidWeekControlState {
        /// The control record.
        week_control_id: i64,
        /// What is inconsistent.
        reason: String,
    },
    /// Failed to parse a stored timestamp.
    InvalidTimestamp {
        /// The raw value.
        value: String,
        /// The parser message.
        error: String,
    },
    /// Name is empty or invalid.
    InvalidName(String),
    /// Audit justification is empty.
    EmptyJustification,
    /// The project already holds an open budget.
    ProjectAlreadyHasOpenBudget {
        /// The project.
        project_id: i64,
        /// The budget that is currently open.
        open_budget_id: i64,
    },
    /// The control week is closed and its entries are frozen.
    WeekClosed {
        /// The person owning the week.
        person_id: i64,
        /// The closed week.
        week: WeekCode,
    },
    /// The control week has already been closed.
    WeekAlreadyClosed {
        /// The control record.
        week_control_id: i64,
    },
    /// The person already has an open control week.
    PersonAlreadyHasOpenWeek {
        /// The person.
        person_id: i64,
        /// The week that is open.
        week: WeekCode,
    },
    /// A control record already exists for this person and week.
    WeekControlAlreadyExists {
        /// The person.
        person_id: i64,
        /// The week.
        week: WeekCode,
    },
    /// The week precedes the person's most recent control week.
    WeekBeforeLatest {
        /// The person.
        person_id: i64,
        /// The requested week.
        week: WeekCode,
        /// The person's most recent control week.
        latest: WeekCode,
    },
    /// An early-close request is already pending for the control week.
    EarlyCloseAlreadyRequested {
        /// The control record.
        week_control_id: i64,
    },
    /// A registry row already exists for this control, budget and role.
    DuplicateRegistry {
        /// The control record.
        week_control_id: i64,
        /// The budget.
        budget_id: i64,
        /// The role.
        role_id: i64,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHours(value) => {
                write!(f, "Invalid hours: {value}. Must be finite and not negative")
            }
            Self::InvalidDayCode(code) => write!(f, "Invalid day code: {code}"),
            Self::InvalidWeekCode(code) => write!(f, "Invalid week code: {code}"),
            Self::DateOutsideWeek { day, week } => {
                write!(f, "Day {day} does not belong to week {week}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::NoWorkingDayFound {
                after,
                scanned_days,
            } => {
                write!(
                    f,
                    "No working day found after {after} within {scanned_days} days"
                )
            }
            Self::InvalidBudgetStatus(value) => write!(f, "Invalid budget status: {value}"),
            Self::InvalidWeekControlState {
                week_control_id,
                reason,
            } => {
                write!(
                    f,
                    "Week control {week_control_id} is inconsistent: {reason}"
                )
            }
            Self::InvalidTimestamp { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::EmptyJustification => write!(f, "A justification is required"),
            Self::ProjectAlreadyHasOpenBudget {
                project_id,
                open_budget_id,
            } => {
                write!(
                    f,
                    "Project {project_id} already has an open budget ({open_budget_id})"
                )
            }
            Self::WeekClosed { .. } => write!(f, "the week is closed, cannot be modified"),
            Self::WeekAlreadyClosed { week_control_id } => {
                write!(f, "Week control {week_control_id} is already closed")
            }
            Self::PersonAlreadyHasOpenWeek { person_id, week } => {
                write!(f, "Person {person_id} already has open week {week}")
            }
            Self::WeekControlAlreadyExists { person_id, week } => {
                write!(
                    f,
                    "Person {person_id} already has a control record for week {week}"
                )
            }
            Self::WeekBeforeLatest {
                person_id,
                week,
                latest,
            } => {
                write!(
                    f,
                    "Week {week} precedes week {latest}, the latest control week of person {person_id}"
                )
            }
            Self::EarlyCloseAlreadyRequested { week_control_id } => {
                write!(
                    f,
                    "An early close request is already pending for week control {week_control_id}"
                )
            }
            Self::DuplicateRegistry {
                week_control_id,
                budget_id,
                role_id,
            } => {
                write!(
                    f,
                    "Week control {week_control_id} already has hours for budget {budget_id}, role {role_id}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
