// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain values.
//!
//! Rows are read with `Selectable` structs and converted eagerly. A row that
//! does not convert is reported as `PersistenceError::CorruptRecord`, never
//! as a business rejection.

use diesel::prelude::*;
use hourledger_audit::{Actor, Justification, RegistryChange, RegistryLogEntry};
use hourledger_domain::{
    Assignment, Budget, BudgetStatus, DayCode, DomainError, EarlyCloseRequest, Hours, Person,
    Project, Registry, Role, WeekCode, WeekControl, WeekControlState,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::diesel_schema::{
    assignments, budgets, early_close_requests, holidays, persons, projects, registries,
    registry_logs, roles, week_controls,
};
use crate::error::PersistenceError;

/// A declared non-working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub day: DayCode,
    pub description: String,
}

/// Results of the cross-row invariant scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Persons with at least one control record but no open week.
    pub persons_without_open_week: Vec<i64>,
    /// Persons with more than one open week.
    pub persons_with_multiple_open_weeks: Vec<i64>,
    /// Projects with more than one open budget.
    pub projects_with_multiple_open_budgets: Vec<i64>,
}

impl ConsistencyReport {
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.persons_without_open_week.is_empty()
            && self.persons_with_multiple_open_weeks.is_empty()
            && self.projects_with_multiple_open_budgets.is_empty()
    }
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::CorruptRecord(format!("Failed to format timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` if the value is not ISO 8601.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT).map_err(|e| {
        corrupt(DomainError::InvalidTimestamp {
            value: value.to_string(),
            error: e.to_string(),
        })
    })
}

fn corrupt(err: DomainError) -> PersistenceError {
    PersistenceError::CorruptRecord(err.to_string())
}

fn stored_hours(value: f64) -> Result<Hours, PersistenceError> {
    Hours::new(value).map_err(corrupt)
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = projects)]
pub struct ProjectRow {
    pub project_id: i64,
    pub name: String,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            project_id: row.project_id,
            name: row.name,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = persons)]
pub struct PersonRow {
    pub person_id: i64,
    pub display_name: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self {
            person_id: row.person_id,
            display_name: row.display_name,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = roles)]
pub struct RoleRow {
    pub role_id: i64,
    pub name: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: row.role_id,
            name: row.name,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = holidays)]
pub struct HolidayRow {
    pub day_code: i32,
    pub description: String,
}

impl HolidayRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for an invalid day code.
    pub fn into_domain(self) -> Result<Holiday, PersistenceError> {
        Ok(Holiday {
            day: DayCode::new(self.day_code).map_err(corrupt)?,
            description: self.description,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = budgets)]
pub struct BudgetRow {
    pub budget_id: i64,
    pub project_id: i64,
    pub name: String,
    pub status: String,
}

impl BudgetRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for an unknown status.
    pub fn into_domain(self) -> Result<Budget, PersistenceError> {
        Ok(Budget {
            budget_id: self.budget_id,
            project_id: self.project_id,
            name: self.name,
            status: BudgetStatus::from_str(&self.status).map_err(corrupt)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = assignments)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub person_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    pub week_code: i32,
    pub day_code: i32,
    pub hours: f64,
}

impl AssignmentRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for invalid codes or hours.
    pub fn into_domain(self) -> Result<Assignment, PersistenceError> {
        Ok(Assignment {
            assignment_id: self.assignment_id,
            person_id: self.person_id,
            budget_id: self.budget_id,
            role_id: self.role_id,
            week: WeekCode::new(self.week_code).map_err(corrupt)?,
            day: DayCode::new(self.day_code).map_err(corrupt)?,
            hours: stored_hours(self.hours)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = week_controls)]
pub struct WeekControlRow {
    pub week_control_id: i64,
    pub person_id: i64,
    pub week_code: i32,
    pub closed: i32,
    pub close_date: Option<String>,
}

impl WeekControlRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if the week code is invalid or
    /// the closed flag and close date disagree.
    pub fn into_domain(self) -> Result<WeekControl, PersistenceError> {
        let close_date: Option<OffsetDateTime> =
            self.close_date.as_deref().map(parse_timestamp).transpose()?;
        let state: WeekControlState =
            WeekControlState::from_parts(self.week_control_id, self.closed != 0, close_date)
                .map_err(corrupt)?;

        Ok(WeekControl {
            week_control_id: self.week_control_id,
            person_id: self.person_id,
            week: WeekCode::new(self.week_code).map_err(corrupt)?,
            state,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = registries)]
pub struct RegistryRow {
    pub registry_id: i64,
    pub week_control_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    pub hours: f64,
}

impl RegistryRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for invalid hours.
    pub fn into_domain(self) -> Result<Registry, PersistenceError> {
        Ok(Registry {
            registry_id: self.registry_id,
            week_control_id: self.week_control_id,
            budget_id: self.budget_id,
            role_id: self.role_id,
            hours: stored_hours(self.hours)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = registry_logs)]
pub struct RegistryLogRow {
    pub log_id: i64,
    pub registry_id: i64,
    pub week_control_id: i64,
    pub actor_person_id: i64,
    pub actor_name: String,
    pub reason: String,
    pub previous_hours: f64,
    pub new_hours: f64,
    pub logged_at: String,
}

impl RegistryLogRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if any stored column is invalid.
    pub fn into_domain(self) -> Result<RegistryLogEntry, PersistenceError> {
        Ok(RegistryLogEntry {
            log_id: self.log_id,
            change: RegistryChange::new(
                self.registry_id,
                self.week_control_id,
                Actor::new(self.actor_person_id, self.actor_name),
                Justification::new(&self.reason).map_err(corrupt)?,
                stored_hours(self.previous_hours)?,
                stored_hours(self.new_hours)?,
            ),
            logged_at: parse_timestamp(&self.logged_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = early_close_requests)]
pub struct EarlyCloseRequestRow {
    pub request_id: i64,
    pub week_control_id: i64,
    pub message: String,
    pub submitted_at: String,
}

impl EarlyCloseRequestRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` for an invalid timestamp.
    pub fn into_domain(self) -> Result<EarlyCloseRequest, PersistenceError> {
        Ok(EarlyCloseRequest {
            request_id: self.request_id,
            week_control_id: self.week_control_id,
            message: self.message,
            submitted_at: parse_timestamp(&self.submitted_at)?,
        })
    }
}
