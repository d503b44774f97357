// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ledger operations composed from store primitives.
//!
//! Every function here is generic over [`LedgerStore`] and assumes it runs
//! inside [`PersistenceBackend::serialized`] for the right [`LockScope`]
//! when it writes. The `scope_of_*` helpers resolve that scope from an id.
//! They read outside the lock, which is sound because the scoping column of
//! a row (a budget's project, a control's person) never changes.
//!
//! [`PersistenceBackend::serialized`]: crate::backend::PersistenceBackend::serialized

pub mod assignments;
pub mod budgets;
pub mod early_close;
pub mod registry;
pub mod weeks;

use hourledger_domain::{
    Assignment, Budget, EarlyCloseRequest, HolidayCalendar, Registry, WeekControl,
};

use crate::backend::LockScope;
use crate::error::PersistenceError;
use crate::store::LedgerStore;

/// Builds the calendar oracle from the stored holidays.
///
/// # Errors
///
/// Returns an error if the holidays cannot be read.
pub fn load_calendar<C: LedgerStore>(conn: &mut C) -> Result<HolidayCalendar, PersistenceError> {
    let holidays = conn.list_holidays()?;
    HolidayCalendar::from_day_codes(holidays.into_iter().map(|holiday| holiday.day))
        .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))
}

pub(crate) fn require_project<C: LedgerStore>(
    conn: &mut C,
    project_id: i64,
) -> Result<(), PersistenceError> {
    conn.get_project(project_id)?
        .map(|_| ())
        .ok_or_else(|| PersistenceError::not_found("Project", project_id))
}

pub(crate) fn require_person<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
) -> Result<(), PersistenceError> {
    conn.get_person(person_id)?
        .map(|_| ())
        .ok_or_else(|| PersistenceError::not_found("Person", person_id))
}

pub(crate) fn require_role<C: LedgerStore>(
    conn: &mut C,
    role_id: i64,
) -> Result<(), PersistenceError> {
    conn.get_role(role_id)?
        .map(|_| ())
        .ok_or_else(|| PersistenceError::not_found("Role", role_id))
}

pub(crate) fn require_budget<C: LedgerStore>(
    conn: &mut C,
    budget_id: i64,
) -> Result<Budget, PersistenceError> {
    conn.get_budget(budget_id)?
        .ok_or_else(|| PersistenceError::not_found("Budget", budget_id))
}

pub(crate) fn require_assignment<C: LedgerStore>(
    conn: &mut C,
    assignment_id: i64,
) -> Result<Assignment, PersistenceError> {
    conn.get_assignment(assignment_id)?.ok_or_else(|| {
        PersistenceError::not_found("Assignment", assignment_id)
    })
}

pub(crate) fn require_registry<C: LedgerStore>(
    conn: &mut C,
    registry_id: i64,
) -> Result<Registry, PersistenceError> {
    conn.get_registry(registry_id)?
        .ok_or_else(|| PersistenceError::not_found("Registry", registry_id))
}

pub(crate) fn require_week_control<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
) -> Result<WeekControl, PersistenceError> {
    conn.get_week_control(week_control_id)?.ok_or_else(|| {
        PersistenceError::not_found("Week control", week_control_id)
    })
}

pub(crate) fn require_early_close_request<C: LedgerStore>(
    conn: &mut C,
    request_id: i64,
) -> Result<EarlyCloseRequest, PersistenceError> {
    conn.get_early_close_request(request_id)?.ok_or_else(|| {
        PersistenceError::not_found("Early close request", request_id)
    })
}

/// # Errors
///
/// Returns `PersistenceError::NotFound` if the budget does not exist.
pub fn scope_of_budget<C: LedgerStore>(
    conn: &mut C,
    budget_id: i64,
) -> Result<LockScope, PersistenceError> {
    Ok(LockScope::Project(require_budget(conn, budget_id)?.project_id))
}

/// # Errors
///
/// Returns `PersistenceError::NotFound` if the assignment does not exist.
pub fn scope_of_assignment<C: LedgerStore>(
    conn: &mut C,
    assignment_id: i64,
) -> Result<LockScope, PersistenceError> {
    Ok(LockScope::Person(
        require_assignment(conn, assignment_id)?.person_id,
    ))
}

/// # Errors
///
/// Returns `PersistenceError::NotFound` if the control does not exist.
pub fn scope_of_week_control<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
) -> Result<LockScope, PersistenceError> {
    Ok(LockScope::Person(
        require_week_control(conn, week_control_id)?.person_id,
    ))
}

/// # Errors
///
/// Returns `PersistenceError::NotFound` if the row or its control does not exist.
pub fn scope_of_registry<C: LedgerStore>(
    conn: &mut C,
    registry_id: i64,
) -> Result<LockScope, PersistenceError> {
    let registry: Registry = require_registry(conn, registry_id)?;
    scope_of_week_control(conn, registry.week_control_id)
}

/// # Errors
///
/// Returns `PersistenceError::NotFound` if the request or its control does
/// not exist.
pub fn scope_of_early_close_request<C: LedgerStore>(
    conn: &mut C,
    request_id: i64,
) -> Result<LockScope, PersistenceError> {
    let request: EarlyCloseRequest = require_early_close_request(conn, request_id)?;
    scope_of_week_control(conn, request.week_control_id)
}
