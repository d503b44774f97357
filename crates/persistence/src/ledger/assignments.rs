// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment Store: planned hours keyed by person, budget, role and day.

use hourledger::{AssignmentDeletePlan, ensure_week_editable, plan_assignment_delete};
use hourledger_domain::{
    AllocationKey, Assignment, DayCode, Hours, WeekCode, WeekControl, validate_day_in_week,
};
use tracing::{debug, info};

use super::{require_assignment, require_budget, require_person, require_role};
use crate::error::PersistenceError;
use crate::store::LedgerStore;

/// Adds `hours` to the assignment for `(person, budget, role, day)`,
/// creating it if absent.
///
/// Repeating the same call accumulates: two calls of 4 hours leave one row
/// of 8 hours.
///
/// # Errors
///
/// Returns an error if `day` is outside `week`, a referenced row is missing,
/// or the person's control record for `week` is closed.
pub fn upsert_assignment<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
    key: AllocationKey,
    week: WeekCode,
    day: DayCode,
    hours: Hours,
) -> Result<Assignment, PersistenceError> {
    validate_day_in_week(day, week)?;
    require_person(conn, person_id)?;
    require_budget(conn, key.budget_id)?;
    require_role(conn, key.role_id)?;

    let control: Option<WeekControl> = conn.find_week_control(person_id, week)?;
    ensure_week_editable(person_id, week, control.as_ref())?;

    match conn.find_assignment_by_key(person_id, key.budget_id, key.role_id, day)? {
        Some(existing) => {
            let total: Hours = existing.hours.checked_add(hours)?;
            conn.update_assignment_hours(existing.assignment_id, total)?;
            debug!(
                assignment_id = existing.assignment_id,
                added = %hours,
                %total,
                "Accumulated assignment hours"
            );
            Ok(Assignment {
                hours: total,
                ..existing
            })
        }
        None => {
            let assignment_id: i64 = conn.insert_assignment(person_id, key, week, day, hours)?;
            Ok(Assignment {
                assignment_id,
                person_id,
                budget_id: key.budget_id,
                role_id: key.role_id,
                week,
                day,
                hours,
            })
        }
    }
}

/// Replaces the hours of an assignment.
///
/// # Errors
///
/// Returns an error if the assignment is missing or its week is closed.
pub fn update_assignment_hours<C: LedgerStore>(
    conn: &mut C,
    assignment_id: i64,
    hours: Hours,
) -> Result<Assignment, PersistenceError> {
    let assignment: Assignment = require_assignment(conn, assignment_id)?;
    let control: Option<WeekControl> =
        conn.find_week_control(assignment.person_id, assignment.week)?;
    ensure_week_editable(assignment.person_id, assignment.week, control.as_ref())?;

    conn.update_assignment_hours(assignment_id, hours)?;
    Ok(Assignment {
        hours,
        ..assignment
    })
}

/// Deletes an assignment.
///
/// With an open control record for its week, the registry row for the same
/// budget and role is cleared first. Both steps share the caller's
/// transaction, so a failed delete restores the cleared row.
///
/// # Errors
///
/// Returns an error if the assignment is missing or its week is closed.
pub fn delete_assignment<C: LedgerStore>(
    conn: &mut C,
    assignment_id: i64,
) -> Result<(), PersistenceError> {
    let assignment: Assignment = require_assignment(conn, assignment_id)?;
    let control: Option<WeekControl> =
        conn.find_week_control(assignment.person_id, assignment.week)?;

    match plan_assignment_delete(&assignment, control.as_ref())? {
        AssignmentDeletePlan::Unconditional => {
            conn.delete_assignment_row(assignment_id)?;
        }
        AssignmentDeletePlan::ClearThenDelete { week_control_id } => {
            let cleared: usize = conn.clear_registry(
                week_control_id,
                Some(assignment.budget_id),
                Some(assignment.role_id),
            )?;
            conn.delete_assignment_row(assignment_id)?;
            debug!(assignment_id, week_control_id, cleared, "Cleared matching registry rows");
        }
    }

    info!(
        assignment_id,
        person_id = assignment.person_id,
        week = %assignment.week,
        "Assignment deleted"
    );
    Ok(())
}

/// Assignments of a budget whose week has no closed control record.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown budget.
pub fn find_open_assignments_by_budget<C: LedgerStore>(
    conn: &mut C,
    budget_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    require_budget(conn, budget_id)?;
    conn.find_open_assignments_by_budget(budget_id)
}
