// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::{Assignment, DayCode, WeekCode};
use tracing::debug;

use crate::data_models::AssignmentRow;
use crate::diesel_schema::{assignments, week_controls};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an assignment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the assignment is not found.
pub fn get_assignment(
    conn: &mut _,
    assignment_id: i64,
) -> Result<Option<Assignment>, PersistenceError> {
    let row: Option<AssignmentRow> = assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AssignmentRow::into_domain).transpose()
}
}

backend_fn! {
/// Finds the assignment for `(person, budget, role, day)`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_assignment_by_key(
    conn: &mut _,
    person_id: i64,
    budget_id: i64,
    role_id: i64,
    day: DayCode,
) -> Result<Option<Assignment>, PersistenceError> {
    let row: Option<AssignmentRow> = assignments::table
        .filter(assignments::person_id.eq(person_id))
        .filter(assignments::budget_id.eq(budget_id))
        .filter(assignments::role_id.eq(role_id))
        .filter(assignments::day_code.eq(day.value()))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AssignmentRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists the assignments of a person in one week, ordered by day.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_assignments_for_week(
    conn: &mut _,
    person_id: i64,
    week: WeekCode,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::person_id.eq(person_id))
        .filter(assignments::week_code.eq(week.value()))
        .order((assignments::day_code.asc(), assignments::assignment_id.asc()))
        .select(AssignmentRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AssignmentRow::into_domain).collect()
}
}

backend_fn! {
/// Lists the assignments of a budget whose week is not closed.
///
/// A week with no control record yet counts as not closed.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_open_assignments_by_budget(
    conn: &mut _,
    budget_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    debug!(budget_id, "Listing assignments in open weeks");

    let rows: Vec<AssignmentRow> = assignments::table
        .left_join(
            week_controls::table.on(week_controls::person_id
                .eq(assignments::person_id)
                .and(week_controls::week_code.eq(assignments::week_code))),
        )
        .filter(assignments::budget_id.eq(budget_id))
        .filter(
            week_controls::week_control_id
                .nullable()
                .is_null()
                .or(week_controls::closed.eq(0)),
        )
        .order((
            assignments::person_id.asc(),
            assignments::day_code.asc(),
            assignments::assignment_id.asc(),
        ))
        .select(AssignmentRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AssignmentRow::into_domain).collect()
}
}
