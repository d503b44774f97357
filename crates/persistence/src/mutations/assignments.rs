// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::{AllocationKey, DayCode, Hours, WeekCode};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::assignments;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts an assignment row and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate
/// `(person, budget, role, day)` key.
pub fn insert_assignment(
    conn: &mut _,
    person_id: i64,
    key: AllocationKey,
    week: WeekCode,
    day: DayCode,
    hours: Hours,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(assignments::table)
        .values((
            assignments::person_id.eq(person_id),
            assignments::budget_id.eq(key.budget_id),
            assignments::role_id.eq(key.role_id),
            assignments::week_code.eq(week.value()),
            assignments::day_code.eq(day.value()),
            assignments::hours.eq(hours.value()),
        ))
        .execute(conn)?;

    let assignment_id: i64 = conn.get_last_insert_rowid()?;
    debug!(assignment_id, person_id, %key, %day, %hours, "Inserted assignment");
    Ok(assignment_id)
}
}

backend_fn! {
/// Overwrites the hours of an assignment row.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row matched.
pub fn update_assignment_hours(
    conn: &mut _,
    assignment_id: i64,
    hours: Hours,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(assignments::table)
        .filter(assignments::assignment_id.eq(assignment_id))
        .set(assignments::hours.eq(hours.value()))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::not_found("Assignment", assignment_id));
    }
    Ok(())
}
}

backend_fn! {
/// Deletes an assignment row.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row matched.
pub fn delete_assignment_row(conn: &mut _, assignment_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(assignments::table)
        .filter(assignments::assignment_id.eq(assignment_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::not_found("Assignment", assignment_id));
    }
    Ok(())
}
}

backend_fn! {
/// Deletes every assignment of a person in one week. Returns the count.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_assignments_for_week(
    conn: &mut _,
    person_id: i64,
    week: WeekCode,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(assignments::table)
        .filter(assignments::person_id.eq(person_id))
        .filter(assignments::week_code.eq(week.value()))
        .execute(conn)?;

    debug!(person_id, %week, rows_affected, "Deleted week assignments");
    Ok(rows_affected)
}
}
