// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::{WeekCode, WeekControl};

use crate::data_models::WeekControlRow;
use crate::diesel_schema::week_controls;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a week control by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the control is not found.
pub fn get_week_control(
    conn: &mut _,
    week_control_id: i64,
) -> Result<Option<WeekControl>, PersistenceError> {
    let row: Option<WeekControlRow> = week_controls::table
        .filter(week_controls::week_control_id.eq(week_control_id))
        .select(WeekControlRow::as_select())
        .first(conn)
        .optional()?;

    row.map(WeekControlRow::into_domain).transpose()
}
}

backend_fn! {
/// Finds the control record of a person for one week.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_week_control(
    conn: &mut _,
    person_id: i64,
    week: WeekCode,
) -> Result<Option<WeekControl>, PersistenceError> {
    let row: Option<WeekControlRow> = week_controls::table
        .filter(week_controls::person_id.eq(person_id))
        .filter(week_controls::week_code.eq(week.value()))
        .select(WeekControlRow::as_select())
        .first(conn)
        .optional()?;

    row.map(WeekControlRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists all control records of a person in week order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_week_controls(
    conn: &mut _,
    person_id: i64,
) -> Result<Vec<WeekControl>, PersistenceError> {
    let rows: Vec<WeekControlRow> = week_controls::table
        .filter(week_controls::person_id.eq(person_id))
        .order(week_controls::week_code.asc())
        .select(WeekControlRow::as_select())
        .load(conn)?;

    rows.into_iter().map(WeekControlRow::into_domain).collect()
}
}

backend_fn! {
/// Lists the open control records of a person in week order.
///
/// More than one entry means the single-open-week invariant is broken.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_open_week_controls(
    conn: &mut _,
    person_id: i64,
) -> Result<Vec<WeekControl>, PersistenceError> {
    let rows: Vec<WeekControlRow> = week_controls::table
        .filter(week_controls::person_id.eq(person_id))
        .filter(week_controls::closed.eq(0))
        .order(week_controls::week_code.asc())
        .select(WeekControlRow::as_select())
        .load(conn)?;

    rows.into_iter().map(WeekControlRow::into_domain).collect()
}
}

backend_fn! {
/// Returns the control record with the highest week code for a person.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn latest_week_control(
    conn: &mut _,
    person_id: i64,
) -> Result<Option<WeekControl>, PersistenceError> {
    let row: Option<WeekControlRow> = week_controls::table
        .filter(week_controls::person_id.eq(person_id))
        .order(week_controls::week_code.desc())
        .select(WeekControlRow::as_select())
        .first(conn)
        .optional()?;

    row.map(WeekControlRow::into_domain).transpose()
}
}
