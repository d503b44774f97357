// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::WeekCode;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::week_controls;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a week control row and returns its ID.
///
/// `closed_at` of `None` inserts an open week.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate
/// `(person, week)` key.
pub fn insert_week_control(
    conn: &mut _,
    person_id: i64,
    week: WeekCode,
    closed_at: Option<OffsetDateTime>,
) -> Result<i64, PersistenceError> {
    let close_date: Option<String> = closed_at.map(format_timestamp).transpose()?;

    diesel::insert_into(week_controls::table)
        .values((
            week_controls::person_id.eq(person_id),
            week_controls::week_code.eq(week.value()),
            week_controls::closed.eq(i32::from(close_date.is_some())),
            week_controls::close_date.eq(close_date.as_deref()),
        ))
        .execute(conn)?;

    let week_control_id: i64 = conn.get_last_insert_rowid()?;
    debug!(week_control_id, person_id, %week, closed = closed_at.is_some(), "Inserted week control");
    Ok(week_control_id)
}
}

backend_fn! {
/// Marks an open week control as closed.
///
/// The update only matches an open row, so a concurrent close cannot
/// overwrite the first close date.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no open row matched.
pub fn close_week_control(
    conn: &mut _,
    week_control_id: i64,
    closed_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let close_date: String = format_timestamp(closed_at)?;

    let rows_affected: usize = diesel::update(week_controls::table)
        .filter(week_controls::week_control_id.eq(week_control_id))
        .filter(week_controls::closed.eq(0))
        .set((
            week_controls::closed.eq(1),
            week_controls::close_date.eq(Some(close_date)),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound {
            resource_type: String::from("Week control"),
            message: format!("Open week control {week_control_id} not found"),
        });
    }
    Ok(())
}
}

backend_fn! {
/// Deletes a week control row.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row matched.
pub fn delete_week_control_row(conn: &mut _, week_control_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(week_controls::table)
        .filter(week_controls::week_control_id.eq(week_control_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::not_found("Week control", week_control_id));
    }
    Ok(())
}
}
