// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::EarlyCloseRequest;

use crate::data_models::EarlyCloseRequestRow;
use crate::diesel_schema::early_close_requests;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an early-close request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the request is not found.
pub fn get_early_close_request(
    conn: &mut _,
    request_id: i64,
) -> Result<Option<EarlyCloseRequest>, PersistenceError> {
    let row: Option<EarlyCloseRequestRow> = early_close_requests::table
        .filter(early_close_requests::request_id.eq(request_id))
        .select(EarlyCloseRequestRow::as_select())
        .first(conn)
        .optional()?;

    row.map(EarlyCloseRequestRow::into_domain).transpose()
}
}

backend_fn! {
/// Finds the pending request filed against a week control.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_early_close_for_control(
    conn: &mut _,
    week_control_id: i64,
) -> Result<Option<EarlyCloseRequest>, PersistenceError> {
    let row: Option<EarlyCloseRequestRow> = early_close_requests::table
        .filter(early_close_requests::week_control_id.eq(week_control_id))
        .order(early_close_requests::request_id.asc())
        .select(EarlyCloseRequestRow::as_select())
        .first(conn)
        .optional()?;

    row.map(EarlyCloseRequestRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists all pending requests, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_early_close_requests(
    conn: &mut _,
) -> Result<Vec<EarlyCloseRequest>, PersistenceError> {
    let rows: Vec<EarlyCloseRequestRow> = early_close_requests::table
        .order(early_close_requests::request_id.asc())
        .select(EarlyCloseRequestRow::as_select())
        .load(conn)?;

    rows.into_iter().map(EarlyCloseRequestRow::into_domain).collect()
}
}

backend_fn! {
/// Counts the requests filed against a week control.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_early_close_requests(
    conn: &mut _,
    week_control_id: i64,
) -> Result<i64, PersistenceError> {
    let count: i64 = early_close_requests::table
        .filter(early_close_requests::week_control_id.eq(week_control_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}
}
