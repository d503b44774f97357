// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::early_close_requests;
use crate::error::PersistenceError;

backend_fn! {
/// Files an early-close request and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_early_close_request(
    conn: &mut _,
    week_control_id: i64,
    message: &str,
    submitted_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let submitted_at: String = format_timestamp(submitted_at)?;

    diesel::insert_into(early_close_requests::table)
        .values((
            early_close_requests::week_control_id.eq(week_control_id),
            early_close_requests::message.eq(message),
            early_close_requests::submitted_at.eq(&submitted_at),
        ))
        .execute(conn)?;

    let request_id: i64 = conn.get_last_insert_rowid()?;
    info!(request_id, week_control_id, "Early-close request filed");
    Ok(request_id)
}
}

backend_fn! {
/// Removes a request. Returns whether a row was deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_early_close_request(conn: &mut _, request_id: i64) -> Result<bool, PersistenceError> {
    let rows_affected: usize = diesel::delete(early_close_requests::table)
        .filter(early_close_requests::request_id.eq(request_id))
        .execute(conn)?;

    Ok(rows_affected > 0)
}
}
