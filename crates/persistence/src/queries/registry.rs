// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_audit::RegistryLogEntry;
use hourledger_domain::Registry;

use crate::data_models::{RegistryLogRow, RegistryRow};
use crate::diesel_schema::{registries, registry_logs};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a registry row by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the row is not found.
pub fn get_registry(conn: &mut _, registry_id: i64) -> Result<Option<Registry>, PersistenceError> {
    let row: Option<RegistryRow> = registries::table
        .filter(registries::registry_id.eq(registry_id))
        .select(RegistryRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RegistryRow::into_domain).transpose()
}
}

backend_fn! {
/// Finds the registry row for `(week_control, budget, role)`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_registry(
    conn: &mut _,
    week_control_id: i64,
    budget_id: i64,
    role_id: i64,
) -> Result<Option<Registry>, PersistenceError> {
    let row: Option<RegistryRow> = registries::table
        .filter(registries::week_control_id.eq(week_control_id))
        .filter(registries::budget_id.eq(budget_id))
        .filter(registries::role_id.eq(role_id))
        .select(RegistryRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RegistryRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists the registry rows of a week control.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_registry_for_control(
    conn: &mut _,
    week_control_id: i64,
) -> Result<Vec<Registry>, PersistenceError> {
    let rows: Vec<RegistryRow> = registries::table
        .filter(registries::week_control_id.eq(week_control_id))
        .order((registries::budget_id.asc(), registries::role_id.asc()))
        .select(RegistryRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RegistryRow::into_domain).collect()
}
}

backend_fn! {
/// Sums the hours registered against a week control.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn sum_hours_for_control(conn: &mut _, week_control_id: i64) -> Result<f64, PersistenceError> {
    let total: Option<f64> = registries::table
        .filter(registries::week_control_id.eq(week_control_id))
        .select(diesel::dsl::sum(registries::hours))
        .first(conn)?;

    Ok(total.unwrap_or(0.0))
}
}

backend_fn! {
/// Lists the change log of a registry row, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_registry_logs(
    conn: &mut _,
    registry_id: i64,
) -> Result<Vec<RegistryLogEntry>, PersistenceError> {
    let rows: Vec<RegistryLogRow> = registry_logs::table
        .filter(registry_logs::registry_id.eq(registry_id))
        .order(registry_logs::log_id.asc())
        .select(RegistryLogRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RegistryLogRow::into_domain).collect()
}
}

backend_fn! {
/// Lists every change log entry written against a week control.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_registry_logs_for_control(
    conn: &mut _,
    week_control_id: i64,
) -> Result<Vec<RegistryLogEntry>, PersistenceError> {
    let rows: Vec<RegistryLogRow> = registry_logs::table
        .filter(registry_logs::week_control_id.eq(week_control_id))
        .order(registry_logs::log_id.asc())
        .select(RegistryLogRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RegistryLogRow::into_domain).collect()
}
}
