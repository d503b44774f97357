// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seeding of external collaborator rows and holidays.
//!
//! Projects, persons and roles are owned by other systems. These inserts
//! exist so the ledger can be populated for tests and the CLI.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::DayCode;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{holidays, persons, projects, roles};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a project and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_project(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(projects::table)
        .values(projects::name.eq(name))
        .execute(conn)?;

    let project_id: i64 = conn.get_last_insert_rowid()?;
    info!(project_id, name, "Project created");
    Ok(project_id)
}
}

backend_fn! {
/// Inserts a person and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_person(conn: &mut _, display_name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(persons::table)
        .values(persons::display_name.eq(display_name))
        .execute(conn)?;

    let person_id: i64 = conn.get_last_insert_rowid()?;
    info!(person_id, display_name, "Person created");
    Ok(person_id)
}
}

backend_fn! {
/// Inserts a role and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_role(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(roles::table)
        .values(roles::name.eq(name))
        .execute(conn)?;

    let role_id: i64 = conn.get_last_insert_rowid()?;
    info!(role_id, name, "Role created");
    Ok(role_id)
}
}

backend_fn! {
/// Declares a holiday.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the day is already
/// declared.
pub fn insert_holiday(conn: &mut _, day: DayCode, description: &str) -> Result<(), PersistenceError> {
    diesel::insert_into(holidays::table)
        .values((
            holidays::day_code.eq(day.value()),
            holidays::description.eq(description),
        ))
        .execute(conn)?;

    info!(%day, description, "Holiday declared");
    Ok(())
}
}

backend_fn! {
/// Removes a declared holiday. Returns whether a row was deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_holiday(conn: &mut _, day: DayCode) -> Result<bool, PersistenceError> {
    let rows_affected: usize = diesel::delete(holidays::table)
        .filter(holidays::day_code.eq(day.value()))
        .execute(conn)?;

    Ok(rows_affected > 0)
}
}
