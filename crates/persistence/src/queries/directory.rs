// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Queries for external collaborator rows and the holiday calendar.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::{Person, Project, Role};
use tracing::debug;

use crate::data_models::{Holiday, HolidayRow, PersonRow, ProjectRow, RoleRow};
use crate::diesel_schema::{holidays, persons, projects, roles};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a project by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the project is not found.
pub fn get_project(conn: &mut _, project_id: i64) -> Result<Option<Project>, PersistenceError> {
    debug!(project_id, "Looking up project");

    let row: Option<ProjectRow> = projects::table
        .filter(projects::project_id.eq(project_id))
        .select(ProjectRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Project::from))
}
}

backend_fn! {
/// Retrieves a person by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the person is not found.
pub fn get_person(conn: &mut _, person_id: i64) -> Result<Option<Person>, PersistenceError> {
    debug!(person_id, "Looking up person");

    let row: Option<PersonRow> = persons::table
        .filter(persons::person_id.eq(person_id))
        .select(PersonRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Person::from))
}
}

backend_fn! {
/// Retrieves a role by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the role is not found.
pub fn get_role(conn: &mut _, role_id: i64) -> Result<Option<Role>, PersistenceError> {
    let row: Option<RoleRow> = roles::table
        .filter(roles::role_id.eq(role_id))
        .select(RoleRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Role::from))
}
}

backend_fn! {
/// Lists every declared holiday in day order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored day code is invalid.
pub fn list_holidays(conn: &mut _) -> Result<Vec<Holiday>, PersistenceError> {
    let rows: Vec<HolidayRow> = holidays::table
        .order(holidays::day_code.asc())
        .select(HolidayRow::as_select())
        .load(conn)?;

    rows.into_iter().map(HolidayRow::into_domain).collect()
}
}
