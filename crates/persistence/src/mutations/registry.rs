// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registry rows and their append-only change log.
//!
//! The log table has no foreign key to the registry table so entries survive
//! when the row they describe is cleared. Nothing in this crate updates or
//! deletes log rows.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_audit::RegistryChange;
use hourledger_domain::{AllocationKey, Hours};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::{registries, registry_logs};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a registry row and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate
/// `(week_control, budget, role)` key.
pub fn insert_registry(
    conn: &mut _,
    week_control_id: i64,
    key: AllocationKey,
    hours: Hours,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(registries::table)
        .values((
            registries::week_control_id.eq(week_control_id),
            registries::budget_id.eq(key.budget_id),
            registries::role_id.eq(key.role_id),
            registries::hours.eq(hours.value()),
        ))
        .execute(conn)?;

    let registry_id: i64 = conn.get_last_insert_rowid()?;
    debug!(registry_id, week_control_id, %key, %hours, "Inserted registry row");
    Ok(registry_id)
}
}

backend_fn! {
/// Overwrites the hours of a registry row.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row matched.
pub fn update_registry_hours(
    conn: &mut _,
    registry_id: i64,
    hours: Hours,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(registries::table)
        .filter(registries::registry_id.eq(registry_id))
        .set(registries::hours.eq(hours.value()))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::not_found("Registry", registry_id));
    }
    Ok(())
}
}

backend_fn! {
/// Appends a change log entry and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_registry_log(
    conn: &mut _,
    change: &RegistryChange,
    logged_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let logged_at: String = format_timestamp(logged_at)?;

    diesel::insert_into(registry_logs::table)
        .values((
            registry_logs::registry_id.eq(change.registry_id),
            registry_logs::week_control_id.eq(change.week_control_id),
            registry_logs::actor_person_id.eq(change.actor.person_id),
            registry_logs::actor_name.eq(&change.actor.name),
            registry_logs::reason.eq(change.justification.as_str()),
            registry_logs::previous_hours.eq(change.previous_hours.value()),
            registry_logs::new_hours.eq(change.new_hours.value()),
            registry_logs::logged_at.eq(&logged_at),
        ))
        .execute(conn)?;

    let log_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        log_id,
        registry_id = change.registry_id,
        actor = change.actor.person_id,
        previous = %change.previous_hours,
        new = %change.new_hours,
        "Registry change logged"
    );
    Ok(log_id)
}
}

backend_fn! {
/// Deletes a registry row.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row matched.
pub fn delete_registry_row(conn: &mut _, registry_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(registries::table)
        .filter(registries::registry_id.eq(registry_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::not_found("Registry", registry_id));
    }
    Ok(())
}
}

backend_fn! {
/// Deletes the registry rows of a week control, optionally narrowed to one
/// budget and one role. Returns the number of rows removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn clear_registry(
    conn: &mut _,
    week_control_id: i64,
    budget_id: Option<i64>,
    role_id: Option<i64>,
) -> Result<usize, PersistenceError> {
    let mut matching = registries::table
        .filter(registries::week_control_id.eq(week_control_id))
        .select(registries::registry_id)
        .into_boxed();
    if let Some(budget_id) = budget_id {
        matching = matching.filter(registries::budget_id.eq(budget_id));
    }
    if let Some(role_id) = role_id {
        matching = matching.filter(registries::role_id.eq(role_id));
    }
    let ids: Vec<i64> = matching.load(conn)?;

    if ids.is_empty() {
        return Ok(0);
    }

    let rows_affected: usize = diesel::delete(registries::table)
        .filter(registries::registry_id.eq_any(&ids))
        .execute(conn)?;

    debug!(week_control_id, ?budget_id, ?role_id, rows_affected, "Cleared registry rows");
    Ok(rows_affected)
}
}
