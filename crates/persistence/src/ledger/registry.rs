// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registry Store: logged hours per control week, budget and role.
//!
//! Every hours update writes its log entry in the same transaction. If the
//! log insert fails the update is rolled back with it.

use hourledger::{ensure_registry_writable, registry_change};
use hourledger_audit::{Actor, Justification, RegistryChange};
use hourledger_domain::{AllocationKey, DomainError, Hours, Registry, WeekControl};
use time::OffsetDateTime;
use tracing::info;

use super::{require_budget, require_registry, require_role, require_week_control};
use crate::error::PersistenceError;
use crate::store::LedgerStore;

/// Creates the registry row for `(control, budget, role)`.
///
/// # Errors
///
/// Returns an error if the control is closed, a referenced row is missing,
/// or a row already exists for the key.
pub fn create_registry<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
    key: AllocationKey,
    hours: Hours,
) -> Result<Registry, PersistenceError> {
    let control: WeekControl = require_week_control(conn, week_control_id)?;
    ensure_registry_writable(&control)?;
    require_budget(conn, key.budget_id)?;
    require_role(conn, key.role_id)?;

    if conn
        .find_registry(week_control_id, key.budget_id, key.role_id)?
        .is_some()
    {
        return Err(DomainError::DuplicateRegistry {
            week_control_id,
            budget_id: key.budget_id,
            role_id: key.role_id,
        }
        .into());
    }

    let registry_id: i64 = conn.insert_registry(week_control_id, key, hours)?;
    Ok(Registry {
        registry_id,
        week_control_id,
        budget_id: key.budget_id,
        role_id: key.role_id,
        hours,
    })
}

/// Changes the hours of a registry row and appends the change to its log.
///
/// # Errors
///
/// Returns an error if the row is missing, its control is closed, or either
/// write fails.
pub fn update_registry<C: LedgerStore>(
    conn: &mut C,
    registry_id: i64,
    hours: Hours,
    actor: Actor,
    justification: Justification,
    now: OffsetDateTime,
) -> Result<Registry, PersistenceError> {
    let registry: Registry = require_registry(conn, registry_id)?;
    let control: WeekControl = require_week_control(conn, registry.week_control_id)?;
    let change: RegistryChange = registry_change(&control, &registry, hours, actor, justification)?;

    conn.update_registry_hours(registry_id, hours)?;
    conn.insert_registry_log(&change, now)?;

    Ok(Registry { hours, ..registry })
}

/// Deletes one registry row of an open control week.
///
/// # Errors
///
/// Returns an error if the row is missing or its control is closed.
pub fn delete_registry<C: LedgerStore>(
    conn: &mut C,
    registry_id: i64,
) -> Result<(), PersistenceError> {
    let registry: Registry = require_registry(conn, registry_id)?;
    let control: WeekControl = require_week_control(conn, registry.week_control_id)?;
    ensure_registry_writable(&control)?;

    conn.delete_registry_row(registry_id)?;
    info!(registry_id, week_control_id = control.week_control_id, "Registry row deleted");
    Ok(())
}

/// Deletes the registry rows of an open control week, optionally narrowed
/// to one budget and one role. Returns the number of rows removed.
///
/// # Errors
///
/// Returns an error if the control is missing or closed.
pub fn clear_registry<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
    budget_id: Option<i64>,
    role_id: Option<i64>,
) -> Result<usize, PersistenceError> {
    let control: WeekControl = require_week_control(conn, week_control_id)?;
    ensure_registry_writable(&control)?;

    let cleared: usize = conn.clear_registry(week_control_id, budget_id, role_id)?;
    info!(week_control_id, ?budget_id, ?role_id, cleared, "Registry cleared");
    Ok(cleared)
}

/// Total hours logged against a control week, zero when none are.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown control.
pub fn sum_hours_for_control<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
) -> Result<Hours, PersistenceError> {
    require_week_control(conn, week_control_id)?;
    let total: f64 = conn.sum_hours_for_control(week_control_id)?;
    Hours::new(total).map_err(|e| PersistenceError::CorruptRecord(e.to_string()))
}
