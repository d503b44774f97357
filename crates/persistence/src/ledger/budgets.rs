// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Budget Ledger: at most one open budget per project.
//!
//! The open check and the write happen under the project lock, so two
//! concurrent opens for the same project cannot both pass the check.

use hourledger::ensure_can_open_budget;
use hourledger_domain::{Budget, BudgetStatus, validate_name};
use tracing::info;

use super::{require_budget, require_project};
use crate::error::PersistenceError;
use crate::store::LedgerStore;

/// Whether the project has an open budget.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the project does not exist.
pub fn is_project_open<C: LedgerStore>(
    conn: &mut C,
    project_id: i64,
) -> Result<bool, PersistenceError> {
    require_project(conn, project_id)?;
    Ok(conn.find_open_budget(project_id)?.is_some())
}

/// Creates a budget, rejecting an open one if the project already has one.
///
/// # Errors
///
/// Returns an error if the name is empty, the project does not exist, or the
/// project already has an open budget.
pub fn create_budget<C: LedgerStore>(
    conn: &mut C,
    project_id: i64,
    name: &str,
    status: BudgetStatus,
) -> Result<Budget, PersistenceError> {
    validate_name(name)?;
    require_project(conn, project_id)?;

    if status.is_open() {
        let current_open: Option<Budget> = conn.find_open_budget(project_id)?;
        ensure_can_open_budget(project_id, None, current_open.as_ref())?;
    }

    let budget_id: i64 = conn.insert_budget(project_id, name, status)?;
    info!(budget_id, project_id, %status, "Budget created");

    Ok(Budget {
        budget_id,
        project_id,
        name: name.to_string(),
        status,
    })
}

/// Flips a budget's status.
///
/// Setting the status it already has is a no-op. Opening re-reads the
/// project's open budget under the lock before writing.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown budget, or a
/// rejection if another budget of the project is open.
pub fn set_budget_status<C: LedgerStore>(
    conn: &mut C,
    budget_id: i64,
    status: BudgetStatus,
) -> Result<Budget, PersistenceError> {
    let budget: Budget = require_budget(conn, budget_id)?;
    if budget.status == status {
        return Ok(budget);
    }

    if status.is_open() {
        let current_open: Option<Budget> = conn.find_open_budget(budget.project_id)?;
        ensure_can_open_budget(budget.project_id, Some(budget_id), current_open.as_ref())?;
    }

    conn.update_budget_status(budget_id, status)?;
    info!(budget_id, project_id = budget.project_id, %status, "Budget status changed");

    Ok(Budget { status, ..budget })
}

/// Deletes a budget nothing refers to.
///
/// # Errors
///
/// Returns `PersistenceError::BudgetReferenced` while assignments or registry
/// rows still use the budget.
pub fn delete_budget<C: LedgerStore>(conn: &mut C, budget_id: i64) -> Result<(), PersistenceError> {
    let budget: Budget = require_budget(conn, budget_id)?;

    let (assignments, registries) = conn.count_budget_references(budget_id)?;
    if assignments > 0 || registries > 0 {
        return Err(PersistenceError::BudgetReferenced {
            budget_id,
            assignments,
            registries,
        });
    }

    conn.delete_budget_row(budget_id)?;
    info!(budget_id, project_id = budget.project_id, "Budget deleted");
    Ok(())
}
