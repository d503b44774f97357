// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::BudgetStatus;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::budgets;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a budget row and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_budget(
    conn: &mut _,
    project_id: i64,
    name: &str,
    status: BudgetStatus,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(budgets::table)
        .values((
            budgets::project_id.eq(project_id),
            budgets::name.eq(name),
            budgets::status.eq(status.as_str()),
        ))
        .execute(conn)?;

    let budget_id: i64 = conn.get_last_insert_rowid()?;
    debug!(budget_id, project_id, %status, "Inserted budget");
    Ok(budget_id)
}
}

backend_fn! {
/// Sets the status of a budget row.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row matched.
pub fn update_budget_status(
    conn: &mut _,
    budget_id: i64,
    status: BudgetStatus,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(budgets::table)
        .filter(budgets::budget_id.eq(budget_id))
        .set(budgets::status.eq(status.as_str()))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::not_found("Budget", budget_id));
    }
    Ok(())
}
}

backend_fn! {
/// Deletes a budget row.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row matched.
pub fn delete_budget_row(conn: &mut _, budget_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(budgets::table)
        .filter(budgets::budget_id.eq(budget_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::not_found("Budget", budget_id));
    }
    Ok(())
}
}
