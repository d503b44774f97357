// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::{Budget, BudgetStatus};
use tracing::debug;

use crate::data_models::BudgetRow;
use crate::diesel_schema::{assignments, budgets, registries};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a budget by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the budget is not found.
pub fn get_budget(conn: &mut _, budget_id: i64) -> Result<Option<Budget>, PersistenceError> {
    let row: Option<BudgetRow> = budgets::table
        .filter(budgets::budget_id.eq(budget_id))
        .select(BudgetRow::as_select())
        .first(conn)
        .optional()?;

    row.map(BudgetRow::into_domain).transpose()
}
}

backend_fn! {
/// Returns the open budget of a project, if any.
///
/// Should more than one be open (a broken invariant), the oldest is returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_open_budget(conn: &mut _, project_id: i64) -> Result<Option<Budget>, PersistenceError> {
    debug!(project_id, "Looking up open budget");

    let row: Option<BudgetRow> = budgets::table
        .filter(budgets::project_id.eq(project_id))
        .filter(budgets::status.eq(BudgetStatus::Open.as_str()))
        .order(budgets::budget_id.asc())
        .select(BudgetRow::as_select())
        .first(conn)
        .optional()?;

    row.map(BudgetRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists all budgets of a project in creation order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_budgets_for_project(
    conn: &mut _,
    project_id: i64,
) -> Result<Vec<Budget>, PersistenceError> {
    let rows: Vec<BudgetRow> = budgets::table
        .filter(budgets::project_id.eq(project_id))
        .order(budgets::budget_id.asc())
        .select(BudgetRow::as_select())
        .load(conn)?;

    rows.into_iter().map(BudgetRow::into_domain).collect()
}
}

backend_fn! {
/// Counts the assignment and registry rows referencing a budget.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_budget_references(
    conn: &mut _,
    budget_id: i64,
) -> Result<(i64, i64), PersistenceError> {
    let assignment_count: i64 = assignments::table
        .filter(assignments::budget_id.eq(budget_id))
        .count()
        .get_result(conn)?;

    let registry_count: i64 = registries::table
        .filter(registries::budget_id.eq(budget_id))
        .count()
        .get_result(conn)?;

    Ok((assignment_count, registry_count))
}
}
