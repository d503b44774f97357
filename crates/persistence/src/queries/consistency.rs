// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scans for cross-row invariants the schema cannot express.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use hourledger_domain::BudgetStatus;
use std::collections::BTreeSet;

use crate::data_models::ConsistencyReport;
use crate::diesel_schema::{budgets, week_controls};
use crate::error::PersistenceError;

backend_fn! {
/// Builds a report of persons and projects that violate the
/// single-open-week and single-open-budget rules.
///
/// # Errors
///
/// Returns an error if any query fails.
pub fn consistency_report(conn: &mut _) -> Result<ConsistencyReport, PersistenceError> {
    let tracked_persons: Vec<i64> = week_controls::table
        .select(week_controls::person_id)
        .distinct()
        .order(week_controls::person_id.asc())
        .load(conn)?;

    let open_weeks: Vec<(i64, i64)> = week_controls::table
        .filter(week_controls::closed.eq(0))
        .group_by(week_controls::person_id)
        .select((week_controls::person_id, count_star()))
        .load(conn)?;

    let open_budgets: Vec<(i64, i64)> = budgets::table
        .filter(budgets::status.eq(BudgetStatus::Open.as_str()))
        .group_by(budgets::project_id)
        .select((budgets::project_id, count_star()))
        .load(conn)?;

    let persons_with_open_week: BTreeSet<i64> = open_weeks.iter().map(|(id, _)| *id).collect();

    Ok(ConsistencyReport {
        persons_without_open_week: tracked_persons
            .into_iter()
            .filter(|id| !persons_with_open_week.contains(id))
            .collect(),
        persons_with_multiple_open_weeks: open_weeks
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect(),
        projects_with_multiple_open_budgets: open_budgets
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect(),
    })
}
}
