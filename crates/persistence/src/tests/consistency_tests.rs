// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::RunQueryDsl;
use diesel::sql_types::BigInt;
use hourledger::ClosePolicy;

use super::{Fixture, after_week, config, entry, setup};
use crate::{BackendConnection, ConsistencyReport};

fn execute_raw(fx: &mut Fixture, sql: &str, id: i64) {
    match &mut fx.persistence.conn {
        BackendConnection::Sqlite(conn) => {
            diesel::sql_query(sql).bind::<BigInt, _>(id).execute(conn).unwrap();
        }
        BackendConnection::Mysql(_) => unreachable!("tests run on SQLite"),
    }
}

#[test]
fn test_fresh_ledger_is_consistent() {
    let mut fx: Fixture = setup();
    let report: ConsistencyReport = fx.persistence.consistency_report().unwrap();
    assert!(report.is_consistent());
}

#[test]
fn test_person_without_open_week_is_reported() {
    let mut fx: Fixture = setup();
    fx.assign_full_week(9.0);
    let key = fx.key();
    let actor = fx.supervisor();
    fx.persistence
        .close_week(
            fx.control.week_control_id,
            &[entry(key, 45.0)],
            &actor,
            ClosePolicy::Regular,
            false,
            &config(),
            after_week(),
        )
        .unwrap();

    let report: ConsistencyReport = fx.persistence.consistency_report().unwrap();

    assert_eq!(report.persons_without_open_week, vec![fx.person_id]);
    assert!(report.persons_with_multiple_open_weeks.is_empty());
    assert!(!report.is_consistent());
}

#[test]
fn test_duplicates_written_behind_the_ledger_are_reported() {
    let mut fx: Fixture = setup();
    let project_id: i64 = fx.project_id;
    let person_id: i64 = fx.person_id;

    execute_raw(
        &mut fx,
        "INSERT INTO budgets (project_id, name, status) VALUES (?, 'Rogue', 'open')",
        project_id,
    );
    execute_raw(
        &mut fx,
        "INSERT INTO week_controls (person_id, week_code, closed) VALUES (?, 202612, 0)",
        person_id,
    );

    let report: ConsistencyReport = fx.persistence.consistency_report().unwrap();

    assert_eq!(report.projects_with_multiple_open_budgets, vec![project_id]);
    assert_eq!(report.persons_with_multiple_open_weeks, vec![person_id]);
    assert!(report.persons_without_open_week.is_empty());
}
