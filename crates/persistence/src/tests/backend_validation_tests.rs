// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for `MariaDB`/`MySQL`.
//!
//! These tests are marked `#[ignore]` and only run via
//! `cargo xtask test-mariadb`, which provisions the database and sets:
//!
//! - `DATABASE_URL`
//! - `HOURLEDGER_TEST_BACKEND=mariadb`
//!
//! They check schema compatibility (constraints and row locking) rather
//! than ledger rules, which the `SQLite` suite covers. The database is
//! shared between tests, so every test creates its own rows and never
//! assumes empty tables.

use diesel::MysqlConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use std::env;

use hourledger::ClosePolicy;
use hourledger_domain::{AllocationKey, Budget, BudgetStatus, WeekCode, WeekControl};

use super::{after_week, config, entry, hours};
use crate::backend::mysql;
use crate::{Persistence, PersistenceError};

/// Result type for `LAST_INSERT_ID` queries.
#[derive(QueryableByName)]
struct LastInsertIdResult {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// # Panics
///
/// Panics if `HOURLEDGER_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("HOURLEDGER_TEST_BACKEND").expect(
        "HOURLEDGER_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "HOURLEDGER_TEST_BACKEND must be 'mariadb'");
}

fn insert_person(conn: &mut MysqlConnection, name: &str) -> i64 {
    diesel::sql_query("INSERT INTO persons (display_name) VALUES (?)")
        .bind::<diesel::sql_types::Text, _>(name)
        .execute(conn)
        .expect("Failed to insert person");
    diesel::sql_query("SELECT LAST_INSERT_ID() as id")
        .get_result::<LastInsertIdResult>(conn)
        .expect("Failed to read last insert id")
        .id
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(result.is_ok(), "Migrations failed: {:?}", result.err());

    let mut conn = result.unwrap();
    assert!(mysql::verify_foreign_key_enforcement(&mut conn).is_ok());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_week_control_unique_per_person_and_week() {
    verify_mariadb_test_environment();
    let mut conn = mysql::initialize_database(&get_mariadb_url()).unwrap();
    let person_id: i64 = insert_person(&mut conn, "Unique Week Person");

    let insert = "INSERT INTO week_controls (person_id, week_code, closed) VALUES (?, 202611, 0)";
    diesel::sql_query(insert)
        .bind::<BigInt, _>(person_id)
        .execute(&mut conn)
        .unwrap();
    let duplicate = diesel::sql_query(insert)
        .bind::<BigInt, _>(person_id)
        .execute(&mut conn);

    assert!(duplicate.is_err(), "Duplicate week control was accepted");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_registry_requires_existing_week_control() {
    verify_mariadb_test_environment();
    let mut conn = mysql::initialize_database(&get_mariadb_url()).unwrap();

    let result = diesel::sql_query(
        "INSERT INTO registries (week_control_id, budget_id, role_id, hours) VALUES (-1, -1, -1, 1.0)",
    )
    .execute(&mut conn);

    assert!(result.is_err(), "Foreign keys are not enforced");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_close_and_rollover() {
    verify_mariadb_test_environment();
    let mut persistence = Persistence::new_with_mysql(&get_mariadb_url()).unwrap();

    let project_id: i64 = persistence.create_project("MariaDB Project").unwrap();
    let budget: Budget = persistence
        .create_budget(project_id, "Main", BudgetStatus::Open)
        .unwrap();
    let role_id: i64 = persistence.create_role("MariaDB Role").unwrap();
    let person_id: i64 = persistence.create_person("MariaDB Person").unwrap();
    let week: WeekCode = WeekCode::new(202_611).unwrap();
    let control: WeekControl = persistence.open_first_week(person_id, week).unwrap();
    let key: AllocationKey = AllocationKey::new(budget.budget_id, role_id);

    for day in 20_260_309..=20_260_313 {
        persistence
            .upsert_assignment(
                person_id,
                key,
                week,
                hourledger_domain::DayCode::new(day).unwrap(),
                hours(9.0),
            )
            .unwrap();
    }

    let actor = hourledger_audit::Actor::new(person_id, String::from("MariaDB Person"));
    let outcome = persistence
        .close_week(
            control.week_control_id,
            &[entry(key, 45.0)],
            &actor,
            ClosePolicy::Regular,
            true,
            &config(),
            after_week(),
        )
        .unwrap();

    assert!(outcome.closed.is_closed());
    let open = persistence.find_open_week(person_id).unwrap().unwrap();
    assert_ne!(open.week_control_id, control.week_control_id);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_second_open_budget_rejected_under_lock() {
    verify_mariadb_test_environment();
    let mut persistence = Persistence::new_with_mysql(&get_mariadb_url()).unwrap();

    let project_id: i64 = persistence.create_project("Locked Project").unwrap();
    persistence
        .create_budget(project_id, "First", BudgetStatus::Open)
        .unwrap();
    let second = persistence.create_budget(project_id, "Second", BudgetStatus::Open);

    assert!(matches!(second, Err(PersistenceError::Rejected(_))));
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_lock_on_missing_person_is_not_found() {
    verify_mariadb_test_environment();
    let mut persistence = Persistence::new_with_mysql(&get_mariadb_url()).unwrap();

    let result = persistence.open_first_week(-1, WeekCode::new(202_611).unwrap());

    assert_eq!(result, Err(PersistenceError::not_found("Person", -1)));
}
