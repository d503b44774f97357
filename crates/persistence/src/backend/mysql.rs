// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific persistence utilities.
//!
//! ## Usage
//!
//! `SQLite` is the default backend. `MySQL` is validated by tests marked
//! `#[ignore]`, executed only via `cargo xtask test-mariadb`, which:
//!
//! 1. Starts a `MariaDB` container via Docker
//! 2. Sets `DATABASE_URL` and `HOURLEDGER_TEST_BACKEND=mariadb`
//! 3. Runs the ignored tests explicitly
//! 4. Stops and removes the container
//!
//! ## Compilation Requirements
//!
//! `MySQL` support is compiled by default (no feature flags) and requires the
//! `MySQL` client development libraries and `pkg-config`.
//!
//! ## Schema Parity
//!
//! `migrations_mysql/` must stay schema-equivalent to `migrations/`: same
//! tables, columns, constraints, foreign keys and indexes. Verify with:
//!
//! ```bash
//! cargo xtask verify-migrations
//! ```
//!
//! ## Locking
//!
//! InnoDB row locks serialize ledger operations per key. The scoping row
//! (project or person) is locked with `SELECT ... FOR UPDATE` as the first
//! statement of the transaction and held until commit or rollback.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use super::LockScope;
use crate::diesel_schema::{persons, projects};
use crate::error::PersistenceError;

/// Result type for foreign key check query.
#[derive(QueryableByName)]
struct ForeignKeyCheck {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Helper function to get the last inserted row ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// `MySQL`-specific migrations.
///
/// Functionally equivalent to the `SQLite` migrations but using `MySQL`
/// syntax (`AUTO_INCREMENT`, `BIGINT`, `VARCHAR`, `DOUBLE`, `InnoDB`).
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Initialize a `MySQL` database at the given URL and run migrations.
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Initializing MySQL database");

    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Run pending migrations on the provided `MySQL` connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)?;
    Ok(())
}

/// Verify that foreign key enforcement is enabled on `MySQL`.
///
/// # Errors
///
/// Returns an error if verification fails.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    // NOTE: This is raw SQL (justified - Diesel has no system variable query DSL)
    let result: Result<ForeignKeyCheck, _> =
        diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks").get_result(conn);

    match result {
        Ok(check) => {
            if check.fk_checks == 1 {
                info!("MySQL foreign key enforcement is enabled");
                Ok(())
            } else {
                Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
            }
        }
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to verify foreign key enforcement: {e}"
        ))),
    }
}

/// Locks the row identifying `scope` until the current transaction ends.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the scoping row does not exist.
fn lock_scope(conn: &mut MysqlConnection, scope: LockScope) -> Result<(), PersistenceError> {
    let locked: Option<i64> = match scope {
        LockScope::Project(project_id) => projects::table
            .filter(projects::project_id.eq(project_id))
            .select(projects::project_id)
            .for_update()
            .first::<i64>(conn)
            .optional()?,
        LockScope::Person(person_id) => persons::table
            .filter(persons::person_id.eq(person_id))
            .select(persons::person_id)
            .for_update()
            .first::<i64>(conn)
            .optional()?,
    };

    match locked {
        Some(_) => Ok(()),
        None => Err(match scope {
            LockScope::Project(id) => PersistenceError::not_found("Project", id),
            LockScope::Person(id) => PersistenceError::not_found("Person", id),
        }),
    }
}

/// Runs `f` inside a transaction that first locks the row for `scope`.
///
/// # Errors
///
/// Returns the closure's error, a lock failure, or a database error.
pub fn serialized<T, F>(
    conn: &mut MysqlConnection,
    scope: LockScope,
    f: F,
) -> Result<T, PersistenceError>
where
    F: FnOnce(&mut MysqlConnection) -> Result<T, PersistenceError>,
{
    debug!(?scope, "Acquiring MySQL row lock");
    conn.transaction(|conn| {
        lock_scope(conn, scope)?;
        f(conn)
    })
}
