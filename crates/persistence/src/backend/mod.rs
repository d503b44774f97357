// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates what cannot be expressed in backend-agnostic Diesel
//! DSL: connection setup, migrations, PRAGMA and system-variable checks,
//! last-insert-id retrieval and the per-key write lock.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! ## Serialization
//!
//! Every check-then-act ledger operation runs inside
//! [`PersistenceBackend::serialized`]. The closure sees the same connection,
//! already inside a transaction that holds the write lock for `scope`:
//!
//! - `SQLite` takes the database write lock up front (`BEGIN IMMEDIATE`), so
//!   no other writer can interleave between the check and the write.
//! - `MySQL` opens a transaction and locks the scoping row with
//!   `SELECT ... FOR UPDATE` before the closure runs.
//!
//! Calls must not nest: the adapter is the only caller.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// The key a check-then-act operation serializes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockScope {
    /// Budget open/close state of one project.
    Project(i64),
    /// Weeks, assignments, registry rows and requests of one person.
    Person(i64),
}

/// Trait for backend-specific operations.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection` so ledger
/// operations can be written once, generic over the connection type.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Runs `f` in a transaction holding the write lock for `scope`.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or a database error if the lock or the
    /// transaction fails. A missing scoping row is reported as `NotFound`.
    fn serialized<T, F>(&mut self, scope: LockScope, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn serialized<T, F>(&mut self, scope: LockScope, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>,
    {
        sqlite::serialized(self, scope, f)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn serialized<T, F>(&mut self, scope: LockScope, f: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>,
    {
        mysql::serialized(self, scope, f)
    }
}
