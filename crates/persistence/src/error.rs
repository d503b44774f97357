// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hourledger::CoreError;
use hourledger_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A business rule refused the operation; nothing was written.
    Rejected(CoreError),
    /// The requested resource was not found.
    NotFound {
        /// The kind of record, e.g. "Budget" or "Week control".
        resource_type: String,
        message: String,
    },
    /// Budget cannot be deleted because rows still reference it.
    BudgetReferenced {
        budget_id: i64,
        assignments: i64,
        registries: i64,
    },
    /// Week control cannot be deleted because rows still reference it.
    WeekControlReferenced {
        week_control_id: i64,
        registries: i64,
        early_close_requests: i64,
    },
    /// A stored row could not be turned back into a domain value.
    CorruptRecord(String),
}

impl PersistenceError {
    /// A missing record identified by its ID.
    #[must_use]
    pub fn not_found(resource_type: &str, id: i64) -> Self {
        Self::NotFound {
            resource_type: resource_type.to_string(),
            message: format!("{resource_type} {id} not found"),
        }
    }

    /// Returns the business rejection, if this is one.
    #[must_use]
    pub const fn rejection(&self) -> Option<&CoreError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::Rejected(err) => write!(f, "{err}"),
            Self::NotFound { message, .. } => write!(f, "Not found: {message}"),
            Self::BudgetReferenced {
                budget_id,
                assignments,
                registries,
            } => {
                write!(
                    f,
                    "Budget {budget_id} cannot be deleted: still used by {assignments} assignments and {registries} registry entries"
                )
            }
            Self::WeekControlReferenced {
                week_control_id,
                registries,
                early_close_requests,
            } => {
                write!(
                    f,
                    "Week control {week_control_id} cannot be deleted: still used by {registries} registry entries and {early_close_requests} early close requests"
                )
            }
            Self::CorruptRecord(msg) => write!(f, "Corrupt record: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound {
                resource_type: String::from("Record"),
                message: String::from("Record not found"),
            },
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Rejected(CoreError::DomainViolation(err))
    }
}
