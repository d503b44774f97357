// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Every lower error maps onto one of five categories. Invariant messages
//! are the lower layer's own text so callers can show them verbatim.

use hourledger::CoreError;
use hourledger_domain::DomainError;
use hourledger_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// A ledger rule refused the operation. Nothing was written.
    #[error("Rule violation ({rule}): {message}")]
    InvariantViolation {
        /// Stable identifier of the rule.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A referenced resource does not exist.
    #[error("{resource_type} not found: {message}")]
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A delete was refused because other rows still use the target.
    #[error("Still in use: {message}")]
    Dependency {
        /// What still refers to the target.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Store failure or corrupted data.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Whether this is a refused invariant.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

fn invariant(rule: &str, message: String) -> ApiError {
    ApiError::InvariantViolation {
        rule: String::from(rule),
        message,
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidHours(_) => invalid("hours", message),
        DomainError::InvalidDayCode(_) | DomainError::DateOutsideWeek { .. } => {
            invalid("day", message)
        }
        DomainError::InvalidWeekCode(_) => invalid("week", message),
        DomainError::DateArithmeticOverflow { .. } => invalid("date", message),
        DomainError::InvalidBudgetStatus(_) => invalid("status", message),
        DomainError::InvalidName(_) => invalid("name", message),
        DomainError::EmptyJustification => invalid("justification", message),
        DomainError::NoWorkingDayFound { .. } => invariant("working_day_exists", message),
        DomainError::ProjectAlreadyHasOpenBudget { .. } => invariant("single_open_budget", message),
        DomainError::WeekClosed { .. } => invariant("closed_week_frozen", message),
        DomainError::WeekAlreadyClosed { .. } => invariant("week_already_closed", message),
        DomainError::PersonAlreadyHasOpenWeek { .. } => invariant("single_open_week", message),
        DomainError::WeekControlAlreadyExists { .. } => invariant("unique_week_control", message),
        DomainError::WeekBeforeLatest { .. } => invariant("forward_week_order", message),
        DomainError::EarlyCloseAlreadyRequested { .. } => {
            invariant("single_early_close_request", message)
        }
        DomainError::DuplicateRegistry { .. } => invariant("unique_registry", message),
        DomainError::InvalidWeekControlState { .. } | DomainError::InvalidTimestamp { .. } => {
            ApiError::Internal { message }
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::CloseRejected { .. } => invariant("close_validation", err.to_string()),
        CoreError::RolloverExhausted { .. } => invariant("working_week_within_horizon", err.to_string()),
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::NotFound {
            resource_type,
            message,
        } => ApiError::NotFound {
            resource_type,
            message,
        },
        PersistenceError::BudgetReferenced { .. }
        | PersistenceError::WeekControlReferenced { .. } => ApiError::Dependency {
            message: err.to_string(),
        },
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled
        | PersistenceError::CorruptRecord(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}
