// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the hour ledger.
//!
//! Callers (the CLI, an HTTP layer) talk to the ledger through the handler
//! functions here. Requests are plain serde types; every failure is an
//! [`ApiError`] in one of five categories.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    add_holiday, approve_early_close, clear_registry, close_week, consistency_check,
    create_budget, create_new_week, create_person, create_project, create_registry, create_role,
    delete_assignment, delete_budget, delete_registry, delete_week_control,
    find_open_assignments_by_budget, find_open_week, get_available_week_start, get_week_registry,
    is_early_close_taken, is_project_open, list_assignments_for_week, list_budgets,
    list_holidays, list_pending_early_close_requests, list_registry_logs, list_week_controls,
    open_first_week, reject_early_close, remove_holiday, request_early_close, reset_week,
    set_budget_open, update_assignment_hours, update_registry, upsert_assignment, validate_week,
};
pub use request_response::{
    ApproveEarlyCloseRequest, ApproveEarlyCloseResponse, AssignmentInfo, AvailableWeekResponse,
    BudgetInfo, ClearRegistryResponse, CloseWeekRequest, CloseWeekResponse, ConsistencyResponse,
    CreateBudgetRequest, CreateNewWeekRequest, CreateRegistryRequest, EarlyCloseRequestInfo,
    ListAssignmentsResponse, ListWeekControlsResponse, PairBalanceInfo, ProjectOpenResponse,
    RegistryEntryInput, RegistryInfo, RegistryLogInfo, RequestEarlyCloseRequest,
    SetBudgetOpenRequest, UpdateRegistryRequest, UpsertAssignmentRequest, ValidateWeekRequest,
    ValidationInfo, WeekControlInfo, WeekRegistryResponse,
};

/// Convenience alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;
