// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry raw integers and strings as a caller would send them;
//! handlers turn them into domain values. Responses are flat and
//! serializable.

use hourledger_audit::RegistryLogEntry;
use hourledger_domain::{
    Assignment, Budget, EarlyCloseRequest, PairBalance, Registry, ValidationResult, WeekControl,
};
use hourledger_persistence::ConsistencyReport;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Budgets
// ============================================================================

/// API request to create a budget under a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBudgetRequest {
    pub project_id: i64,
    pub name: String,
    /// Whether the budget starts open.
    pub open: bool,
}

/// API request to open or close a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBudgetOpenRequest {
    pub budget_id: i64,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInfo {
    pub budget_id: i64,
    pub project_id: i64,
    pub name: String,
    pub open: bool,
}

impl From<Budget> for BudgetInfo {
    fn from(budget: Budget) -> Self {
        Self {
            budget_id: budget.budget_id,
            project_id: budget.project_id,
            name: budget.name,
            open: budget.status.is_open(),
        }
    }
}

/// API response for the project open check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOpenResponse {
    pub project_id: i64,
    pub open: bool,
}

// ============================================================================
// Assignments
// ============================================================================

/// API request to add planned hours for a person on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpsertAssignmentRequest {
    pub person_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    /// ISO week code, `YYYYWW`.
    pub week_code: i32,
    /// Day code, `YYYYMMDD`.
    pub day_code: i32,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub assignment_id: i64,
    pub person_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    pub week_code: i32,
    pub day_code: i32,
    pub hours: f64,
}

impl From<Assignment> for AssignmentInfo {
    fn from(assignment: Assignment) -> Self {
        Self {
            assignment_id: assignment.assignment_id,
            person_id: assignment.person_id,
            budget_id: assignment.budget_id,
            role_id: assignment.role_id,
            week_code: assignment.week.value(),
            day_code: assignment.day.value(),
            hours: assignment.hours.value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    pub assignments: Vec<AssignmentInfo>,
}

// ============================================================================
// Registry
// ============================================================================

/// Hours logged against one budget and role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntryInput {
    pub budget_id: i64,
    pub role_id: i64,
    pub hours: f64,
}

/// API request to create a registry row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreateRegistryRequest {
    pub week_control_id: i64,
    pub entry: RegistryEntryInput,
}

/// API request to change logged hours. The change is logged with the actor
/// and justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRegistryRequest {
    pub registry_id: i64,
    pub hours: f64,
    pub actor_person_id: i64,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub registry_id: i64,
    pub week_control_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    pub hours: f64,
}

impl From<Registry> for RegistryInfo {
    fn from(registry: Registry) -> Self {
        Self {
            registry_id: registry.registry_id,
            week_control_id: registry.week_control_id,
            budget_id: registry.budget_id,
            role_id: registry.role_id,
            hours: registry.hours.value(),
        }
    }
}

/// API response for a control week's logged hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRegistryResponse {
    pub week_control_id: i64,
    pub entries: Vec<RegistryInfo>,
    pub total_hours: f64,
}

/// One entry of a registry row's change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryLogInfo {
    pub log_id: i64,
    pub registry_id: i64,
    pub actor_person_id: i64,
    pub actor_name: String,
    pub justification: String,
    pub previous_hours: f64,
    pub new_hours: f64,
    #[serde(with = "time::serde::iso8601")]
    pub logged_at: OffsetDateTime,
}

impl From<RegistryLogEntry> for RegistryLogInfo {
    fn from(entry: RegistryLogEntry) -> Self {
        Self {
            log_id: entry.log_id,
            registry_id: entry.change.registry_id,
            actor_person_id: entry.change.actor.person_id,
            actor_name: entry.change.actor.name,
            justification: entry.change.justification.as_str().to_string(),
            previous_hours: entry.change.previous_hours.value(),
            new_hours: entry.change.new_hours.value(),
            logged_at: entry.logged_at,
        }
    }
}

/// API response for a cleared or reset week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearRegistryResponse {
    pub week_control_id: i64,
    pub cleared: usize,
}

// ============================================================================
// Week control
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekControlInfo {
    pub week_control_id: i64,
    pub person_id: i64,
    pub week_code: i32,
    pub closed: bool,
    #[serde(with = "time::serde::iso8601::option")]
    pub closed_at: Option<OffsetDateTime>,
}

impl From<WeekControl> for WeekControlInfo {
    fn from(control: WeekControl) -> Self {
        Self {
            week_control_id: control.week_control_id,
            person_id: control.person_id,
            week_code: control.week.value(),
            closed: control.is_closed(),
            closed_at: control.state.closed_at(),
        }
    }
}

/// API request to validate a person's week against submitted entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateWeekRequest {
    pub person_id: i64,
    pub week_code: i32,
    pub entries: Vec<RegistryEntryInput>,
}

/// Expected and logged hours of one budget and role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairBalanceInfo {
    pub budget_id: i64,
    pub role_id: i64,
    pub expected_hours: f64,
    pub executed_hours: Option<f64>,
    pub overflowed: bool,
}

impl From<&PairBalance> for PairBalanceInfo {
    fn from(pair: &PairBalance) -> Self {
        Self {
            budget_id: pair.key.budget_id,
            role_id: pair.key.role_id,
            expected_hours: pair.expected.value(),
            executed_hours: pair.executed.map(hourledger_domain::Hours::value),
            overflowed: pair.is_overflowed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationInfo {
    pub assignation_overflowed: bool,
    pub time_completed: bool,
    pub week_completed: bool,
    pub week_overflowed: bool,
    pub executed_hours: f64,
    pub quota_hours: f64,
    pub pairs: Vec<PairBalanceInfo>,
}

impl From<&ValidationResult> for ValidationInfo {
    fn from(result: &ValidationResult) -> Self {
        Self {
            assignation_overflowed: result.assignation_overflowed,
            time_completed: result.time_completed,
            week_completed: result.week_completed,
            week_overflowed: result.week_overflowed,
            executed_hours: result.executed_total.value(),
            quota_hours: result.quota_total.value(),
            pairs: result.pairs.iter().map(PairBalanceInfo::from).collect(),
        }
    }
}

/// API request to submit a week's entries and close it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseWeekRequest {
    pub week_control_id: i64,
    pub entries: Vec<RegistryEntryInput>,
    /// The person closing the week; recorded on any overwritten registry row.
    pub actor_person_id: i64,
    pub open_next_week: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseWeekResponse {
    pub closed: WeekControlInfo,
    pub validation: ValidationInfo,
    pub next_week: Option<WeekControlInfo>,
}

/// API request for the rollover after `previous_week_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNewWeekRequest {
    pub person_id: i64,
    pub previous_week_code: i32,
}

/// API response for a person's loggable week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableWeekResponse {
    pub person_id: i64,
    /// Monday of the week as a day code, if the person has any week.
    pub start_day_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWeekControlsResponse {
    pub person_id: i64,
    pub weeks: Vec<WeekControlInfo>,
}

// ============================================================================
// Early close
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEarlyCloseRequest {
    pub week_control_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyCloseRequestInfo {
    pub request_id: i64,
    pub week_control_id: i64,
    pub message: String,
    #[serde(with = "time::serde::iso8601")]
    pub submitted_at: OffsetDateTime,
}

impl From<EarlyCloseRequest> for EarlyCloseRequestInfo {
    fn from(request: EarlyCloseRequest) -> Self {
        Self {
            request_id: request.request_id,
            week_control_id: request.week_control_id,
            message: request.message,
            submitted_at: request.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveEarlyCloseRequest {
    pub request_id: i64,
    pub approver_person_id: i64,
    pub open_next_week: bool,
}

/// API response for an approval. `close` is absent when the week had
/// already been closed and the request was only discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveEarlyCloseResponse {
    pub request_id: i64,
    pub week_control_id: i64,
    pub close: Option<CloseWeekResponse>,
}

// ============================================================================
// Consistency
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyResponse {
    pub consistent: bool,
    pub persons_without_open_week: Vec<i64>,
    pub persons_with_multiple_open_weeks: Vec<i64>,
    pub projects_with_multiple_open_budgets: Vec<i64>,
}

impl From<ConsistencyReport> for ConsistencyResponse {
    fn from(report: ConsistencyReport) -> Self {
        Self {
            consistent: report.is_consistent(),
            persons_without_open_week: report.persons_without_open_week,
            persons_with_multiple_open_weeks: report.persons_with_multiple_open_weeks,
            projects_with_multiple_open_budgets: report.projects_with_multiple_open_budgets,
        }
    }
}
