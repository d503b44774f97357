// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers turn raw request values into domain values, call the
//! persistence adapter and translate every error into an [`ApiError`].
//! Operations that depend on the current instant take it as `now` so the
//! caller decides the clock.

use hourledger::{ClosePolicy, EngineConfig};
use hourledger_audit::{Actor, Justification};
use hourledger_domain::{
    AllocationKey, BudgetStatus, DayCode, Hours, PendingEntry, Person, WeekCode,
};
use hourledger_persistence::{ApprovalOutcome, CloseOutcome, Holiday, Persistence};
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::request_response::{
    ApproveEarlyCloseRequest, ApproveEarlyCloseResponse, AssignmentInfo, AvailableWeekResponse,
    BudgetInfo, ClearRegistryResponse, CloseWeekRequest, CloseWeekResponse, ConsistencyResponse,
    CreateBudgetRequest, CreateNewWeekRequest, CreateRegistryRequest, EarlyCloseRequestInfo,
    ListAssignmentsResponse, ListWeekControlsResponse, ProjectOpenResponse, RegistryEntryInput,
    RegistryInfo, RegistryLogInfo, RequestEarlyCloseRequest, SetBudgetOpenRequest,
    UpdateRegistryRequest, UpsertAssignmentRequest, ValidateWeekRequest, ValidationInfo,
    WeekControlInfo, WeekRegistryResponse,
};

// ============================================================================
// Input conversion
// ============================================================================

fn parse_week(code: i32) -> Result<WeekCode, ApiError> {
    Ok(WeekCode::new(code)?)
}

fn parse_day(code: i32) -> Result<DayCode, ApiError> {
    Ok(DayCode::new(code)?)
}

fn parse_hours(value: f64) -> Result<Hours, ApiError> {
    Ok(Hours::new(value)?)
}

fn to_pending_entries(entries: &[RegistryEntryInput]) -> Result<Vec<PendingEntry>, ApiError> {
    entries
        .iter()
        .map(|e| Ok(PendingEntry::new(e.budget_id, e.role_id, parse_hours(e.hours)?)))
        .collect()
}

/// Builds the audit actor for a person, who must exist.
fn resolve_actor(persistence: &mut Persistence, person_id: i64) -> Result<Actor, ApiError> {
    let person: Person = persistence
        .get_person(person_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Person"),
            message: format!("Person {person_id} does not exist"),
        })?;
    Ok(Actor::new(person.person_id, person.display_name))
}

fn close_response(outcome: CloseOutcome) -> CloseWeekResponse {
    CloseWeekResponse {
        closed: WeekControlInfo::from(outcome.closed),
        validation: ValidationInfo::from(&outcome.validation),
        next_week: outcome.next_week.map(WeekControlInfo::from),
    }
}

// ============================================================================
// Directory & Calendar
// ============================================================================

/// Creates a project and returns its ID.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank name.
pub fn create_project(persistence: &mut Persistence, name: &str) -> Result<i64, ApiError> {
    Ok(persistence.create_project(name)?)
}

/// Creates a person and returns its ID.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank name.
pub fn create_person(persistence: &mut Persistence, display_name: &str) -> Result<i64, ApiError> {
    Ok(persistence.create_person(display_name)?)
}

/// Creates a role and returns its ID.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank name.
pub fn create_role(persistence: &mut Persistence, name: &str) -> Result<i64, ApiError> {
    Ok(persistence.create_role(name)?)
}

/// Declares a holiday.
///
/// # Errors
///
/// Returns an error for an invalid day code or an already declared day.
pub fn add_holiday(
    persistence: &mut Persistence,
    day_code: i32,
    description: &str,
) -> Result<(), ApiError> {
    let day: DayCode = parse_day(day_code)?;
    persistence.add_holiday(day, description)?;
    info!(%day, description, "Holiday declared");
    Ok(())
}

/// Withdraws a holiday. Returns whether one was declared for that day.
///
/// # Errors
///
/// Returns an error for an invalid day code or a store failure.
pub fn remove_holiday(persistence: &mut Persistence, day_code: i32) -> Result<bool, ApiError> {
    let day: DayCode = parse_day(day_code)?;
    let removed: bool = persistence.remove_holiday(day)?;
    info!(%day, removed, "Holiday withdrawn");
    Ok(removed)
}

/// # Errors
///
/// Returns an error if the holidays cannot be read.
pub fn list_holidays(persistence: &mut Persistence) -> Result<Vec<Holiday>, ApiError> {
    Ok(persistence.list_holidays()?)
}

// ============================================================================
// Budget Ledger
// ============================================================================

/// Creates a budget.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the budget is to start open and
/// the project already has an open budget.
pub fn create_budget(
    persistence: &mut Persistence,
    request: &CreateBudgetRequest,
) -> Result<BudgetInfo, ApiError> {
    let status: BudgetStatus = BudgetStatus::from_open_flag(request.open);
    let budget = persistence.create_budget(request.project_id, &request.name, status)?;
    Ok(BudgetInfo::from(budget))
}

/// Opens or closes a budget.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` when opening while another budget
/// of the project is open, or `ApiError::NotFound` for an unknown budget.
pub fn set_budget_open(
    persistence: &mut Persistence,
    request: &SetBudgetOpenRequest,
) -> Result<BudgetInfo, ApiError> {
    let status: BudgetStatus = BudgetStatus::from_open_flag(request.open);
    let budget = persistence.set_budget_status(request.budget_id, status)?;
    Ok(BudgetInfo::from(budget))
}

/// Whether the project currently has an open budget.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown project.
pub fn is_project_open(
    persistence: &mut Persistence,
    project_id: i64,
) -> Result<ProjectOpenResponse, ApiError> {
    let open: bool = persistence.is_project_open(project_id)?;
    Ok(ProjectOpenResponse { project_id, open })
}

/// # Errors
///
/// Returns an error if the budgets cannot be read.
pub fn list_budgets(
    persistence: &mut Persistence,
    project_id: i64,
) -> Result<Vec<BudgetInfo>, ApiError> {
    Ok(persistence
        .list_budgets_for_project(project_id)?
        .into_iter()
        .map(BudgetInfo::from)
        .collect())
}

/// # Errors
///
/// Returns `ApiError::Dependency` while assignments or registry rows use the
/// budget.
pub fn delete_budget(persistence: &mut Persistence, budget_id: i64) -> Result<(), ApiError> {
    Ok(persistence.delete_budget(budget_id)?)
}

// ============================================================================
// Assignment Store
// ============================================================================

/// Adds planned hours. Repeated calls for the same day accumulate.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for malformed codes or hours, or
/// `ApiError::InvariantViolation` if the week is closed.
pub fn upsert_assignment(
    persistence: &mut Persistence,
    request: &UpsertAssignmentRequest,
) -> Result<AssignmentInfo, ApiError> {
    let week: WeekCode = parse_week(request.week_code)?;
    let day: DayCode = parse_day(request.day_code)?;
    let hours: Hours = parse_hours(request.hours)?;
    let key: AllocationKey = AllocationKey::new(request.budget_id, request.role_id);

    let assignment = persistence.upsert_assignment(request.person_id, key, week, day, hours)?;
    debug!(
        assignment_id = assignment.assignment_id,
        person_id = request.person_id,
        %week,
        %day,
        "Assignment upserted"
    );
    Ok(AssignmentInfo::from(assignment))
}

/// Replaces the planned hours of an assignment.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the week is closed.
pub fn update_assignment_hours(
    persistence: &mut Persistence,
    assignment_id: i64,
    hours: f64,
) -> Result<AssignmentInfo, ApiError> {
    let hours: Hours = parse_hours(hours)?;
    Ok(AssignmentInfo::from(
        persistence.update_assignment_hours(assignment_id, hours)?,
    ))
}

/// Deletes an assignment and clears its matching registry row.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the week is closed.
pub fn delete_assignment(persistence: &mut Persistence, assignment_id: i64) -> Result<(), ApiError> {
    Ok(persistence.delete_assignment(assignment_id)?)
}

/// # Errors
///
/// Returns `ApiError::InvalidInput` for a malformed week code.
pub fn list_assignments_for_week(
    persistence: &mut Persistence,
    person_id: i64,
    week_code: i32,
) -> Result<ListAssignmentsResponse, ApiError> {
    let week: WeekCode = parse_week(week_code)?;
    let assignments = persistence.list_assignments_for_week(person_id, week)?;
    Ok(ListAssignmentsResponse {
        assignments: assignments.into_iter().map(AssignmentInfo::from).collect(),
    })
}

/// Assignments of a budget not covered by a closed week.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown budget.
pub fn find_open_assignments_by_budget(
    persistence: &mut Persistence,
    budget_id: i64,
) -> Result<ListAssignmentsResponse, ApiError> {
    let assignments = persistence.find_open_assignments_by_budget(budget_id)?;
    Ok(ListAssignmentsResponse {
        assignments: assignments.into_iter().map(AssignmentInfo::from).collect(),
    })
}

// ============================================================================
// Registry Store
// ============================================================================

/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the week is closed or the key
/// already has a row.
pub fn create_registry(
    persistence: &mut Persistence,
    request: &CreateRegistryRequest,
) -> Result<RegistryInfo, ApiError> {
    let hours: Hours = parse_hours(request.entry.hours)?;
    let key: AllocationKey = AllocationKey::new(request.entry.budget_id, request.entry.role_id);
    Ok(RegistryInfo::from(
        persistence.create_registry(request.week_control_id, key, hours)?,
    ))
}

/// Changes logged hours; the change log entry is written with it.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for a blank justification,
/// `ApiError::NotFound` for an unknown actor, or
/// `ApiError::InvariantViolation` if the week is closed.
pub fn update_registry(
    persistence: &mut Persistence,
    request: &UpdateRegistryRequest,
    now: OffsetDateTime,
) -> Result<RegistryInfo, ApiError> {
    let hours: Hours = parse_hours(request.hours)?;
    let justification: Justification = Justification::new(&request.justification)?;
    let actor: Actor = resolve_actor(persistence, request.actor_person_id)?;

    let registry =
        persistence.update_registry(request.registry_id, hours, actor, justification, now)?;
    info!(
        registry_id = registry.registry_id,
        actor = request.actor_person_id,
        hours = %hours,
        "Registry hours updated"
    );
    Ok(RegistryInfo::from(registry))
}

/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the week is closed.
pub fn delete_registry(persistence: &mut Persistence, registry_id: i64) -> Result<(), ApiError> {
    Ok(persistence.delete_registry(registry_id)?)
}

/// Registry rows of a control week and their total.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown control.
pub fn get_week_registry(
    persistence: &mut Persistence,
    week_control_id: i64,
) -> Result<WeekRegistryResponse, ApiError> {
    let total: Hours = persistence.sum_hours_for_control(week_control_id)?;
    let entries = persistence.list_registry_for_control(week_control_id)?;
    Ok(WeekRegistryResponse {
        week_control_id,
        entries: entries.into_iter().map(RegistryInfo::from).collect(),
        total_hours: total.value(),
    })
}

/// # Errors
///
/// Returns an error if the log cannot be read.
pub fn list_registry_logs(
    persistence: &mut Persistence,
    registry_id: i64,
) -> Result<Vec<RegistryLogInfo>, ApiError> {
    Ok(persistence
        .list_registry_logs(registry_id)?
        .into_iter()
        .map(RegistryLogInfo::from)
        .collect())
}

/// Clears registry rows of an open week, optionally narrowed.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the week is closed.
pub fn clear_registry(
    persistence: &mut Persistence,
    week_control_id: i64,
    budget_id: Option<i64>,
    role_id: Option<i64>,
) -> Result<ClearRegistryResponse, ApiError> {
    let cleared: usize = persistence.clear_registry(week_control_id, budget_id, role_id)?;
    Ok(ClearRegistryResponse {
        week_control_id,
        cleared,
    })
}

/// Clears every registry row of an open week.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the week is closed.
pub fn reset_week(
    persistence: &mut Persistence,
    week_control_id: i64,
) -> Result<ClearRegistryResponse, ApiError> {
    let cleared: usize = persistence.reset_week(week_control_id)?;
    info!(week_control_id, cleared, "Week reset");
    Ok(ClearRegistryResponse {
        week_control_id,
        cleared,
    })
}

// ============================================================================
// Week Control
// ============================================================================

/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the person already has an open
/// week.
pub fn open_first_week(
    persistence: &mut Persistence,
    person_id: i64,
    week_code: i32,
) -> Result<WeekControlInfo, ApiError> {
    let week: WeekCode = parse_week(week_code)?;
    Ok(WeekControlInfo::from(
        persistence.open_first_week(person_id, week)?,
    ))
}

/// Rollover after a given week.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the person already has an open
/// week or no working week exists within the horizon.
pub fn create_new_week(
    persistence: &mut Persistence,
    request: &CreateNewWeekRequest,
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<WeekControlInfo, ApiError> {
    let previous: WeekCode = parse_week(request.previous_week_code)?;
    Ok(WeekControlInfo::from(persistence.create_new_week(
        request.person_id,
        previous,
        config,
        now,
    )?))
}

/// Submits the week's entries and closes it under the regular policy.
///
/// # Errors
///
/// Returns `ApiError::InvariantViolation` naming every blocker when
/// validation refuses the close. Nothing is written in that case.
pub fn close_week(
    persistence: &mut Persistence,
    request: &CloseWeekRequest,
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<CloseWeekResponse, ApiError> {
    let entries: Vec<PendingEntry> = to_pending_entries(&request.entries)?;
    let actor: Actor = resolve_actor(persistence, request.actor_person_id)?;

    let outcome: CloseOutcome = persistence.close_week(
        request.week_control_id,
        &entries,
        &actor,
        ClosePolicy::Regular,
        request.open_next_week,
        config,
        now,
    )?;
    Ok(close_response(outcome))
}

/// Validates a week against submitted entries without writing anything.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for malformed codes or hours.
pub fn validate_week(
    persistence: &mut Persistence,
    request: &ValidateWeekRequest,
    config: &EngineConfig,
    today: Date,
) -> Result<ValidationInfo, ApiError> {
    let week: WeekCode = parse_week(request.week_code)?;
    let entries: Vec<PendingEntry> = to_pending_entries(&request.entries)?;
    let result = persistence.validate_week(request.person_id, week, &entries, config, today)?;
    Ok(ValidationInfo::from(&result))
}

/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown person.
pub fn find_open_week(
    persistence: &mut Persistence,
    person_id: i64,
) -> Result<Option<WeekControlInfo>, ApiError> {
    Ok(persistence
        .find_open_week(person_id)?
        .map(WeekControlInfo::from))
}

/// First day of the week the person can log against.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown person.
pub fn get_available_week_start(
    persistence: &mut Persistence,
    person_id: i64,
) -> Result<AvailableWeekResponse, ApiError> {
    let start: Option<DayCode> = persistence.get_available_week_start(person_id)?;
    Ok(AvailableWeekResponse {
        person_id,
        start_day_code: start.map(DayCode::value),
    })
}

/// # Errors
///
/// Returns an error if the weeks cannot be read.
pub fn list_week_controls(
    persistence: &mut Persistence,
    person_id: i64,
) -> Result<ListWeekControlsResponse, ApiError> {
    let weeks = persistence.list_week_controls(person_id)?;
    Ok(ListWeekControlsResponse {
        person_id,
        weeks: weeks.into_iter().map(WeekControlInfo::from).collect(),
    })
}

/// Administrative rollback of a wrongly created week.
///
/// # Errors
///
/// Returns `ApiError::Dependency` while registry rows or requests use it.
pub fn delete_week_control(
    persistence: &mut Persistence,
    week_control_id: i64,
) -> Result<(), ApiError> {
    Ok(persistence.delete_week_control(week_control_id)?)
}

// ============================================================================
// Early Close
// ============================================================================

/// # Errors
///
/// Returns `ApiError::InvariantViolation` if the week is closed or already
/// has a pending request, or `ApiError::InvalidInput` for a blank message.
pub fn request_early_close(
    persistence: &mut Persistence,
    request: &RequestEarlyCloseRequest,
    now: OffsetDateTime,
) -> Result<EarlyCloseRequestInfo, ApiError> {
    let created =
        persistence.request_early_close(request.week_control_id, &request.message, now)?;
    info!(
        request_id = created.request_id,
        week_control_id = created.week_control_id,
        "Early close requested"
    );
    Ok(EarlyCloseRequestInfo::from(created))
}

/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown control.
pub fn is_early_close_taken(
    persistence: &mut Persistence,
    week_control_id: i64,
) -> Result<bool, ApiError> {
    Ok(persistence.is_early_close_taken(week_control_id)?)
}

/// # Errors
///
/// Returns an error if the requests cannot be read.
pub fn list_pending_early_close_requests(
    persistence: &mut Persistence,
) -> Result<Vec<EarlyCloseRequestInfo>, ApiError> {
    Ok(persistence
        .list_pending_early_close_requests()?
        .into_iter()
        .map(EarlyCloseRequestInfo::from)
        .collect())
}

/// Approves a request, closing its week under the early policy.
///
/// # Errors
///
/// Returns `ApiError::NotFound` once the request has been acted upon, or
/// `ApiError::InvariantViolation` if an assignment is overflowed.
pub fn approve_early_close(
    persistence: &mut Persistence,
    request: &ApproveEarlyCloseRequest,
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<ApproveEarlyCloseResponse, ApiError> {
    let approver: Actor = resolve_actor(persistence, request.approver_person_id)?;

    let outcome: ApprovalOutcome = persistence.approve_early_close(
        request.request_id,
        &approver,
        request.open_next_week,
        config,
        now,
    )?;

    Ok(match outcome {
        ApprovalOutcome::Closed(closed) => ApproveEarlyCloseResponse {
            request_id: request.request_id,
            week_control_id: closed.closed.week_control_id,
            close: Some(close_response(closed)),
        },
        ApprovalOutcome::AlreadyClosed(control) => ApproveEarlyCloseResponse {
            request_id: request.request_id,
            week_control_id: control.week_control_id,
            close: None,
        },
    })
}

/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown request.
pub fn reject_early_close(
    persistence: &mut Persistence,
    request_id: i64,
) -> Result<EarlyCloseRequestInfo, ApiError> {
    Ok(EarlyCloseRequestInfo::from(
        persistence.reject_early_close(request_id)?,
    ))
}

// ============================================================================
// Consistency
// ============================================================================

/// Scans for broken single-open invariants.
///
/// # Errors
///
/// Returns an error if the scan fails.
pub fn consistency_check(persistence: &mut Persistence) -> Result<ConsistencyResponse, ApiError> {
    Ok(ConsistencyResponse::from(persistence.consistency_report()?))
}
