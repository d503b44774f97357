// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use hourledger_audit::{Actor, Justification, RegistryChange};
use hourledger_domain::{
    Assignment, Budget, DomainError, Hours, Registry, WeekCode, WeekControl,
};

/// What deleting an assignment requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentDeletePlan {
    /// No control record covers the assignment; delete it directly.
    Unconditional,
    /// The covering week is open: clear the matching registry row first,
    /// then delete the assignment.
    ClearThenDelete {
        /// The open control week holding the registry row.
        week_control_id: i64,
    },
}

/// Decides how an assignment delete proceeds given its covering control.
///
/// # Errors
///
/// Returns `DomainError::WeekClosed` if the covering week is closed.
pub fn plan_assignment_delete(
    assignment: &Assignment,
    control: Option<&WeekControl>,
) -> Result<AssignmentDeletePlan, CoreError> {
    match control {
        None => Ok(AssignmentDeletePlan::Unconditional),
        Some(control) if control.is_closed() => {
            Err(CoreError::DomainViolation(DomainError::WeekClosed {
                person_id: assignment.person_id,
                week: assignment.week,
            }))
        }
        Some(control) => Ok(AssignmentDeletePlan::ClearThenDelete {
            week_control_id: control.week_control_id,
        }),
    }
}

/// Rejects edits to planned hours in a closed week.
///
/// A missing control record means the week is still editable.
///
/// # Errors
///
/// Returns `DomainError::WeekClosed` if `control` is closed.
pub fn ensure_week_editable(
    person_id: i64,
    week: WeekCode,
    control: Option<&WeekControl>,
) -> Result<(), CoreError> {
    if control.is_some_and(WeekControl::is_closed) {
        return Err(CoreError::DomainViolation(DomainError::WeekClosed {
            person_id,
            week,
        }));
    }
    Ok(())
}

/// Rejects registry writes under a closed control week.
///
/// # Errors
///
/// Returns `DomainError::WeekClosed` if `control` is closed.
pub fn ensure_registry_writable(control: &WeekControl) -> Result<(), CoreError> {
    ensure_week_editable(control.person_id, control.week, Some(control))
}

/// Builds the audit payload for changing a registry row's hours.
///
/// # Errors
///
/// Returns `DomainError::WeekClosed` if `control` is closed.
pub fn registry_change(
    control: &WeekControl,
    registry: &Registry,
    new_hours: Hours,
    actor: Actor,
    justification: Justification,
) -> Result<RegistryChange, CoreError> {
    ensure_registry_writable(control)?;
    Ok(RegistryChange::new(
        registry.registry_id,
        control.week_control_id,
        actor,
        justification,
        registry.hours,
        new_hours,
    ))
}

/// Checks an early-close request may be filed.
///
/// # Errors
///
/// Returns `DomainError::WeekAlreadyClosed` for a closed week, or
/// `DomainError::EarlyCloseAlreadyRequested` if one is already pending.
pub fn ensure_early_close_allowed(
    control: &WeekControl,
    already_requested: bool,
) -> Result<(), CoreError> {
    if control.is_closed() {
        return Err(CoreError::DomainViolation(DomainError::WeekAlreadyClosed {
            week_control_id: control.week_control_id,
        }));
    }
    if already_requested {
        return Err(CoreError::DomainViolation(
            DomainError::EarlyCloseAlreadyRequested {
                week_control_id: control.week_control_id,
            },
        ));
    }
    Ok(())
}

/// Checks `budget_id` may become the open budget of `project_id`.
///
/// `current_open` is the project's open budget read under the project lock.
/// Re-opening the budget that is already open is allowed.
///
/// # Errors
///
/// Returns `DomainError::ProjectAlreadyHasOpenBudget` if another budget of the
/// project is open.
pub fn ensure_can_open_budget(
    project_id: i64,
    budget_id: Option<i64>,
    current_open: Option<&Budget>,
) -> Result<(), CoreError> {
    match current_open {
        Some(open) if Some(open.budget_id) != budget_id => Err(CoreError::DomainViolation(
            DomainError::ProjectAlreadyHasOpenBudget {
                project_id,
                open_budget_id: open.budget_id,
            },
        )),
        _ => Ok(()),
    }
}

/// Checks a person has no open week before a new one is opened for them.
///
/// # Errors
///
/// Returns `DomainError::PersonAlreadyHasOpenWeek` if `open_week` is present.
pub fn ensure_no_open_week(
    person_id: i64,
    open_week: Option<&WeekControl>,
) -> Result<(), CoreError> {
    if let Some(open) = open_week {
        return Err(CoreError::DomainViolation(
            DomainError::PersonAlreadyHasOpenWeek {
                person_id,
                week: open.week,
            },
        ));
    }
    Ok(())
}

/// Checks `week` does not precede the person's most recent control week.
///
/// Control weeks only move forward; reopening or rolling over from an
/// earlier week would leave a later closed week behind the open one.
///
/// # Errors
///
/// Returns `DomainError::WeekBeforeLatest` if `week` is earlier than `latest`.
pub fn ensure_not_before_latest_week(
    person_id: i64,
    week: WeekCode,
    latest: Option<&WeekControl>,
) -> Result<(), CoreError> {
    match latest {
        Some(latest) if week < latest.week => Err(CoreError::DomainViolation(
            DomainError::WeekBeforeLatest {
                person_id,
                week,
                latest: latest.week,
            },
        )),
        _ => Ok(()),
    }
}
