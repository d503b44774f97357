// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    closed_control, create_test_actor, create_test_assignment, create_test_justification,
    open_control,
};
use crate::{
    AssignmentDeletePlan, CoreError, ensure_can_open_budget, ensure_early_close_allowed,
    ensure_no_open_week, ensure_not_before_latest_week, ensure_week_editable,
    plan_assignment_delete, registry_change,
};
use hourledger_audit::RegistryChange;
use hourledger_domain::{Budget, BudgetStatus, DomainError, Hours, Registry, WeekCode};

fn open_budget(budget_id: i64) -> Budget {
    Budget {
        budget_id,
        project_id: 1,
        name: String::from("Phase 1"),
        status: BudgetStatus::Open,
    }
}

#[test]
fn test_delete_without_control_is_unconditional() {
    let plan = plan_assignment_delete(&create_test_assignment(), None).unwrap();
    assert_eq!(plan, AssignmentDeletePlan::Unconditional);
}

#[test]
fn test_delete_under_open_week_clears_first() {
    let control = open_control(8, 202_611);
    let plan = plan_assignment_delete(&create_test_assignment(), Some(&control)).unwrap();
    assert_eq!(
        plan,
        AssignmentDeletePlan::ClearThenDelete { week_control_id: 8 }
    );
}

#[test]
fn test_delete_under_closed_week_is_rejected() {
    let control = closed_control(8, 202_611);
    let err: CoreError = plan_assignment_delete(&create_test_assignment(), Some(&control))
        .unwrap_err();
    assert_eq!(err.to_string(), "Domain violation: the week is closed, cannot be modified");
}

#[test]
fn test_week_editable_only_when_not_closed() {
    let week: WeekCode = WeekCode::new(202_611).unwrap();
    assert!(ensure_week_editable(5, week, None).is_ok());
    assert!(ensure_week_editable(5, week, Some(&open_control(1, 202_611))).is_ok());
    assert!(ensure_week_editable(5, week, Some(&closed_control(1, 202_611))).is_err());
}

#[test]
fn test_registry_change_captures_before_and_after() {
    let control = open_control(3, 202_611);
    let registry: Registry = Registry {
        registry_id: 12,
        week_control_id: 3,
        budget_id: 2,
        role_id: 3,
        hours: Hours::new(8.0).unwrap(),
    };

    let change: RegistryChange = registry_change(
        &control,
        &registry,
        Hours::new(6.0).unwrap(),
        create_test_actor(),
        create_test_justification(),
    )
    .unwrap();

    assert_eq!(change.registry_id, 12);
    assert_eq!(change.previous_hours, Hours::new(8.0).unwrap());
    assert_eq!(change.new_hours, Hours::new(6.0).unwrap());
    assert_eq!(change.actor.person_id, 9);
}

#[test]
fn test_registry_change_rejected_on_closed_week() {
    let control = closed_control(3, 202_611);
    let registry: Registry = Registry {
        registry_id: 12,
        week_control_id: 3,
        budget_id: 2,
        role_id: 3,
        hours: Hours::new(8.0).unwrap(),
    };

    let result = registry_change(
        &control,
        &registry,
        Hours::new(6.0).unwrap(),
        create_test_actor(),
        create_test_justification(),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::WeekClosed { .. }))
    ));
}

#[test]
fn test_early_close_gating() {
    assert!(ensure_early_close_allowed(&open_control(1, 202_611), false).is_ok());
    assert_eq!(
        ensure_early_close_allowed(&open_control(1, 202_611), true),
        Err(CoreError::DomainViolation(
            DomainError::EarlyCloseAlreadyRequested { week_control_id: 1 }
        ))
    );
    assert_eq!(
        ensure_early_close_allowed(&closed_control(1, 202_611), false),
        Err(CoreError::DomainViolation(DomainError::WeekAlreadyClosed {
            week_control_id: 1
        }))
    );
}

#[test]
fn test_second_open_budget_is_rejected() {
    let current: Budget = open_budget(10);
    assert!(ensure_can_open_budget(1, Some(11), None).is_ok());
    assert!(ensure_can_open_budget(1, Some(10), Some(&current)).is_ok());
    assert_eq!(
        ensure_can_open_budget(1, Some(11), Some(&current)),
        Err(CoreError::DomainViolation(
            DomainError::ProjectAlreadyHasOpenBudget {
                project_id: 1,
                open_budget_id: 10,
            }
        ))
    );
    // A budget being created has no id yet.
    assert!(ensure_can_open_budget(1, None, Some(&current)).is_err());
}

#[test]
fn test_only_one_open_week_per_person() {
    assert!(ensure_no_open_week(5, None).is_ok());
    assert_eq!(
        ensure_no_open_week(5, Some(&open_control(1, 202_611))),
        Err(CoreError::DomainViolation(
            DomainError::PersonAlreadyHasOpenWeek {
                person_id: 5,
                week: WeekCode::new(202_611).unwrap(),
            }
        ))
    );
}

#[test]
fn test_week_may_not_precede_latest_control() {
    let latest = closed_control(3, 202_611);
    let earlier: WeekCode = WeekCode::new(202_605).unwrap();

    assert!(ensure_not_before_latest_week(5, earlier, None).is_ok());
    assert!(ensure_not_before_latest_week(5, WeekCode::new(202_611).unwrap(), Some(&latest)).is_ok());
    assert!(ensure_not_before_latest_week(5, WeekCode::new(202_614).unwrap(), Some(&latest)).is_ok());
    assert_eq!(
        ensure_not_before_latest_week(5, earlier, Some(&latest)),
        Err(CoreError::DomainViolation(DomainError::WeekBeforeLatest {
            person_id: 5,
            week: earlier,
            latest: WeekCode::new(202_611).unwrap(),
        }))
    );
}
