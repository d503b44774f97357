// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hourledger::{ClosePolicy, CoreError};
use hourledger_domain::{
    AllocationKey, Assignment, BudgetStatus, DayCode, DomainError, WeekCode,
};

use super::{
    Fixture, after_week, config, entry, hours, setup, test_day, test_week,
};
use crate::PersistenceError;

#[test]
fn test_upsert_assignment_accumulates_hours() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();

    let first: Assignment = fx
        .persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(4.0))
        .unwrap();
    let second: Assignment = fx
        .persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(4.0))
        .unwrap();

    assert_eq!(first.assignment_id, second.assignment_id);
    assert_eq!(second.hours, hours(8.0));

    let stored: Vec<Assignment> = fx
        .persistence
        .list_assignments_for_week(fx.person_id, test_week())
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].hours, hours(8.0));
}

#[test]
fn test_upsert_assignment_rejects_accumulation_past_f64_range() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();

    fx.persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(f64::MAX))
        .unwrap();
    let result = fx
        .persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(f64::MAX));

    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(CoreError::DomainViolation(
            DomainError::InvalidHours(_)
        )))
    ));

    let stored: Vec<Assignment> = fx
        .persistence
        .list_assignments_for_week(fx.person_id, test_week())
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].hours, hours(f64::MAX));
    assert!(stored[0].hours.value().is_finite());
}

#[test]
fn test_upsert_assignment_separate_days_are_separate_rows() {
    let mut fx: Fixture = setup();
    fx.assign_full_week(2.0);

    let stored: Vec<Assignment> = fx
        .persistence
        .list_assignments_for_week(fx.person_id, test_week())
        .unwrap();
    assert_eq!(stored.len(), 5);
}

#[test]
fn test_upsert_assignment_day_outside_week() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();
    let next_monday: DayCode = DayCode::new(20_260_316).unwrap();

    let result = fx
        .persistence
        .upsert_assignment(fx.person_id, key, test_week(), next_monday, hours(1.0));

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::DomainViolation(
            DomainError::DateOutsideWeek {
                day: next_monday,
                week: test_week(),
            }
        )))
    );
}

#[test]
fn test_upsert_assignment_without_control_week_is_allowed() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();
    let future_week: WeekCode = WeekCode::new(202_620).unwrap();
    let day: DayCode = DayCode::new(20_260_511).unwrap();

    let assignment: Assignment = fx
        .persistence
        .upsert_assignment(fx.person_id, key, future_week, day, hours(6.0))
        .unwrap();

    assert_eq!(assignment.week, future_week);
}

#[test]
fn test_closed_week_freezes_assignments() {
    let mut fx: Fixture = setup();
    fx.assign_full_week(9.0);
    let key: AllocationKey = fx.key();
    let actor = fx.supervisor();

    fx.persistence
        .close_week(
            fx.control.week_control_id,
            &[entry(key, 45.0)],
            &actor,
            ClosePolicy::Regular,
            false,
            &config(),
            after_week(),
        )
        .unwrap();

    let before: Vec<Assignment> = fx
        .persistence
        .list_assignments_for_week(fx.person_id, test_week())
        .unwrap();
    let target: &Assignment = &before[0];

    let upsert = fx
        .persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(1.0));
    let update = fx
        .persistence
        .update_assignment_hours(target.assignment_id, hours(1.0));
    let delete = fx.persistence.delete_assignment(target.assignment_id);

    let week_closed = PersistenceError::Rejected(CoreError::DomainViolation(
        DomainError::WeekClosed {
            person_id: fx.person_id,
            week: test_week(),
        },
    ));
    assert_eq!(upsert, Err(week_closed.clone()));
    assert_eq!(update, Err(week_closed.clone()));
    assert_eq!(delete, Err(week_closed));

    let after: Vec<Assignment> = fx
        .persistence
        .list_assignments_for_week(fx.person_id, test_week())
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_update_assignment_hours_replaces_value() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();
    let assignment: Assignment = fx
        .persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(4.0))
        .unwrap();

    let updated: Assignment = fx
        .persistence
        .update_assignment_hours(assignment.assignment_id, hours(1.5))
        .unwrap();

    assert_eq!(updated.hours, hours(1.5));
    assert_eq!(
        fx.persistence
            .get_assignment(assignment.assignment_id)
            .unwrap()
            .unwrap()
            .hours,
        hours(1.5)
    );
}

#[test]
fn test_delete_assignment_clears_matching_registry_row() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();
    let other_role: i64 = fx.persistence.create_role("Surveyor").unwrap();
    let other_key: AllocationKey = AllocationKey::new(fx.budget.budget_id, other_role);

    let assignment: Assignment = fx
        .persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(4.0))
        .unwrap();
    fx.persistence
        .create_registry(fx.control.week_control_id, key, hours(3.0))
        .unwrap();
    fx.persistence
        .create_registry(fx.control.week_control_id, other_key, hours(2.0))
        .unwrap();

    fx.persistence.delete_assignment(assignment.assignment_id).unwrap();

    assert!(fx
        .persistence
        .get_assignment(assignment.assignment_id)
        .unwrap()
        .is_none());
    assert!(fx
        .persistence
        .find_registry(fx.control.week_control_id, key)
        .unwrap()
        .is_none());
    assert!(fx
        .persistence
        .find_registry(fx.control.week_control_id, other_key)
        .unwrap()
        .is_some());
}

#[test]
fn test_delete_assignment_without_control_week() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();
    let assignment: Assignment = fx
        .persistence
        .upsert_assignment(
            fx.person_id,
            key,
            WeekCode::new(202_620).unwrap(),
            DayCode::new(20_260_512).unwrap(),
            hours(3.0),
        )
        .unwrap();

    fx.persistence.delete_assignment(assignment.assignment_id).unwrap();

    assert!(fx
        .persistence
        .get_assignment(assignment.assignment_id)
        .unwrap()
        .is_none());
}

#[test]
fn test_delete_unknown_assignment() {
    let mut fx: Fixture = setup();
    assert!(matches!(
        fx.persistence.delete_assignment(4_242),
        Err(PersistenceError::NotFound { ref resource_type, .. }) if resource_type == "Assignment"
    ));
}

#[test]
fn test_find_open_assignments_by_budget_skips_closed_weeks() {
    let mut fx: Fixture = setup();
    fx.assign_full_week(9.0);
    let key: AllocationKey = fx.key();
    let actor = fx.supervisor();

    let outcome = fx
        .persistence
        .close_week(
            fx.control.week_control_id,
            &[entry(key, 45.0)],
            &actor,
            ClosePolicy::Regular,
            true,
            &config(),
            after_week(),
        )
        .unwrap();
    let next = outcome.next_week.unwrap();

    let next_monday: DayCode = DayCode::new(20_260_316).unwrap();
    let open_assignment: Assignment = fx
        .persistence
        .upsert_assignment(fx.person_id, key, next.week, next_monday, hours(8.0))
        .unwrap();
    let unplanned: Assignment = fx
        .persistence
        .upsert_assignment(
            fx.person_id,
            key,
            WeekCode::new(202_620).unwrap(),
            DayCode::new(20_260_513).unwrap(),
            hours(2.0),
        )
        .unwrap();

    let mut found: Vec<i64> = fx
        .persistence
        .find_open_assignments_by_budget(fx.budget.budget_id)
        .unwrap()
        .into_iter()
        .map(|a| a.assignment_id)
        .collect();
    found.sort_unstable();

    assert_eq!(found, vec![open_assignment.assignment_id, unplanned.assignment_id]);
}

#[test]
fn test_find_open_assignments_by_budget_filters_budget() {
    let mut fx: Fixture = setup();
    let key: AllocationKey = fx.key();
    fx.persistence
        .upsert_assignment(fx.person_id, key, test_week(), test_day(), hours(2.0))
        .unwrap();

    let other_project: i64 = fx.persistence.create_project("Quiet Works").unwrap();
    let other_budget = fx
        .persistence
        .create_budget(other_project, "Main", BudgetStatus::Open)
        .unwrap();

    assert!(fx
        .persistence
        .find_open_assignments_by_budget(other_budget.budget_id)
        .unwrap()
        .is_empty());
    assert_eq!(
        fx.persistence
            .find_open_assignments_by_budget(fx.budget.budget_id)
            .unwrap()
            .len(),
        1
    );
    assert!(matches!(
        fx.persistence.find_open_assignments_by_budget(9_999),
        Err(PersistenceError::NotFound { ref resource_type, .. }) if resource_type == "Budget"
    ));
}
