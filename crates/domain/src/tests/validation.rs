// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AllocationKey, DomainError, Assignment, CalendarWeek, DayCode, HolidayCalendar, Hours, PendingEntry,
    ValidationResult, WeekCode, validate_week,
};
use time::Date;
use time::macros::date;

const PERSON: i64 = 1;

fn week_11() -> CalendarWeek {
    WeekCode::new(202_611).unwrap().calendar_week().unwrap()
}

fn hours(value: f64) -> Hours {
    Hours::new(value).unwrap()
}

fn quota() -> Hours {
    hours(9.0)
}

fn assignment(budget_id: i64, role_id: i64, day: Date, planned: f64) -> Assignment {
    Assignment {
        assignment_id: 0,
        person_id: PERSON,
        budget_id,
        role_id,
        week: WeekCode::containing(day),
        day: DayCode::from_date(day),
        hours: hours(planned),
    }
}

#[test]
fn test_empty_registry_is_deterministic() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let assignments: Vec<Assignment> = vec![assignment(1, 1, date!(2026 - 03 - 09), 8.0)];

    let first: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &assignments,
        &[],
        &calendar,
        quota(),
        date!(2026 - 03 - 11),
    )
    .unwrap();
    let second: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &assignments,
        &[],
        &calendar,
        quota(),
        date!(2026 - 03 - 11),
    )
    .unwrap();

    assert_eq!(first, second);
    assert!(!first.week_completed);
    assert!(!first.assignation_overflowed);
    assert!(!first.week_overflowed);
    assert_eq!(first.executed_total, Hours::ZERO);
    assert_eq!(first.pairs.len(), 1);
    assert_eq!(first.pairs[0].executed, None);
}

#[test]
fn test_zero_quota_completes_empty_week() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let result: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &[],
        &[],
        &calendar,
        Hours::ZERO,
        date!(2026 - 03 - 11),
    )
    .unwrap();
    assert!(result.week_completed);
    assert!(!result.week_overflowed);
}

#[test]
fn test_pair_over_its_assignment_sets_assignation_overflowed() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let assignments: Vec<Assignment> = vec![
        assignment(1, 1, date!(2026 - 03 - 09), 4.0),
        assignment(1, 1, date!(2026 - 03 - 10), 4.0),
        assignment(2, 1, date!(2026 - 03 - 11), 10.0),
    ];
    let entries: Vec<PendingEntry> = vec![
        PendingEntry::new(1, 1, hours(9.0)),
        PendingEntry::new(2, 1, hours(5.0)),
    ];

    let result: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &assignments,
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    )
    .unwrap();

    assert!(result.assignation_overflowed);
    let overflowed: Vec<AllocationKey> = result.overflowed_pairs().map(|p| p.key).collect();
    assert_eq!(overflowed, vec![AllocationKey::new(1, 1)]);
}

#[test]
fn test_unassigned_pair_with_hours_overflows() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let entries: Vec<PendingEntry> = vec![PendingEntry::new(7, 3, hours(1.0))];

    let result: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &[],
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    )
    .unwrap();

    assert!(result.assignation_overflowed);
    assert_eq!(result.pairs[0].expected, Hours::ZERO);
}

#[test]
fn test_quota_metrics_are_independent_of_assignments() {
    // Assignments only plan 10h but the fixed quota is 5 days * 9h = 45h.
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let assignments: Vec<Assignment> = vec![assignment(1, 1, date!(2026 - 03 - 09), 10.0)];
    let entries: Vec<PendingEntry> = vec![PendingEntry::new(1, 1, hours(10.0))];

    let result: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &assignments,
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    )
    .unwrap();

    assert!(!result.assignation_overflowed);
    assert!(!result.week_completed);
    assert_eq!(result.quota_total, hours(45.0));
}

#[test]
fn test_holidays_reduce_the_fixed_quota() {
    let calendar: HolidayCalendar =
        HolidayCalendar::new([date!(2026 - 03 - 12), date!(2026 - 03 - 13)]);
    let entries: Vec<PendingEntry> = vec![
        PendingEntry::new(1, 1, hours(20.0)),
        PendingEntry::new(2, 1, hours(8.0)),
    ];

    let result: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &[],
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    )
    .unwrap();

    assert_eq!(result.quota_total, hours(27.0));
    assert!(result.week_completed);
    assert!(result.week_overflowed);
}

#[test]
fn test_other_people_and_weeks_are_ignored() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let mut someone_else: Assignment = assignment(1, 1, date!(2026 - 03 - 09), 40.0);
    someone_else.person_id = 2;
    let next_week: Assignment = assignment(1, 1, date!(2026 - 03 - 16), 40.0);
    let entries: Vec<PendingEntry> = vec![PendingEntry::new(1, 1, hours(1.0))];

    let result: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &[someone_else, next_week],
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    )
    .unwrap();

    assert!(result.assignation_overflowed);
    assert_eq!(result.pairs[0].expected, Hours::ZERO);
}

#[test]
fn test_repeated_entries_for_a_pair_are_summed() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let assignments: Vec<Assignment> = vec![assignment(1, 1, date!(2026 - 03 - 09), 6.0)];
    let entries: Vec<PendingEntry> = vec![
        PendingEntry::new(1, 1, hours(3.0)),
        PendingEntry::new(1, 1, hours(3.0)),
    ];

    let result: ValidationResult = validate_week(
        PERSON,
        &week_11(),
        &assignments,
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    )
    .unwrap();

    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].executed, Some(hours(6.0)));
    assert!(!result.assignation_overflowed);
}

#[test]
fn test_entry_totals_that_overflow_f64_are_rejected() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let entries: Vec<PendingEntry> = vec![
        PendingEntry::new(1, 1, hours(f64::MAX)),
        PendingEntry::new(1, 1, hours(f64::MAX)),
    ];

    let result = validate_week(
        PERSON,
        &week_11(),
        &[],
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    );

    assert!(matches!(result, Err(DomainError::InvalidHours(_))));
}

#[test]
fn test_split_entries_that_overflow_the_week_total_are_rejected() {
    let calendar: HolidayCalendar = HolidayCalendar::default();
    let entries: Vec<PendingEntry> = vec![
        PendingEntry::new(1, 1, hours(f64::MAX)),
        PendingEntry::new(2, 1, hours(f64::MAX)),
    ];

    let result = validate_week(
        PERSON,
        &week_11(),
        &[],
        &entries,
        &calendar,
        quota(),
        date!(2026 - 03 - 16),
    );

    assert!(matches!(result, Err(DomainError::InvalidHours(_))));
}
