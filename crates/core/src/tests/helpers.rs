// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hourledger_audit::{Actor, Justification};
use hourledger_domain::{
    Assignment, DayCode, Hours, ValidationResult, WeekCode, WeekControl, WeekControlState,
};
use time::OffsetDateTime;
use time::macros::{date, datetime};

pub fn create_test_actor() -> Actor {
    Actor::new(9, String::from("Supervisor"))
}

pub fn create_test_justification() -> Justification {
    Justification::new("Corrected after review").unwrap()
}

pub fn close_instant() -> OffsetDateTime {
    datetime!(2026-03-16 09:00 UTC)
}

pub fn open_control(week_control_id: i64, week: i32) -> WeekControl {
    WeekControl {
        week_control_id,
        person_id: 5,
        week: WeekCode::new(week).unwrap(),
        state: WeekControlState::Open,
    }
}

pub fn closed_control(week_control_id: i64, week: i32) -> WeekControl {
    WeekControl {
        state: WeekControlState::Closed {
            at: close_instant(),
        },
        ..open_control(week_control_id, week)
    }
}

pub fn create_test_assignment() -> Assignment {
    Assignment {
        assignment_id: 1,
        person_id: 5,
        budget_id: 2,
        role_id: 3,
        week: WeekCode::new(202_611).unwrap(),
        day: DayCode::from_date(date!(2026 - 03 - 10)),
        hours: Hours::new(4.0).unwrap(),
    }
}

pub fn validation(
    assignation_overflowed: bool,
    time_completed: bool,
    week_completed: bool,
) -> ValidationResult {
    ValidationResult {
        assignation_overflowed,
        time_completed,
        week_completed,
        week_overflowed: false,
        pairs: Vec::new(),
        executed_total: Hours::ZERO,
        quota_total: Hours::ZERO,
    }
}
