// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod assignment_tests;
mod backend_validation_tests;
mod concurrency_tests;
mod consistency_tests;
mod early_close_tests;
mod initialization_tests;

use hourledger::EngineConfig;
use hourledger_audit::{Actor, Justification};
use hourledger_domain::{
    AllocationKey, Budget, BudgetStatus, DayCode, Hours, PendingEntry, WeekCode, WeekControl,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

/// A database seeded with one project, one open budget, one role and one
/// person whose first week (2026-W11, March 9 to 15) is open.
pub struct Fixture {
    pub persistence: Persistence,
    pub project_id: i64,
    pub budget: Budget,
    pub role_id: i64,
    pub person_id: i64,
    pub supervisor_id: i64,
    pub control: WeekControl,
}

impl Fixture {
    pub fn key(&self) -> AllocationKey {
        AllocationKey::new(self.budget.budget_id, self.role_id)
    }

    pub fn supervisor(&self) -> Actor {
        Actor::new(self.supervisor_id, String::from("Supervisor"))
    }

    /// Plans `hours` on each working day of the open week.
    pub fn assign_full_week(&mut self, hours_per_day: f64) {
        let key: AllocationKey = self.key();
        for day in 20_260_309..=20_260_313 {
            self.persistence
                .upsert_assignment(
                    self.person_id,
                    key,
                    test_week(),
                    DayCode::new(day).unwrap(),
                    hours(hours_per_day),
                )
                .unwrap();
        }
    }
}

pub fn setup() -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let project_id: i64 = persistence.create_project("Harbor Bridge").unwrap();
    let budget: Budget = persistence
        .create_budget(project_id, "Phase 1", BudgetStatus::Open)
        .unwrap();
    let role_id: i64 = persistence.create_role("Engineer").unwrap();
    let person_id: i64 = persistence.create_person("Dana Reyes").unwrap();
    let supervisor_id: i64 = persistence.create_person("Sam Okafor").unwrap();
    let control: WeekControl = persistence
        .open_first_week(person_id, test_week())
        .unwrap();

    Fixture {
        persistence,
        project_id,
        budget,
        role_id,
        person_id,
        supervisor_id,
        control,
    }
}

/// 2026-W11, Monday March 9 to Sunday March 15.
pub fn test_week() -> WeekCode {
    WeekCode::new(202_611).unwrap()
}

pub fn test_day() -> DayCode {
    DayCode::new(20_260_310).unwrap()
}

pub fn hours(value: f64) -> Hours {
    Hours::new(value).unwrap()
}

pub fn entry(key: AllocationKey, value: f64) -> PendingEntry {
    PendingEntry::new(key.budget_id, key.role_id, hours(value))
}

pub fn create_test_justification() -> Justification {
    Justification::new("Corrected after review").unwrap()
}

/// During the test week.
pub fn mid_week() -> OffsetDateTime {
    datetime!(2026-03-11 10:00 UTC)
}

/// The Monday after the test week.
pub fn after_week() -> OffsetDateTime {
    datetime!(2026-03-16 09:00 UTC)
}

pub fn config() -> EngineConfig {
    EngineConfig::default()
}
