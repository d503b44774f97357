// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use hourledger::EngineConfig;
use hourledger_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    BudgetInfo, CreateBudgetRequest, RegistryEntryInput, UpsertAssignmentRequest,
    WeekControlInfo, create_budget, create_person, create_project, create_role, open_first_week,
    upsert_assignment,
};

/// 2026-W11, Monday March 9 to Sunday March 15.
pub const TEST_WEEK: i32 = 202_611;

/// A ledger with one open budget and one person whose first week is open.
pub struct TestLedger {
    pub persistence: Persistence,
    pub project_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    pub person_id: i64,
    pub supervisor_id: i64,
    pub week_control_id: i64,
}

impl TestLedger {
    pub fn entry(&self, hours: f64) -> RegistryEntryInput {
        RegistryEntryInput {
            budget_id: self.budget_id,
            role_id: self.role_id,
            hours,
        }
    }

    /// Plans `hours` on each weekday of the test week.
    pub fn assign_full_week(&mut self, hours: f64) {
        for day_code in 20_260_309..=20_260_313 {
            upsert_assignment(
                &mut self.persistence,
                &UpsertAssignmentRequest {
                    person_id: self.person_id,
                    budget_id: self.budget_id,
                    role_id: self.role_id,
                    week_code: TEST_WEEK,
                    day_code,
                    hours,
                },
            )
            .unwrap();
        }
    }
}

pub fn create_test_ledger() -> TestLedger {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let project_id: i64 = create_project(&mut persistence, "Harbor Bridge").unwrap();
    let budget: BudgetInfo = create_budget(
        &mut persistence,
        &CreateBudgetRequest {
            project_id,
            name: String::from("Phase 1"),
            open: true,
        },
    )
    .unwrap();
    let role_id: i64 = create_role(&mut persistence, "Engineer").unwrap();
    let person_id: i64 = create_person(&mut persistence, "Dana Reyes").unwrap();
    let supervisor_id: i64 = create_person(&mut persistence, "Sam Okafor").unwrap();
    let week: WeekControlInfo = open_first_week(&mut persistence, person_id, TEST_WEEK).unwrap();

    TestLedger {
        persistence,
        project_id,
        budget_id: budget.budget_id,
        role_id,
        person_id,
        supervisor_id,
        week_control_id: week.week_control_id,
    }
}

pub fn create_test_config() -> EngineConfig {
    EngineConfig::default()
}

pub fn mid_week() -> OffsetDateTime {
    datetime!(2026-03-11 10:00 UTC)
}

pub fn after_week() -> OffsetDateTime {
    datetime!(2026-03-16 09:00 UTC)
}
