// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Two connections to one SQLite file racing conflicting writes.
//!
//! Each thread opens its own handle and waits on a barrier so both writes
//! are issued together. The serialized write path must leave the ledger in
//! a state some sequential order of the two calls could have produced.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

use hourledger::{ClosePolicy, CoreError};
use hourledger_audit::Actor;
use hourledger_domain::{
    AllocationKey, Assignment, Budget, BudgetStatus, DayCode, DomainError, WeekControl,
};

use super::{after_week, config, entry, hours, test_week};
use crate::{CloseOutcome, Persistence, PersistenceError};

/// A file database removed, with its WAL side files, on drop.
struct SharedDb {
    path: PathBuf,
}

impl SharedDb {
    fn new(name: &str) -> Self {
        let path: PathBuf = std::env::temp_dir().join(format!(
            "hourledger_{name}_{}.db",
            std::process::id()
        ));
        remove_db_files(&path);
        Self { path }
    }

    fn open(&self) -> Persistence {
        Persistence::new_with_file(&self.path).unwrap()
    }
}

impl Drop for SharedDb {
    fn drop(&mut self) {
        remove_db_files(&self.path);
    }
}

fn remove_db_files(path: &Path) {
    let _ = std::fs::remove_file(path);
    for suffix in ["-wal", "-shm"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(side));
    }
}

/// Runs `first` and `second` on separate threads, each with its own handle,
/// released together by a barrier.
fn race<A, B, RA, RB>(db: &SharedDb, first: A, second: B) -> (RA, RB)
where
    A: FnOnce(&mut Persistence) -> RA + Send + 'static,
    B: FnOnce(&mut Persistence) -> RB + Send + 'static,
    RA: Send + 'static,
    RB: Send + 'static,
{
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));

    let path_a: PathBuf = db.path.clone();
    let gate_a: Arc<Barrier> = Arc::clone(&barrier);
    let handle_a = thread::spawn(move || {
        let mut persistence: Persistence = Persistence::new_with_file(&path_a).unwrap();
        gate_a.wait();
        first(&mut persistence)
    });

    let path_b: PathBuf = db.path.clone();
    let gate_b: Arc<Barrier> = Arc::clone(&barrier);
    let handle_b = thread::spawn(move || {
        let mut persistence: Persistence = Persistence::new_with_file(&path_b).unwrap();
        gate_b.wait();
        second(&mut persistence)
    });

    (handle_a.join().unwrap(), handle_b.join().unwrap())
}

#[test]
fn test_racing_budget_opens_leave_one_open_budget() {
    let db: SharedDb = SharedDb::new("budget_race");
    let (project_id, phase_one, phase_two) = {
        let mut persistence: Persistence = db.open();
        let project_id: i64 = persistence.create_project("Harbor Bridge").unwrap();
        let phase_one: Budget = persistence
            .create_budget(project_id, "Phase 1", BudgetStatus::Closed)
            .unwrap();
        let phase_two: Budget = persistence
            .create_budget(project_id, "Phase 2", BudgetStatus::Closed)
            .unwrap();
        (project_id, phase_one.budget_id, phase_two.budget_id)
    };

    let (first, second) = race(
        &db,
        move |p| p.set_budget_status(phase_one, BudgetStatus::Open),
        move |p| p.set_budget_status(phase_two, BudgetStatus::Open),
    );

    let outcomes: [&Result<Budget, PersistenceError>; 2] = [&first, &second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    for result in outcomes {
        if let Err(err) = result {
            assert!(matches!(
                err,
                PersistenceError::Rejected(CoreError::DomainViolation(
                    DomainError::ProjectAlreadyHasOpenBudget { .. }
                ))
            ));
        }
    }

    let mut persistence: Persistence = db.open();
    let open: Vec<Budget> = persistence
        .list_budgets_for_project(project_id)
        .unwrap()
        .into_iter()
        .filter(|b| b.status == BudgetStatus::Open)
        .collect();
    assert_eq!(open.len(), 1);
    assert!(persistence.is_project_open(project_id).unwrap());
}

#[test]
fn test_close_week_racing_assignment_delete_never_edits_closed_week() {
    let db: SharedDb = SharedDb::new("close_race");
    let (control, key, actor, surveyor_assignment) = {
        let mut persistence: Persistence = db.open();
        let project_id: i64 = persistence.create_project("Harbor Bridge").unwrap();
        let budget: Budget = persistence
            .create_budget(project_id, "Phase 1", BudgetStatus::Open)
            .unwrap();
        let engineer: i64 = persistence.create_role("Engineer").unwrap();
        let surveyor: i64 = persistence.create_role("Surveyor").unwrap();
        let person_id: i64 = persistence.create_person("Dana Reyes").unwrap();
        let supervisor_id: i64 = persistence.create_person("Sam Okafor").unwrap();
        let control: WeekControl = persistence.open_first_week(person_id, test_week()).unwrap();

        let key: AllocationKey = AllocationKey::new(budget.budget_id, engineer);
        for day in 20_260_309..=20_260_313 {
            persistence
                .upsert_assignment(
                    person_id,
                    key,
                    test_week(),
                    DayCode::new(day).unwrap(),
                    hours(9.0),
                )
                .unwrap();
        }
        let extra: Assignment = persistence
            .upsert_assignment(
                person_id,
                AllocationKey::new(budget.budget_id, surveyor),
                test_week(),
                DayCode::new(20_260_309).unwrap(),
                hours(2.0),
            )
            .unwrap();

        let actor: Actor = Actor::new(supervisor_id, String::from("Sam Okafor"));
        (control, key, actor, extra.assignment_id)
    };
    let week_control_id: i64 = control.week_control_id;

    let (closed, deleted) = race(
        &db,
        move |p| {
            p.close_week(
                week_control_id,
                &[entry(key, 45.0)],
                &actor,
                ClosePolicy::Regular,
                false,
                &config(),
                after_week(),
            )
        },
        move |p| p.delete_assignment(surveyor_assignment),
    );

    let outcome: CloseOutcome = closed.unwrap();
    assert!(outcome.closed.is_closed());

    let mut persistence: Persistence = db.open();
    let remaining: Option<Assignment> = persistence.get_assignment(surveyor_assignment).unwrap();
    match deleted {
        Ok(()) => assert!(remaining.is_none()),
        Err(err) => {
            assert!(matches!(
                err,
                PersistenceError::Rejected(CoreError::DomainViolation(
                    DomainError::WeekClosed { .. }
                ))
            ));
            assert!(remaining.is_some());
        }
    }

    let stored: WeekControl = persistence
        .get_week_control(week_control_id)
        .unwrap()
        .unwrap();
    assert!(stored.is_closed());
    assert_eq!(
        persistence.sum_hours_for_control(week_control_id).unwrap(),
        hours(45.0)
    );
}
