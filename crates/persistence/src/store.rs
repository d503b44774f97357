// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection-generic access to the backend-specific primitives.
//!
//! `backend_fn!` produces a `_sqlite` and a `_mysql` copy of every query and
//! mutation. Ledger operations compose many of them, so instead of writing
//! each composite twice they are written once against [`LedgerStore`], which
//! is implemented for both connection types by forwarding to the matching
//! copy. No logic lives here.

use diesel::{MysqlConnection, SqliteConnection};
use hourledger_audit::{RegistryChange, RegistryLogEntry};
use hourledger_domain::{
    AllocationKey, Assignment, Budget, BudgetStatus, DayCode, EarlyCloseRequest, Hours, Person,
    Project, Registry, Role, WeekCode, WeekControl,
};
use time::OffsetDateTime;

use crate::backend::PersistenceBackend;
use crate::data_models::{ConsistencyReport, Holiday};
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Generates the `LedgerStore` trait and one forwarding impl per backend.
macro_rules! ledger_store {
    (
        $(
            $module:ident {
                $(
                    fn $name:ident ( $( $param:ident : $param_ty:ty ),* $(,)? ) -> $ret:ty;
                )*
            }
        )*
    ) => {
        /// Every primitive the ledger composites need, generic over the backend.
        pub trait LedgerStore: PersistenceBackend {
            $( $(
                fn $name(&mut self $(, $param: $param_ty)*) -> $ret;
            )* )*
        }

        pastey::paste! {
            impl LedgerStore for SqliteConnection {
                $( $(
                    fn $name(&mut self $(, $param: $param_ty)*) -> $ret {
                        $module::[<$name _sqlite>](self $(, $param)*)
                    }
                )* )*
            }

            impl LedgerStore for MysqlConnection {
                $( $(
                    fn $name(&mut self $(, $param: $param_ty)*) -> $ret {
                        $module::[<$name _mysql>](self $(, $param)*)
                    }
                )* )*
            }
        }
    };
}

ledger_store! {
    queries {
        fn get_project(project_id: i64) -> Result<Option<Project>, PersistenceError>;
        fn get_person(person_id: i64) -> Result<Option<Person>, PersistenceError>;
        fn get_role(role_id: i64) -> Result<Option<Role>, PersistenceError>;
        fn list_holidays() -> Result<Vec<Holiday>, PersistenceError>;

        fn get_budget(budget_id: i64) -> Result<Option<Budget>, PersistenceError>;
        fn find_open_budget(project_id: i64) -> Result<Option<Budget>, PersistenceError>;
        fn list_budgets_for_project(project_id: i64) -> Result<Vec<Budget>, PersistenceError>;
        fn count_budget_references(budget_id: i64) -> Result<(i64, i64), PersistenceError>;

        fn get_assignment(assignment_id: i64) -> Result<Option<Assignment>, PersistenceError>;
        fn find_assignment_by_key(
            person_id: i64,
            budget_id: i64,
            role_id: i64,
            day: DayCode,
        ) -> Result<Option<Assignment>, PersistenceError>;
        fn list_assignments_for_week(
            person_id: i64,
            week: WeekCode,
        ) -> Result<Vec<Assignment>, PersistenceError>;
        fn find_open_assignments_by_budget(
            budget_id: i64,
        ) -> Result<Vec<Assignment>, PersistenceError>;

        fn get_registry(registry_id: i64) -> Result<Option<Registry>, PersistenceError>;
        fn find_registry(
            week_control_id: i64,
            budget_id: i64,
            role_id: i64,
        ) -> Result<Option<Registry>, PersistenceError>;
        fn list_registry_for_control(
            week_control_id: i64,
        ) -> Result<Vec<Registry>, PersistenceError>;
        fn sum_hours_for_control(week_control_id: i64) -> Result<f64, PersistenceError>;
        fn list_registry_logs(registry_id: i64) -> Result<Vec<RegistryLogEntry>, PersistenceError>;
        fn list_registry_logs_for_control(
            week_control_id: i64,
        ) -> Result<Vec<RegistryLogEntry>, PersistenceError>;

        fn get_week_control(week_control_id: i64) -> Result<Option<WeekControl>, PersistenceError>;
        fn find_week_control(
            person_id: i64,
            week: WeekCode,
        ) -> Result<Option<WeekControl>, PersistenceError>;
        fn list_week_controls(person_id: i64) -> Result<Vec<WeekControl>, PersistenceError>;
        fn list_open_week_controls(person_id: i64) -> Result<Vec<WeekControl>, PersistenceError>;
        fn latest_week_control(person_id: i64) -> Result<Option<WeekControl>, PersistenceError>;

        fn get_early_close_request(
            request_id: i64,
        ) -> Result<Option<EarlyCloseRequest>, PersistenceError>;
        fn find_early_close_for_control(
            week_control_id: i64,
        ) -> Result<Option<EarlyCloseRequest>, PersistenceError>;
        fn list_pending_early_close_requests() -> Result<Vec<EarlyCloseRequest>, PersistenceError>;
        fn count_early_close_requests(week_control_id: i64) -> Result<i64, PersistenceError>;

        fn consistency_report() -> Result<ConsistencyReport, PersistenceError>;
    }

    mutations {
        fn insert_project(name: &str) -> Result<i64, PersistenceError>;
        fn insert_person(display_name: &str) -> Result<i64, PersistenceError>;
        fn insert_role(name: &str) -> Result<i64, PersistenceError>;
        fn insert_holiday(day: DayCode, description: &str) -> Result<(), PersistenceError>;
        fn delete_holiday(day: DayCode) -> Result<bool, PersistenceError>;

        fn insert_budget(
            project_id: i64,
            name: &str,
            status: BudgetStatus,
        ) -> Result<i64, PersistenceError>;
        fn update_budget_status(budget_id: i64, status: BudgetStatus) -> Result<(), PersistenceError>;
        fn delete_budget_row(budget_id: i64) -> Result<(), PersistenceError>;

        fn insert_assignment(
            person_id: i64,
            key: AllocationKey,
            week: WeekCode,
            day: DayCode,
            hours: Hours,
        ) -> Result<i64, PersistenceError>;
        fn update_assignment_hours(assignment_id: i64, hours: Hours) -> Result<(), PersistenceError>;
        fn delete_assignment_row(assignment_id: i64) -> Result<(), PersistenceError>;
        fn delete_assignments_for_week(
            person_id: i64,
            week: WeekCode,
        ) -> Result<usize, PersistenceError>;

        fn insert_registry(
            week_control_id: i64,
            key: AllocationKey,
            hours: Hours,
        ) -> Result<i64, PersistenceError>;
        fn update_registry_hours(registry_id: i64, hours: Hours) -> Result<(), PersistenceError>;
        fn insert_registry_log(
            change: &RegistryChange,
            logged_at: OffsetDateTime,
        ) -> Result<i64, PersistenceError>;
        fn delete_registry_row(registry_id: i64) -> Result<(), PersistenceError>;
        fn clear_registry(
            week_control_id: i64,
            budget_id: Option<i64>,
            role_id: Option<i64>,
        ) -> Result<usize, PersistenceError>;

        fn insert_week_control(
            person_id: i64,
            week: WeekCode,
            closed_at: Option<OffsetDateTime>,
        ) -> Result<i64, PersistenceError>;
        fn close_week_control(
            week_control_id: i64,
            closed_at: OffsetDateTime,
        ) -> Result<(), PersistenceError>;
        fn delete_week_control_row(week_control_id: i64) -> Result<(), PersistenceError>;

        fn insert_early_close_request(
            week_control_id: i64,
            message: &str,
            submitted_at: OffsetDateTime,
        ) -> Result<i64, PersistenceError>;
        fn delete_early_close_request(request_id: i64) -> Result<bool, PersistenceError>;
    }
}
