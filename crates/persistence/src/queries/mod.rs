// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `directory`: Projects, persons, roles and holidays
//! - `budgets`: Budget lookups and reference counts
//! - `assignments`: Planned hours per person, budget, role and day
//! - `registry`: Reported hours and their change log
//! - `weeks`: Week control records
//! - `early_close`: Pending early-close requests
//! - `consistency`: Cross-row invariant scan
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`
//!
//! The `LedgerStore` trait in `store.rs` dispatches to the appropriate version
//! based on the connection type.

pub mod assignments;
pub mod budgets;
pub mod consistency;
pub mod directory;
pub mod early_close;
pub mod registry;
pub mod weeks;

pub use assignments::{
    find_assignment_by_key_mysql, find_assignment_by_key_sqlite,
    find_open_assignments_by_budget_mysql, find_open_assignments_by_budget_sqlite,
    get_assignment_mysql, get_assignment_sqlite, list_assignments_for_week_mysql,
    list_assignments_for_week_sqlite,
};
pub use budgets::{
    count_budget_references_mysql, count_budget_references_sqlite, find_open_budget_mysql,
    find_open_budget_sqlite, get_budget_mysql, get_budget_sqlite, list_budgets_for_project_mysql,
    list_budgets_for_project_sqlite,
};
pub use consistency::{consistency_report_mysql, consistency_report_sqlite};
pub use directory::{
    get_person_mysql, get_person_sqlite, get_project_mysql, get_project_sqlite, get_role_mysql,
    get_role_sqlite, list_holidays_mysql, list_holidays_sqlite,
};
pub use early_close::{
    count_early_close_requests_mysql, count_early_close_requests_sqlite,
    find_early_close_for_control_mysql, find_early_close_for_control_sqlite,
    get_early_close_request_mysql, get_early_close_request_sqlite,
    list_pending_early_close_requests_mysql, list_pending_early_close_requests_sqlite,
};
pub use registry::{
    find_registry_mysql, find_registry_sqlite, get_registry_mysql, get_registry_sqlite,
    list_registry_for_control_mysql, list_registry_for_control_sqlite,
    list_registry_logs_for_control_mysql, list_registry_logs_for_control_sqlite,
    list_registry_logs_mysql, list_registry_logs_sqlite, sum_hours_for_control_mysql,
    sum_hours_for_control_sqlite,
};
pub use weeks::{
    find_week_control_mysql, find_week_control_sqlite, get_week_control_mysql,
    get_week_control_sqlite, latest_week_control_mysql, latest_week_control_sqlite,
    list_open_week_controls_mysql, list_open_week_controls_sqlite, list_week_controls_mysql,
    list_week_controls_sqlite,
};
