// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! Each function here writes one table and performs no business checks.
//! Check-then-act sequences live in `ledger`, which runs them under the
//! write lock.
//!
//! ## Module Organization
//!
//! - `directory`: Seeding of projects, persons, roles and holidays
//! - `budgets`: Budget rows
//! - `assignments`: Assignment rows
//! - `registry`: Registry rows and change log entries
//! - `weeks`: Week control rows
//! - `early_close`: Early-close requests
//!
//! ## Backend-Specific Code
//!
//! Backend-specific helpers (e.g., `get_last_insert_rowid()`) are imported from
//! the `backend` module. All other code uses Diesel DSL exclusively.

pub mod assignments;
pub mod budgets;
pub mod directory;
pub mod early_close;
pub mod registry;
pub mod weeks;

pub use assignments::{
    delete_assignment_row_mysql, delete_assignment_row_sqlite, delete_assignments_for_week_mysql,
    delete_assignments_for_week_sqlite, insert_assignment_mysql, insert_assignment_sqlite,
    update_assignment_hours_mysql, update_assignment_hours_sqlite,
};
pub use budgets::{
    delete_budget_row_mysql, delete_budget_row_sqlite, insert_budget_mysql, insert_budget_sqlite,
    update_budget_status_mysql, update_budget_status_sqlite,
};
pub use directory::{
    delete_holiday_mysql, delete_holiday_sqlite, insert_holiday_mysql, insert_holiday_sqlite,
    insert_person_mysql, insert_person_sqlite, insert_project_mysql, insert_project_sqlite,
    insert_role_mysql, insert_role_sqlite,
};
pub use early_close::{
    delete_early_close_request_mysql, delete_early_close_request_sqlite,
    insert_early_close_request_mysql, insert_early_close_request_sqlite,
};
pub use registry::{
    clear_registry_mysql, clear_registry_sqlite, delete_registry_row_mysql,
    delete_registry_row_sqlite, insert_registry_log_mysql, insert_registry_log_sqlite,
    insert_registry_mysql, insert_registry_sqlite, update_registry_hours_mysql,
    update_registry_hours_sqlite,
};
pub use weeks::{
    close_week_control_mysql, close_week_control_sqlite, delete_week_control_row_mysql,
    delete_week_control_row_sqlite, insert_week_control_mysql, insert_week_control_sqlite,
};
