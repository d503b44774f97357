// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::eyre};
use hourledger::EngineConfig;
use hourledger_api::{
    ApproveEarlyCloseRequest, CloseWeekRequest, CreateBudgetRequest, CreateNewWeekRequest,
    CreateRegistryRequest, RegistryEntryInput, RequestEarlyCloseRequest, SetBudgetOpenRequest,
    UpdateRegistryRequest, UpsertAssignmentRequest, ValidateWeekRequest,
};
use hourledger_domain::Hours;
use hourledger_persistence::Persistence;
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;
use tracing::info;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Hour Ledger - weekly time control and budget reconciliation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long, global = true)]
    mysql_url: Option<String>,

    /// Hours expected per working day.
    #[arg(long, global = true, default_value_t = hourledger_domain::DEFAULT_DAILY_QUOTA_HOURS)]
    daily_quota: f64,

    /// How many weeks rollover may skip looking for a working day.
    #[arg(long, global = true, default_value_t = hourledger::DEFAULT_MAX_ROLLOVER_WEEKS)]
    max_rollover_weeks: u32,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a project
    CreateProject { name: String },
    /// Create a person
    CreatePerson { display_name: String },
    /// Create a role
    CreateRole { name: String },
    /// Declare a holiday (day code YYYYMMDD)
    AddHoliday { day_code: i32, description: String },
    /// Withdraw a holiday
    RemoveHoliday { day_code: i32 },
    /// List declared holidays
    ListHolidays,

    /// Create a budget for a project
    CreateBudget {
        project_id: i64,
        name: String,
        /// Create the budget closed
        #[arg(long)]
        closed: bool,
    },
    /// Open or close a budget
    SetBudgetOpen {
        budget_id: i64,
        #[arg(action = clap::ArgAction::Set)]
        open: bool,
    },
    /// Whether a project currently has an open budget
    IsProjectOpen { project_id: i64 },
    /// List the budgets of a project
    ListBudgets { project_id: i64 },
    /// Delete an unreferenced budget
    DeleteBudget { budget_id: i64 },

    /// Add planned hours for a day (adds to an existing row)
    UpsertAssignment {
        person_id: i64,
        budget_id: i64,
        role_id: i64,
        week_code: i32,
        day_code: i32,
        hours: f64,
    },
    /// Replace the hours of an assignment
    UpdateAssignment { assignment_id: i64, hours: f64 },
    /// Delete an assignment and its orphaned registry row
    DeleteAssignment { assignment_id: i64 },
    /// List a person's assignments for a week
    ListAssignments { person_id: i64, week_code: i32 },
    /// List assignments of a budget in open weeks
    OpenAssignments { budget_id: i64 },

    /// Record executed hours for a (budget, role) pair
    CreateRegistry {
        week_control_id: i64,
        #[arg(value_parser = parse_entry)]
        entry: RegistryEntryInput,
    },
    /// Change executed hours with a justification
    UpdateRegistry {
        registry_id: i64,
        hours: f64,
        #[arg(long)]
        actor: i64,
        #[arg(long)]
        justification: String,
    },
    /// Delete a registry row
    DeleteRegistry { registry_id: i64 },
    /// Show the registry of a control week
    WeekRegistry { week_control_id: i64 },
    /// Show the change log of a registry row
    RegistryLogs { registry_id: i64 },
    /// Remove registry rows of a week, optionally filtered
    ClearRegistry {
        week_control_id: i64,
        #[arg(long)]
        budget: Option<i64>,
        #[arg(long)]
        role: Option<i64>,
    },
    /// Remove every registry row of an open week
    ResetWeek { week_control_id: i64 },

    /// Open a person's first control week
    OpenFirstWeek { person_id: i64, week_code: i32 },
    /// Open the week after a recorded one
    CreateNewWeek {
        person_id: i64,
        previous_week_code: i32,
    },
    /// Validate entries against a week without writing
    ValidateWeek {
        person_id: i64,
        week_code: i32,
        /// budget:role:hours, repeatable
        #[arg(long = "entry", value_parser = parse_entry)]
        entries: Vec<RegistryEntryInput>,
    },
    /// Submit entries and close a week
    CloseWeek {
        week_control_id: i64,
        #[arg(long)]
        actor: i64,
        /// budget:role:hours, repeatable
        #[arg(long = "entry", value_parser = parse_entry)]
        entries: Vec<RegistryEntryInput>,
        /// Do not open the next working week
        #[arg(long)]
        no_rollover: bool,
    },
    /// Show a person's open week
    OpenWeek { person_id: i64 },
    /// First day of the week a person can plan for
    AvailableWeek { person_id: i64 },
    /// List a person's control weeks
    ListWeeks { person_id: i64 },
    /// Delete an unreferenced control week
    DeleteWeek { week_control_id: i64 },

    /// Ask to close a week before it ends
    RequestEarlyClose {
        week_control_id: i64,
        message: String,
    },
    /// Whether a week already has an early close request
    EarlyCloseTaken { week_control_id: i64 },
    /// List pending early close requests
    PendingEarlyClose,
    /// Approve an early close request
    ApproveEarlyClose {
        request_id: i64,
        #[arg(long)]
        approver: i64,
        /// Do not open the next working week
        #[arg(long)]
        no_rollover: bool,
    },
    /// Reject an early close request
    RejectEarlyClose { request_id: i64 },

    /// Scan for cross-row invariant breaches. Exits non-zero when any are found.
    Check,
}

/// Parse `budget:role:hours`.
fn parse_entry(raw: &str) -> Result<RegistryEntryInput, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [budget, role, hours] = parts.as_slice() else {
        return Err(format!("expected budget:role:hours, got '{raw}'"));
    };
    Ok(RegistryEntryInput {
        budget_id: budget
            .parse()
            .map_err(|e| format!("invalid budget id '{budget}': {e}"))?,
        role_id: role
            .parse()
            .map_err(|e| format!("invalid role id '{role}': {e}"))?,
        hours: hours
            .parse()
            .map_err(|e| format!("invalid hours '{hours}': {e}"))?,
    })
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_persistence(args: &Args) -> Result<Persistence> {
    let persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL database");
        Persistence::new_with_mysql(url)?
    } else if let Some(path) = &args.database {
        info!("Using file-based database at: {}", path);
        Persistence::new_with_file(path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

#[allow(clippy::too_many_lines)]
fn run(command: Command, persistence: &mut Persistence, config: &EngineConfig) -> Result<()> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();

    match command {
        Command::CreateProject { name } => {
            let id = hourledger_api::create_project(persistence, &name)?;
            print(&json!({ "project_id": id }))
        }
        Command::CreatePerson { display_name } => {
            let id = hourledger_api::create_person(persistence, &display_name)?;
            print(&json!({ "person_id": id }))
        }
        Command::CreateRole { name } => {
            let id = hourledger_api::create_role(persistence, &name)?;
            print(&json!({ "role_id": id }))
        }
        Command::AddHoliday {
            day_code,
            description,
        } => {
            hourledger_api::add_holiday(persistence, day_code, &description)?;
            print(&json!({ "day_code": day_code, "description": description }))
        }
        Command::RemoveHoliday { day_code } => {
            let removed = hourledger_api::remove_holiday(persistence, day_code)?;
            print(&json!({ "day_code": day_code, "removed": removed }))
        }
        Command::ListHolidays => print(&hourledger_api::list_holidays(persistence)?),

        Command::CreateBudget {
            project_id,
            name,
            closed,
        } => print(&hourledger_api::create_budget(
            persistence,
            &CreateBudgetRequest {
                project_id,
                name,
                open: !closed,
            },
        )?),
        Command::SetBudgetOpen { budget_id, open } => print(&hourledger_api::set_budget_open(
            persistence,
            &SetBudgetOpenRequest { budget_id, open },
        )?),
        Command::IsProjectOpen { project_id } => {
            print(&hourledger_api::is_project_open(persistence, project_id)?)
        }
        Command::ListBudgets { project_id } => {
            print(&hourledger_api::list_budgets(persistence, project_id)?)
        }
        Command::DeleteBudget { budget_id } => {
            hourledger_api::delete_budget(persistence, budget_id)?;
            print(&json!({ "deleted_budget_id": budget_id }))
        }

        Command::UpsertAssignment {
            person_id,
            budget_id,
            role_id,
            week_code,
            day_code,
            hours,
        } => print(&hourledger_api::upsert_assignment(
            persistence,
            &UpsertAssignmentRequest {
                person_id,
                budget_id,
                role_id,
                week_code,
                day_code,
                hours,
            },
        )?),
        Command::UpdateAssignment {
            assignment_id,
            hours,
        } => print(&hourledger_api::update_assignment_hours(
            persistence,
            assignment_id,
            hours,
        )?),
        Command::DeleteAssignment { assignment_id } => {
            hourledger_api::delete_assignment(persistence, assignment_id)?;
            print(&json!({ "deleted_assignment_id": assignment_id }))
        }
        Command::ListAssignments {
            person_id,
            week_code,
        } => print(&hourledger_api::list_assignments_for_week(
            persistence,
            person_id,
            week_code,
        )?),
        Command::OpenAssignments { budget_id } => print(
            &hourledger_api::find_open_assignments_by_budget(persistence, budget_id)?,
        ),

        Command::CreateRegistry {
            week_control_id,
            entry,
        } => print(&hourledger_api::create_registry(
            persistence,
            &CreateRegistryRequest {
                week_control_id,
                entry,
            },
        )?),
        Command::UpdateRegistry {
            registry_id,
            hours,
            actor,
            justification,
        } => print(&hourledger_api::update_registry(
            persistence,
            &UpdateRegistryRequest {
                registry_id,
                hours,
                actor_person_id: actor,
                justification,
            },
            now,
        )?),
        Command::DeleteRegistry { registry_id } => {
            hourledger_api::delete_registry(persistence, registry_id)?;
            print(&json!({ "deleted_registry_id": registry_id }))
        }
        Command::WeekRegistry { week_control_id } => print(&hourledger_api::get_week_registry(
            persistence,
            week_control_id,
        )?),
        Command::RegistryLogs { registry_id } => {
            print(&hourledger_api::list_registry_logs(persistence, registry_id)?)
        }
        Command::ClearRegistry {
            week_control_id,
            budget,
            role,
        } => print(&hourledger_api::clear_registry(
            persistence,
            week_control_id,
            budget,
            role,
        )?),
        Command::ResetWeek { week_control_id } => {
            print(&hourledger_api::reset_week(persistence, week_control_id)?)
        }

        Command::OpenFirstWeek {
            person_id,
            week_code,
        } => print(&hourledger_api::open_first_week(
            persistence,
            person_id,
            week_code,
        )?),
        Command::CreateNewWeek {
            person_id,
            previous_week_code,
        } => print(&hourledger_api::create_new_week(
            persistence,
            &CreateNewWeekRequest {
                person_id,
                previous_week_code,
            },
            config,
            now,
        )?),
        Command::ValidateWeek {
            person_id,
            week_code,
            entries,
        } => print(&hourledger_api::validate_week(
            persistence,
            &ValidateWeekRequest {
                person_id,
                week_code,
                entries,
            },
            config,
            now.date(),
        )?),
        Command::CloseWeek {
            week_control_id,
            actor,
            entries,
            no_rollover,
        } => print(&hourledger_api::close_week(
            persistence,
            &CloseWeekRequest {
                week_control_id,
                entries,
                actor_person_id: actor,
                open_next_week: !no_rollover,
            },
            config,
            now,
        )?),
        Command::OpenWeek { person_id } => {
            print(&hourledger_api::find_open_week(persistence, person_id)?)
        }
        Command::AvailableWeek { person_id } => print(
            &hourledger_api::get_available_week_start(persistence, person_id)?,
        ),
        Command::ListWeeks { person_id } => {
            print(&hourledger_api::list_week_controls(persistence, person_id)?)
        }
        Command::DeleteWeek { week_control_id } => {
            hourledger_api::delete_week_control(persistence, week_control_id)?;
            print(&json!({ "deleted_week_control_id": week_control_id }))
        }

        Command::RequestEarlyClose {
            week_control_id,
            message,
        } => print(&hourledger_api::request_early_close(
            persistence,
            &RequestEarlyCloseRequest {
                week_control_id,
                message,
            },
            now,
        )?),
        Command::EarlyCloseTaken { week_control_id } => {
            let taken = hourledger_api::is_early_close_taken(persistence, week_control_id)?;
            print(&json!({ "week_control_id": week_control_id, "taken": taken }))
        }
        Command::PendingEarlyClose => {
            print(&hourledger_api::list_pending_early_close_requests(persistence)?)
        }
        Command::ApproveEarlyClose {
            request_id,
            approver,
            no_rollover,
        } => print(&hourledger_api::approve_early_close(
            persistence,
            &ApproveEarlyCloseRequest {
                request_id,
                approver_person_id: approver,
                open_next_week: !no_rollover,
            },
            config,
            now,
        )?),
        Command::RejectEarlyClose { request_id } => {
            print(&hourledger_api::reject_early_close(persistence, request_id)?)
        }

        Command::Check => {
            let report = hourledger_api::consistency_check(persistence)?;
            print(&report)?;
            if report.consistent {
                Ok(())
            } else {
                Err(eyre!("ledger invariants are breached"))
            }
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.verbosity.log_level_filter().as_trace().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config: EngineConfig =
        EngineConfig::new(Hours::new(args.daily_quota)?, args.max_rollover_weeks);
    let mut persistence: Persistence = open_persistence(&args)?;

    run(args.command, &mut persistence, &config)
}
