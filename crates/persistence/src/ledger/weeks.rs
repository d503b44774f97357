// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week-control state machine.
//!
//! A person normally has exactly one open control week. Closing it rolls
//! over to the next week with a working day, recording every skipped week
//! as already closed. The whole chain is written in the caller's
//! transaction, so a failed rollover leaves no partial chain behind.

use std::collections::BTreeMap;

use hourledger::{
    ClosePolicy, EngineConfig, RolloverPlan, authorize_close, close_transition,
    ensure_no_open_week, ensure_not_before_latest_week, plan_rollover, registry_change,
};
use hourledger_audit::{Actor, Justification};
use hourledger_domain::{
    AllocationKey, Assignment, CalendarWeek, DayCode, DomainError, HolidayCalendar, Hours,
    PendingEntry, Registry, ValidationResult, WeekCode, WeekControl, WeekControlState,
};
use num_traits::ToPrimitive;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use super::{load_calendar, require_budget, require_person, require_role, require_week_control};
use crate::error::PersistenceError;
use crate::store::LedgerStore;

/// Reason recorded when a close overwrites a previously logged value.
const CLOSE_SUBMISSION_REASON: &str = "submitted at week close";

/// Result of a successful close.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseOutcome {
    /// The control record, now closed.
    pub closed: WeekControl,
    /// The validation the close was authorized on.
    pub validation: ValidationResult,
    /// The newly opened week, when rollover was requested.
    pub next_week: Option<WeekControl>,
}

/// Opens the first control week of a person who has none open.
///
/// # Errors
///
/// Returns an error if the person is unknown, already has an open week,
/// already has a record for `week`, or has a control week later than `week`.
pub fn open_first_week<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
    week: WeekCode,
) -> Result<WeekControl, PersistenceError> {
    require_person(conn, person_id)?;
    let open: Vec<WeekControl> = conn.list_open_week_controls(person_id)?;
    ensure_no_open_week(person_id, open.first())?;
    let latest: Option<WeekControl> = conn.latest_week_control(person_id)?;
    ensure_not_before_latest_week(person_id, week, latest.as_ref())?;
    ensure_week_unrecorded(conn, person_id, week)?;

    let week_control_id: i64 = conn.insert_week_control(person_id, week, None)?;
    info!(week_control_id, person_id, %week, "First week opened");

    Ok(WeekControl {
        week_control_id,
        person_id,
        week,
        state: WeekControlState::Open,
    })
}

/// Rollover: opens the first week after `previous` that has a working day.
///
/// Each week scanned without a working day gets a control record closed at
/// `now`. Returns the new open week.
///
/// # Errors
///
/// Returns an error if the person is unknown or has an open week, `previous`
/// precedes the person's latest control week, a scanned week is already
/// recorded, or no working day is found within the configured horizon.
pub fn create_new_week<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
    previous: WeekCode,
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<WeekControl, PersistenceError> {
    require_person(conn, person_id)?;
    let open: Vec<WeekControl> = conn.list_open_week_controls(person_id)?;
    ensure_no_open_week(person_id, open.first())?;
    let latest: Option<WeekControl> = conn.latest_week_control(person_id)?;
    ensure_not_before_latest_week(person_id, previous, latest.as_ref())?;

    let calendar: HolidayCalendar = load_calendar(conn)?;
    let plan: RolloverPlan = plan_rollover(previous, &calendar, config.max_rollover_weeks)?;
    for week in plan.weeks() {
        ensure_week_unrecorded(conn, person_id, week)?;
    }

    for week in &plan.skipped {
        let week_control_id: i64 = conn.insert_week_control(person_id, *week, Some(now))?;
        debug!(week_control_id, person_id, %week, "Skipped week recorded as closed");
    }

    let week_control_id: i64 = conn.insert_week_control(person_id, plan.open, None)?;
    info!(
        week_control_id,
        person_id,
        %previous,
        week = %plan.open,
        skipped = plan.skipped.len(),
        "Week rolled over"
    );

    Ok(WeekControl {
        week_control_id,
        person_id,
        week: plan.open,
        state: WeekControlState::Open,
    })
}

/// Validate-then-close.
///
/// Submitted entries are summed per budget and role and written to the
/// registry; a changed value goes through the change log. The week is then
/// validated against all of its registry rows, closed if `policy` allows,
/// and rolled over when `open_next_week` is set. A rejected close writes
/// nothing, submitted entries included.
///
/// # Errors
///
/// Returns an error if the control is missing or already closed, an entry
/// references a missing row, the policy rejects the close, or rollover fails.
#[allow(clippy::too_many_arguments)]
pub fn close_week<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
    entries: &[PendingEntry],
    actor: &Actor,
    policy: ClosePolicy,
    open_next_week: bool,
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<CloseOutcome, PersistenceError> {
    let control: WeekControl = require_week_control(conn, week_control_id)?;
    close_transition(&control, now)?;

    submit_entries(conn, &control, entries, actor, now)?;

    let registered: Vec<Registry> = conn.list_registry_for_control(week_control_id)?;
    let pending: Vec<PendingEntry> = registered.iter().map(PendingEntry::from).collect();
    let validation: ValidationResult =
        validate_week(conn, control.person_id, control.week, &pending, config, now.date())?;

    let state: WeekControlState = authorize_close(&control, &validation, policy, now)?;
    conn.close_week_control(week_control_id, now)?;
    info!(
        week_control_id,
        person_id = control.person_id,
        week = %control.week,
        ?policy,
        executed = %validation.executed_total,
        "Week closed"
    );

    let next_week: Option<WeekControl> = if open_next_week {
        Some(create_new_week(
            conn,
            control.person_id,
            control.week,
            config,
            now,
        )?)
    } else {
        None
    };

    Ok(CloseOutcome {
        closed: WeekControl { state, ..control },
        validation,
        next_week,
    })
}

fn submit_entries<C: LedgerStore>(
    conn: &mut C,
    control: &WeekControl,
    entries: &[PendingEntry],
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let mut totals: BTreeMap<AllocationKey, Hours> = BTreeMap::new();
    for entry in entries {
        let total: &mut Hours = totals.entry(entry.key()).or_insert(Hours::ZERO);
        *total = total.checked_add(entry.hours)?;
    }

    for (key, hours) in totals {
        require_budget(conn, key.budget_id)?;
        require_role(conn, key.role_id)?;

        match conn.find_registry(control.week_control_id, key.budget_id, key.role_id)? {
            Some(existing) if existing.hours == hours => {}
            Some(existing) => {
                let change = registry_change(
                    control,
                    &existing,
                    hours,
                    actor.clone(),
                    Justification::new(CLOSE_SUBMISSION_REASON)?,
                )?;
                conn.update_registry_hours(existing.registry_id, hours)?;
                conn.insert_registry_log(&change, now)?;
            }
            None => {
                conn.insert_registry(control.week_control_id, key, hours)?;
            }
        }
    }
    Ok(())
}

/// Runs the week validator for a person against stored assignments and the
/// stored holiday calendar.
///
/// # Errors
///
/// Returns an error if the reads fail or an hour total is not finite.
pub fn validate_week<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
    week: WeekCode,
    entries: &[PendingEntry],
    config: &EngineConfig,
    today: Date,
) -> Result<ValidationResult, PersistenceError> {
    let calendar_week: CalendarWeek = week.calendar_week()?;
    let assignments: Vec<Assignment> = conn.list_assignments_for_week(person_id, week)?;
    let calendar: HolidayCalendar = load_calendar(conn)?;

    Ok(hourledger_domain::validate_week(
        person_id,
        &calendar_week,
        &assignments,
        entries,
        &calendar,
        config.daily_quota,
        today,
    )?)
}

/// The person's open week, if any.
///
/// With more than one open week the earliest is returned and a warning is
/// logged.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown person.
pub fn find_open_week<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
) -> Result<Option<WeekControl>, PersistenceError> {
    require_person(conn, person_id)?;
    let open: Vec<WeekControl> = conn.list_open_week_controls(person_id)?;
    if open.len() > 1 {
        warn!(person_id, open_weeks = open.len(), "Person has more than one open week");
    }
    Ok(open.into_iter().next())
}

/// First day of the week the person can currently log hours against.
///
/// That is the Monday of the open week. Without an open week it is the
/// Monday after the latest recorded week; without any record it is `None`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown person.
pub fn get_available_week_start<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
) -> Result<Option<DayCode>, PersistenceError> {
    if let Some(open) = find_open_week(conn, person_id)? {
        return Ok(Some(DayCode::from_date(open.week.calendar_week()?.start())));
    }

    match conn.latest_week_control(person_id)? {
        Some(latest) => {
            let next: WeekCode = latest.week.next()?;
            Ok(Some(DayCode::from_date(next.calendar_week()?.start())))
        }
        None => Ok(None),
    }
}

/// Administrative rollback of a wrongly created control week.
///
/// Deletes the person's assignments for that week and the record itself.
///
/// # Errors
///
/// Returns `PersistenceError::WeekControlReferenced` while registry rows or
/// early-close requests still point at the record.
pub fn delete_week_control<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
) -> Result<(), PersistenceError> {
    let control: WeekControl = require_week_control(conn, week_control_id)?;

    let registries: i64 = conn
        .list_registry_for_control(week_control_id)?
        .len()
        .to_i64()
        .ok_or_else(|| PersistenceError::DatabaseError("Count conversion failed".to_string()))?;
    let early_close_requests: i64 = conn.count_early_close_requests(week_control_id)?;
    if registries > 0 || early_close_requests > 0 {
        return Err(PersistenceError::WeekControlReferenced {
            week_control_id,
            registries,
            early_close_requests,
        });
    }

    let assignments: usize = conn.delete_assignments_for_week(control.person_id, control.week)?;
    conn.delete_week_control_row(week_control_id)?;
    warn!(
        week_control_id,
        person_id = control.person_id,
        week = %control.week,
        assignments,
        "Week control deleted"
    );
    Ok(())
}

fn ensure_week_unrecorded<C: LedgerStore>(
    conn: &mut C,
    person_id: i64,
    week: WeekCode,
) -> Result<(), PersistenceError> {
    if conn.find_week_control(person_id, week)?.is_some() {
        return Err(DomainError::WeekControlAlreadyExists { person_id, week }.into());
    }
    Ok(())
}
