// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Early-close requests: filed by a person, approved or rejected by a
//! supervisor. A request is deleted once acted upon.

use hourledger::{ClosePolicy, EngineConfig, ensure_early_close_allowed};
use hourledger_audit::{Actor, Justification};
use hourledger_domain::{EarlyCloseRequest, WeekControl};
use time::OffsetDateTime;
use tracing::info;

use super::weeks::{CloseOutcome, close_week};
use super::{require_early_close_request, require_week_control};
use crate::error::PersistenceError;
use crate::store::LedgerStore;

/// What approving a request did.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// The week was closed under the early policy.
    Closed(CloseOutcome),
    /// The week had been closed by other means; the request was discarded.
    AlreadyClosed(WeekControl),
}

/// Files a request to close `week_control_id` ahead of schedule.
///
/// # Errors
///
/// Returns an error if the control is missing or closed, a request is
/// already pending for it, or `message` is blank.
pub fn request_early_close<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
    message: &str,
    now: OffsetDateTime,
) -> Result<EarlyCloseRequest, PersistenceError> {
    let control: WeekControl = require_week_control(conn, week_control_id)?;
    let taken: bool = conn.find_early_close_for_control(week_control_id)?.is_some();
    ensure_early_close_allowed(&control, taken)?;
    let message: Justification = Justification::new(message)?;

    let request_id: i64 =
        conn.insert_early_close_request(week_control_id, message.as_str(), now)?;

    Ok(EarlyCloseRequest {
        request_id,
        week_control_id,
        message: message.as_str().to_string(),
        submitted_at: now,
    })
}

/// Whether a request is already pending for the control week.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown control.
pub fn is_early_close_taken<C: LedgerStore>(
    conn: &mut C,
    week_control_id: i64,
) -> Result<bool, PersistenceError> {
    require_week_control(conn, week_control_id)?;
    Ok(conn.find_early_close_for_control(week_control_id)?.is_some())
}

/// Approves a request: closes its week under the early policy and deletes
/// the request.
///
/// A week that is already closed is left alone and the request discarded.
/// A second approval of the same request finds nothing and fails with
/// `NotFound`, so approval never rolls over twice.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown request, or the
/// close rejection when the week's assignments are overflowed.
pub fn approve_early_close<C: LedgerStore>(
    conn: &mut C,
    request_id: i64,
    approver: &Actor,
    open_next_week: bool,
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<ApprovalOutcome, PersistenceError> {
    let request: EarlyCloseRequest = require_early_close_request(conn, request_id)?;
    let control: WeekControl = require_week_control(conn, request.week_control_id)?;

    if control.is_closed() {
        conn.delete_early_close_request(request_id)?;
        info!(
            request_id,
            week_control_id = control.week_control_id,
            "Early close request discarded, week already closed"
        );
        return Ok(ApprovalOutcome::AlreadyClosed(control));
    }

    let outcome: CloseOutcome = close_week(
        conn,
        control.week_control_id,
        &[],
        approver,
        ClosePolicy::EarlyApproved,
        open_next_week,
        config,
        now,
    )?;
    conn.delete_early_close_request(request_id)?;
    info!(
        request_id,
        week_control_id = control.week_control_id,
        approver = approver.person_id,
        "Early close approved"
    );

    Ok(ApprovalOutcome::Closed(outcome))
}

/// Rejects a request by deleting it. Nothing else changes.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown request.
pub fn reject_early_close<C: LedgerStore>(
    conn: &mut C,
    request_id: i64,
) -> Result<EarlyCloseRequest, PersistenceError> {
    let request: EarlyCloseRequest = require_early_close_request(conn, request_id)?;
    conn.delete_early_close_request(request_id)?;
    info!(request_id, week_control_id = request.week_control_id, "Early close rejected");
    Ok(request)
}
