// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hourledger::{CloseBlocker, ClosePolicy, CoreError};
use hourledger_domain::{AllocationKey, DomainError, EarlyCloseRequest, WeekCode};

use super::{Fixture, after_week, config, entry, hours, mid_week, setup};
use crate::{ApprovalOutcome, PersistenceError};

fn file_request(fx: &mut Fixture) -> EarlyCloseRequest {
    fx.persistence
        .request_early_close(fx.control.week_control_id, "Travelling Thursday", mid_week())
        .unwrap()
}

#[test]
fn test_request_early_close() {
    let mut fx: Fixture = setup();
    assert!(!fx.persistence.is_early_close_taken(fx.control.week_control_id).unwrap());

    let request: EarlyCloseRequest = file_request(&mut fx);

    assert_eq!(request.week_control_id, fx.control.week_control_id);
    assert_eq!(request.message, "Travelling Thursday");
    assert_eq!(request.submitted_at, mid_week());
    assert!(fx.persistence.is_early_close_taken(fx.control.week_control_id).unwrap());
    assert_eq!(
        fx.persistence.list_pending_early_close_requests().unwrap(),
        vec![request]
    );
}

#[test]
fn test_second_request_is_rejected() {
    let mut fx: Fixture = setup();
    file_request(&mut fx);

    let result = fx.persistence.request_early_close(
        fx.control.week_control_id,
        "Again",
        mid_week(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::DomainViolation(
            DomainError::EarlyCloseAlreadyRequested {
                week_control_id: fx.control.week_control_id,
            }
        )))
    );
}

#[test]
fn test_blank_request_message_is_rejected() {
    let mut fx: Fixture = setup();

    let result = fx
        .persistence
        .request_early_close(fx.control.week_control_id, "   ", mid_week());

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::DomainViolation(
            DomainError::EmptyJustification
        )))
    );
    assert!(!fx.persistence.is_early_close_taken(fx.control.week_control_id).unwrap());
}

#[test]
fn test_approval_closes_week_mid_week() {
    let mut fx: Fixture = setup();
    fx.assign_full_week(9.0);
    let key: AllocationKey = fx.key();
    fx.persistence
        .create_registry(fx.control.week_control_id, key, hours(18.0))
        .unwrap();
    let request: EarlyCloseRequest = file_request(&mut fx);
    let approver = fx.supervisor();

    let outcome = fx
        .persistence
        .approve_early_close(request.request_id, &approver, true, &config(), mid_week())
        .unwrap();

    let ApprovalOutcome::Closed(closed) = outcome else {
        panic!("expected the week to close");
    };
    assert!(closed.closed.is_closed());
    assert!(!closed.validation.time_completed);
    assert!(!closed.validation.week_completed);
    assert_eq!(closed.next_week.unwrap().week, WeekCode::new(202_612).unwrap());
    assert!(fx.persistence.list_pending_early_close_requests().unwrap().is_empty());
}

#[test]
fn test_second_approval_finds_nothing() {
    let mut fx: Fixture = setup();
    let request: EarlyCloseRequest = file_request(&mut fx);
    let approver = fx.supervisor();

    fx.persistence
        .approve_early_close(request.request_id, &approver, true, &config(), mid_week())
        .unwrap();
    let second = fx.persistence.approve_early_close(
        request.request_id,
        &approver,
        true,
        &config(),
        mid_week(),
    );

    assert!(matches!(second, Err(PersistenceError::NotFound { .. })));
    assert_eq!(fx.persistence.list_week_controls(fx.person_id).unwrap().len(), 2);
}

#[test]
fn test_approval_refused_when_assignment_overflowed() {
    let mut fx: Fixture = setup();
    fx.assign_full_week(1.0);
    let key: AllocationKey = fx.key();
    fx.persistence
        .create_registry(fx.control.week_control_id, key, hours(8.0))
        .unwrap();
    let request: EarlyCloseRequest = file_request(&mut fx);
    let approver = fx.supervisor();

    let result = fx.persistence.approve_early_close(
        request.request_id,
        &approver,
        true,
        &config(),
        mid_week(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::CloseRejected {
            week_control_id: fx.control.week_control_id,
            blockers: vec![CloseBlocker::AssignationOverflowed],
        }))
    );
    assert!(fx.persistence.is_early_close_taken(fx.control.week_control_id).unwrap());
    assert!(!fx
        .persistence
        .get_week_control(fx.control.week_control_id)
        .unwrap()
        .unwrap()
        .is_closed());
}

#[test]
fn test_approval_of_already_closed_week_discards_request() {
    let mut fx: Fixture = setup();
    fx.assign_full_week(9.0);
    let key: AllocationKey = fx.key();
    let request: EarlyCloseRequest = file_request(&mut fx);
    let approver = fx.supervisor();

    fx.persistence
        .close_week(
            fx.control.week_control_id,
            &[entry(key, 45.0)],
            &approver,
            ClosePolicy::Regular,
            false,
            &config(),
            after_week(),
        )
        .unwrap();

    let outcome = fx
        .persistence
        .approve_early_close(request.request_id, &approver, true, &config(), after_week())
        .unwrap();

    assert!(matches!(outcome, ApprovalOutcome::AlreadyClosed(control) if control.is_closed()));
    assert!(fx.persistence.list_pending_early_close_requests().unwrap().is_empty());
    assert_eq!(fx.persistence.list_week_controls(fx.person_id).unwrap().len(), 1);
}

#[test]
fn test_request_on_closed_week_is_rejected() {
    let mut fx: Fixture = setup();
    let request: EarlyCloseRequest = file_request(&mut fx);
    let approver = fx.supervisor();
    fx.persistence
        .approve_early_close(request.request_id, &approver, false, &config(), mid_week())
        .unwrap();

    let result = fx.persistence.request_early_close(
        fx.control.week_control_id,
        "Once more",
        mid_week(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::Rejected(CoreError::DomainViolation(
            DomainError::WeekAlreadyClosed {
                week_control_id: fx.control.week_control_id,
            }
        )))
    );
}

#[test]
fn test_reject_early_close() {
    let mut fx: Fixture = setup();
    let request: EarlyCloseRequest = file_request(&mut fx);

    let rejected: EarlyCloseRequest = fx.persistence.reject_early_close(request.request_id).unwrap();

    assert_eq!(rejected, request);
    assert!(!fx.persistence.is_early_close_taken(fx.control.week_control_id).unwrap());
    assert!(!fx
        .persistence
        .get_week_control(fx.control.week_control_id)
        .unwrap()
        .unwrap()
        .is_closed());
    assert!(matches!(
        fx.persistence.reject_early_close(request.request_id),
        Err(PersistenceError::NotFound { .. })
    ));
}
