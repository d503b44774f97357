// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Hours};

#[test]
fn test_hours_rejects_negative_and_non_finite() {
    assert!(matches!(Hours::new(-0.5), Err(DomainError::InvalidHours(_))));
    assert!(Hours::new(f64::NAN).is_err());
    assert!(Hours::new(f64::INFINITY).is_err());
    assert!(Hours::new(0.0).is_ok());
}

#[test]
fn test_hours_sum_and_times() {
    let total: Hours =
        Hours::checked_sum([1.5, 2.5, 4.0].into_iter().map(|h| Hours::new(h).unwrap())).unwrap();
    assert!((total.value() - 8.0).abs() < f64::EPSILON);

    let quota: Hours = Hours::new(9.0).unwrap().checked_times(5).unwrap();
    assert!((quota.value() - 45.0).abs() < f64::EPSILON);
}

#[test]
fn test_hours_arithmetic_never_yields_infinity() {
    let max: Hours = Hours::new(f64::MAX).unwrap();

    assert!(matches!(max.checked_add(max), Err(DomainError::InvalidHours(_))));
    assert!(matches!(
        Hours::checked_sum([max, Hours::ZERO, max]),
        Err(DomainError::InvalidHours(_))
    ));
    assert!(matches!(max.checked_times(2), Err(DomainError::InvalidHours(_))));
    assert_eq!(max.checked_add(Hours::ZERO), Ok(max));
}

#[test]
fn test_hours_deserialize_validates() {
    let ok: Hours = serde_json::from_str("7.5").unwrap();
    assert!((ok.value() - 7.5).abs() < f64::EPSILON);
    assert!(serde_json::from_str::<Hours>("-1").is_err());
}
