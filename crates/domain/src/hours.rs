// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default fixed daily quota used by the week completion check.
pub const DEFAULT_DAILY_QUOTA_HOURS: f64 = 9.0;

/// A non-negative, finite quantity of hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Hours(f64);

impl Hours {
    pub const ZERO: Self = Self(0.0);
    pub const DEFAULT_DAILY_QUOTA: Self = Self(DEFAULT_DAILY_QUOTA_HOURS);

    /// # Errors
    ///
    /// Returns `DomainError::InvalidHours` for negative, NaN or infinite values.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidHours(value.to_string()));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Adds two quantities.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHours` if the sum is not finite.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        Self::new(self.0 + rhs.0)
    }

    /// Sums quantities, failing on the first non-finite partial sum.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHours` if the total is not finite.
    pub fn checked_sum<I: IntoIterator<Item = Self>>(iter: I) -> Result<Self, DomainError> {
        iter.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }

    /// Multiplies by a day count.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHours` if the product is not finite.
    pub fn checked_times(self, count: u32) -> Result<Self, DomainError> {
        Self::new(self.0 * f64::from(count))
    }
}

impl TryFrom<f64> for Hours {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hours> for f64 {
    fn from(hours: Hours) -> Self {
        hours.0
    }
}

impl std::fmt::Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h", self.0)
    }
}
