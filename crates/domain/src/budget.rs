// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Budget status.
//!
//! A project may hold many budgets but at most one of them may be open at a
//! time. The invariant is enforced by the ledger at every status flip, not
//! only at creation.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Open/closed state of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Open,
    Closed,
}

impl BudgetStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn from_open_flag(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }
}

impl FromStr for BudgetStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidBudgetStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cost/role allocation scoped to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub budget_id: i64,
    pub project_id: i64,
    pub name: String,
    pub status: BudgetStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in [BudgetStatus::Open, BudgetStatus::Closed] {
            assert_eq!(BudgetStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert_eq!(
            BudgetStatus::from_str("archived"),
            Err(DomainError::InvalidBudgetStatus(String::from("archived")))
        );
    }

    #[test]
    fn test_open_flag_mapping() {
        assert!(BudgetStatus::from_open_flag(true).is_open());
        assert!(!BudgetStatus::from_open_flag(false).is_open());
    }
}
