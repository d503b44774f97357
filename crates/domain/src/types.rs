// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dates::{DayCode, WeekCode};
use crate::hours::Hours;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A project commissioned by a client. Owns budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub name: String,
}

/// An employee who logs time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: i64,
    pub display_name: String,
}

/// A role hours are planned and logged under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i64,
    pub name: String,
}

/// The (budget, role) pair hours are reconciled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AllocationKey {
    pub budget_id: i64,
    pub role_id: i64,
}

impl AllocationKey {
    #[must_use]
    pub const fn new(budget_id: i64, role_id: i64) -> Self {
        Self { budget_id, role_id }
    }
}

impl std::fmt::Display for AllocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "budget {} / role {}", self.budget_id, self.role_id)
    }
}

/// Planned hours for one person on one day against a budget and role.
///
/// Unique on `(person_id, budget_id, role_id, day)`. `week` is the ISO week
/// containing `day`, stored alongside it for week-scoped lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: i64,
    pub person_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    pub week: WeekCode,
    pub day: DayCode,
    pub hours: Hours,
}

impl Assignment {
    #[must_use]
    pub const fn key(&self) -> AllocationKey {
        AllocationKey::new(self.budget_id, self.role_id)
    }
}

/// Logged hours within a control week for one budget and role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub registry_id: i64,
    pub week_control_id: i64,
    pub budget_id: i64,
    pub role_id: i64,
    pub hours: Hours,
}

impl Registry {
    #[must_use]
    pub const fn key(&self) -> AllocationKey {
        AllocationKey::new(self.budget_id, self.role_id)
    }
}

/// Hours a person submits for a (budget, role) pair before they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub budget_id: i64,
    pub role_id: i64,
    pub hours: Hours,
}

impl PendingEntry {
    #[must_use]
    pub const fn new(budget_id: i64, role_id: i64, hours: Hours) -> Self {
        Self {
            budget_id,
            role_id,
            hours,
        }
    }

    #[must_use]
    pub const fn key(&self) -> AllocationKey {
        AllocationKey::new(self.budget_id, self.role_id)
    }
}

impl From<&Registry> for PendingEntry {
    fn from(registry: &Registry) -> Self {
        Self::new(registry.budget_id, registry.role_id, registry.hours)
    }
}

/// An employee's ask to close their current week ahead of schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyCloseRequest {
    pub request_id: i64,
    pub week_control_id: i64,
    pub message: String,
    pub submitted_at: OffsetDateTime,
}
