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
    clippy::all
)]

//! Audit vocabulary for registry edits.
//!
//! Every change to logged hours records who made it and why. Log entries are
//! append-only: there is no update or delete path for them anywhere in the
//! workspace.

use hourledger_domain::{DomainError, Hours};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The person performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting person's identifier.
    pub person_id: i64,
    /// Display name captured at the time of the action.
    pub name: String,
}

impl Actor {
    #[must_use]
    pub const fn new(person_id: i64, name: String) -> Self {
        Self { person_id, name }
    }
}

/// The free-text reason given for a change. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Justification(String);

impl Justification {
    /// Creates a justification, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyJustification` if nothing remains after trimming.
    pub fn new(reason: &str) -> Result<Self, DomainError> {
        let trimmed: &str = reason.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyJustification);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Justification {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Justification> for String {
    fn from(value: Justification) -> Self {
        value.0
    }
}

impl std::fmt::Display for Justification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The payload of one registry log entry: a single hours edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryChange {
    pub registry_id: i64,
    pub week_control_id: i64,
    pub actor: Actor,
    pub justification: Justification,
    pub previous_hours: Hours,
    pub new_hours: Hours,
}

impl RegistryChange {
    #[must_use]
    pub const fn new(
        registry_id: i64,
        week_control_id: i64,
        actor: Actor,
        justification: Justification,
        previous_hours: Hours,
        new_hours: Hours,
    ) -> Self {
        Self {
            registry_id,
            week_control_id,
            actor,
            justification,
            previous_hours,
            new_hours,
        }
    }

    /// Signed difference between the new and previous hours.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.new_hours.value() - self.previous_hours.value()
    }
}

/// A persisted registry log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryLogEntry {
    pub log_id: i64,
    pub change: RegistryChange,
    pub logged_at: OffsetDateTime,
}
