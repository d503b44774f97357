// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hourledger_domain::Hours;

/// Maximum number of weeks rollover scans by default.
///
/// One ISO year holds at most 53 weeks.
pub const DEFAULT_MAX_ROLLOVER_WEEKS: u32 = 53;

/// Tunables for validation and rollover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Hours expected per working day by the week completion check.
    pub daily_quota: Hours,
    /// How many weeks rollover scans before giving up.
    pub max_rollover_weeks: u32,
}

impl EngineConfig {
    #[must_use]
    pub const fn new(daily_quota: Hours, max_rollover_weeks: u32) -> Self {
        Self {
            daily_quota,
            max_rollover_weeks,
        }
    }

    #[must_use]
    pub const fn with_daily_quota(self, daily_quota: Hours) -> Self {
        Self {
            daily_quota,
            ..self
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_quota: Hours::DEFAULT_DAILY_QUOTA,
            max_rollover_weeks: DEFAULT_MAX_ROLLOVER_WEEKS,
        }
    }
}
