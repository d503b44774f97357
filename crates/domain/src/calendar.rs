// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Working-day calendar.
//!
//! A working day is any Monday through Friday that is not a declared holiday.
//! The calendar answers point questions only; it never consults the clock.

use crate::dates::{CalendarWeek, DayCode};
use crate::error::DomainError;
use std::collections::BTreeSet;
use time::{Date, Weekday};

/// Upper bound on how far `add_working_days` will scan past the last hit.
///
/// Guards against calendars where every remaining day is a holiday.
const MAX_CONSECUTIVE_NON_WORKING_DAYS: u32 = 366;

/// Returns true for Saturday and Sunday.
#[must_use]
pub fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Working-day oracle consumed by rollover and validation.
pub trait Calendar {
    /// Returns true if `date` is a declared holiday.
    fn is_holiday(&self, date: Date) -> bool;

    /// Returns true if `date` is neither a weekend day nor a holiday.
    fn is_working_day(&self, date: Date) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }

    /// Counts the working days in a calendar week.
    fn working_days_in(&self, week: &CalendarWeek) -> u32 {
        let count: usize = week.days().filter(|d| self.is_working_day(*d)).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Advances `date` by `days` working days.
    ///
    /// The starting date itself is never counted; `days == 0` returns `date`
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the date range overflows or no working day is found
    /// within a year of the last one.
    fn add_working_days(&self, date: Date, days: u32) -> Result<Date, DomainError> {
        let mut current: Date = date;
        let mut remaining: u32 = days;
        let mut gap: u32 = 0;

        while remaining > 0 {
            current = current
                .next_day()
                .ok_or_else(|| DomainError::DateArithmeticOverflow {
                    operation: format!("adding {days} working days to {date}"),
                })?;

            if self.is_working_day(current) {
                remaining -= 1;
                gap = 0;
            } else {
                gap += 1;
                if gap > MAX_CONSECUTIVE_NON_WORKING_DAYS {
                    return Err(DomainError::NoWorkingDayFound {
                        after: DayCode::from_date(date),
                        scanned_days: gap,
                    });
                }
            }
        }

        Ok(current)
    }
}

/// A calendar backed by an explicit holiday set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    #[must_use]
    pub fn new<I: IntoIterator<Item = Date>>(holidays: I) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Builds a calendar from stored day codes.
    ///
    /// # Errors
    ///
    /// Returns an error if any day code is not a real date.
    pub fn from_day_codes<I: IntoIterator<Item = DayCode>>(codes: I) -> Result<Self, DomainError> {
        let holidays: BTreeSet<Date> = codes
            .into_iter()
            .map(DayCode::to_date)
            .collect::<Result<_, _>>()?;
        Ok(Self { holidays })
    }

    pub fn add_holiday(&mut self, date: Date) {
        self.holidays.insert(date);
    }

    #[must_use]
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl Calendar for HolidayCalendar {
    fn is_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }
}
