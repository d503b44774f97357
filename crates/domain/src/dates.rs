// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Day codes, week codes and calendar weeks.
//!
//! The engine compares dates as integer day codes (`YYYYMMDD`). Control weeks
//! are ISO 8601 weeks, identified by a week code (`YYYYWW`, ISO week-numbering
//! year) and spanning Monday through Sunday.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, Weekday};

/// A calendar day encoded as `YYYYMMDD`.
///
/// Ordering of day codes matches chronological ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct DayCode(i32);

impl DayCode {
    /// Creates a day code from its raw integer form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDayCode` if the value is not a real calendar day.
    pub fn new(code: i32) -> Result<Self, DomainError> {
        let candidate: Self = Self(code);
        candidate.to_date()?;
        Ok(candidate)
    }

    /// Encodes a date.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self(date.year() * 10_000 + i32::from(u8::from(date.month())) * 100 + i32::from(date.day()))
    }

    /// Returns the raw `YYYYMMDD` value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Decodes this day code into a date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDayCode` if the code does not name a real day.
    pub fn to_date(self) -> Result<Date, DomainError> {
        let year: i32 = self.0 / 10_000;
        let month_number: i32 = (self.0 / 100) % 100;
        let day: i32 = self.0 % 100;

        let month: Month = u8::try_from(month_number)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(DomainError::InvalidDayCode(self.0))?;
        let day: u8 = u8::try_from(day).map_err(|_| DomainError::InvalidDayCode(self.0))?;

        Date::from_calendar_date(year, month, day).map_err(|_| DomainError::InvalidDayCode(self.0))
    }
}

impl TryFrom<i32> for DayCode {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayCode> for i32 {
    fn from(code: DayCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for DayCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

/// An ISO 8601 week encoded as `YYYYWW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct WeekCode(i32);

impl WeekCode {
    /// Creates a week code from its raw integer form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeekCode` if the ISO year has no such week.
    pub fn new(code: i32) -> Result<Self, DomainError> {
        let candidate: Self = Self(code);
        candidate.monday()?;
        Ok(candidate)
    }

    /// Returns the week containing `date`.
    #[must_use]
    pub fn containing(date: Date) -> Self {
        let (iso_year, week, _) = date.to_iso_week_date();
        Self(iso_year * 100 + i32::from(week))
    }

    /// Returns the raw `YYYYWW` value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    fn monday(self) -> Result<Date, DomainError> {
        let iso_year: i32 = self.0 / 100;
        let week: u8 = u8::try_from(self.0 % 100).map_err(|_| DomainError::InvalidWeekCode(self.0))?;
        Date::from_iso_week_date(iso_year, week, Weekday::Monday)
            .map_err(|_| DomainError::InvalidWeekCode(self.0))
    }

    /// Resolves the calendar boundaries of this week.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is invalid or the week lies at the edge of
    /// the representable date range.
    pub fn calendar_week(self) -> Result<CalendarWeek, DomainError> {
        let start: Date = self.monday()?;
        let end: Date = start.checked_add(Duration::days(6)).ok_or_else(|| {
            DomainError::DateArithmeticOverflow {
                operation: format!("computing the end of week {self}"),
            }
        })?;
        Ok(CalendarWeek {
            code: self,
            start,
            end,
        })
    }

    /// Returns the week immediately following this one.
    ///
    /// # Errors
    ///
    /// Returns an error on date overflow.
    pub fn next(self) -> Result<Self, DomainError> {
        self.calendar_week()?.next_code()
    }
}

impl TryFrom<i32> for WeekCode {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekCode> for i32 {
    fn from(code: WeekCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for WeekCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A resolved calendar week: Monday through Sunday, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWeek {
    code: WeekCode,
    start: Date,
    end: Date,
}

impl CalendarWeek {
    #[must_use]
    pub const fn code(&self) -> WeekCode {
        self.code
    }

    /// First day (Monday).
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last day (Sunday).
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates the seven days of the week in order.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        (0..7_i64).filter_map(|offset| self.start.checked_add(Duration::days(offset)))
    }

    /// Returns the code of the following week.
    ///
    /// # Errors
    ///
    /// Returns an error on date overflow.
    pub fn next_code(&self) -> Result<WeekCode, DomainError> {
        let next_monday: Date = self.end.next_day().ok_or_else(|| {
            DomainError::DateArithmeticOverflow {
                operation: format!("advancing past week {}", self.code),
            }
        })?;
        Ok(WeekCode::containing(next_monday))
    }
}
