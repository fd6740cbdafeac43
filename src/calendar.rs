//! Calendar primitives: the weekly hours template, request scopes and month arithmetic.
//! 
//! MIT License
//! 
//! Copyright (c) 2026 66f94eae
//! 
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//! 
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//! 
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{Error, Result};

/// Display format for holiday and pre-holiday dates (dd.mm.yy)
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%y";

/// Upper bound accepted for a single weekday when parsing user input
const MAX_DAILY_HOURS: f64 = 24.0;
/// Smallest weekly total accepted when parsing user input
const MIN_WEEKLY_HOURS: f64 = 5.0;

/// Weekly totals at or above this make the workweek intensive
const INTENSIVE_WEEKLY_HOURS: f64 = 40.0;
/// A weekday with at least this many hours counts as a long day
const LONG_DAY_HOURS: f64 = 8.0;
/// Number of long days that make the workweek intensive
const INTENSIVE_LONG_DAYS: usize = 2;

/// Normative hours for each weekday, Monday first.
///
/// A weekday with zero hours is a weekend day regardless of holidays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyHours([f64; 7]);

impl WeeklyHours {
    /// Classic five-day, forty-hour week
    pub const FIVE_DAY: WeeklyHours = WeeklyHours([8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0]);

    pub const fn new(hours: [f64; 7]) -> Self {
        Self(hours)
    }

    /// Builds a template from a possibly short list of values.
    ///
    /// Missing weekdays get zero hours, values past Sunday are ignored.
    /// Values that are not positive finite numbers become zero.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut hours = [0.0; 7];
        for (slot, value) in hours.iter_mut().zip(values) {
            *slot = non_negative(*value);
        }
        Self(hours)
    }

    /// Builds a template from user supplied values, rejecting anything
    /// that is not a number in `0..=24`, more than seven entries, or a
    /// week of less than 5 hours.
    pub fn try_from_values(values: &[f64], source: &str) -> Result<Self> {
        let invalid = |reason: String| Error::WeeklyHours {
            value: source.to_string(),
            reason,
        };

        if values.len() > 7 {
            return Err(invalid(format!("expected at most 7 values, got {}", values.len())));
        }
        if let Some(bad) = values
            .iter()
            .find(|h| !h.is_finite() || **h < 0.0 || **h > MAX_DAILY_HOURS)
        {
            return Err(invalid(format!("{bad} is outside 0-24")));
        }

        let hours = Self::from_slice(values);
        if hours.total() < MIN_WEEKLY_HOURS {
            return Err(invalid(format!(
                "weekly total {} is below {MIN_WEEKLY_HOURS}",
                hours.total()
            )));
        }
        Ok(hours)
    }

    /// Hours worked on the given weekday; zero unless a positive finite number
    pub fn hours(&self, weekday: Weekday) -> f64 {
        non_negative(self.0[weekday.num_days_from_monday() as usize])
    }

    /// Hours worked on the weekday of `date`
    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        self.hours(date.weekday())
    }

    pub fn is_working(&self, weekday: Weekday) -> bool {
        self.hours(weekday) > 0.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().copied().map(non_negative).sum()
    }

    /// Whether pre-holiday days are shortened under this template.
    ///
    /// True when the week has at least 40 hours, or at least two weekdays
    /// of 8 hours or more.
    pub fn is_intensive(&self) -> bool {
        let long_days = self.0.iter().filter(|h| non_negative(**h) >= LONG_DAY_HOURS).count();
        long_days >= INTENSIVE_LONG_DAYS || self.total() >= INTENSIVE_WEEKLY_HOURS
    }
}

/// NaN, infinities and values at or below zero count as a day off
fn non_negative(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 { hours } else { 0.0 }
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self::FIVE_DAY
    }
}

impl FromStr for WeeklyHours {
    type Err = Error;

    /// Parses a comma separated list such as `"8,8,8,8,7,0,0"`.
    /// Empty items count as zero, matching a blank input field.
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|item| {
                let item = item.trim();
                if item.is_empty() {
                    return Ok(0.0);
                }
                item.parse::<f64>().map_err(|_| Error::WeeklyHours {
                    value: s.to_string(),
                    reason: format!("'{item}' is not a number"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::try_from_values(&values, s)
    }
}

impl fmt::Display for WeeklyHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|h| h.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    fn number(self) -> u32 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    /// First month of the quarter (1-based)
    pub fn first_month(self) -> u32 {
        (self.number() - 1) * 3 + 1
    }
}

/// Which months of a year a calculation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Months 1 through 12
    FullYear,
    /// Three consecutive months
    Quarter(Quarter),
    /// One month, 1-based
    Month(u32),
}

impl Scope {
    /// Months covered by this scope, ascending
    pub fn months(&self) -> Vec<u32> {
        match self {
            Scope::FullYear => (1..=12).collect(),
            Scope::Quarter(q) => {
                let first = q.first_month();
                (first..first + 3).collect()
            }
            Scope::Month(m) => vec![*m],
        }
    }

    pub fn spans_multiple_months(&self) -> bool {
        !matches!(self, Scope::Month(_))
    }
}

impl FromStr for Scope {
    type Err = Error;

    /// Accepts `"0"` for the whole year, `"Q1"`..`"Q4"` and `"1"`..`"12"`.
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        let scope = match value {
            "0" => Scope::FullYear,
            "Q1" | "q1" => Scope::Quarter(Quarter::Q1),
            "Q2" | "q2" => Scope::Quarter(Quarter::Q2),
            "Q3" | "q3" => Scope::Quarter(Quarter::Q3),
            "Q4" | "q4" => Scope::Quarter(Quarter::Q4),
            _ => match value.parse::<u32>() {
                Ok(month @ 1..=12) => Scope::Month(month),
                _ => return Err(Error::Scope(s.to_string())),
            },
        };
        Ok(scope)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::FullYear => write!(f, "0"),
            Scope::Quarter(q) => write!(f, "Q{}", q.number()),
            Scope::Month(m) => write!(f, "{m}"),
        }
    }
}

/// First day of `month` in `year`, `None` for a month outside 1..=12
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Number of days in a month, leap-year aware
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Every date of a month in order; empty for an invalid month
pub fn month_days(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    first_of_month(year, month)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |d| d.year() == year && d.month() == month)
}

/// Formats a date the way holiday lists are displayed (dd.mm.yy)
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}
