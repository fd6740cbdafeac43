//! Per-month results and cross-month totals.
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

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::calendar::{Scope, display_date};

/// Day tallies and normative hours of one month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// Days in the month
    pub calendar: u32,
    /// Raw holidays dated in this month
    pub holiday: u32,
    /// Dates behind `holiday`, ascending
    #[serde(serialize_with = "serialize_dates")]
    pub holiday_raw_dates: Vec<NaiveDate>,
    /// Days whose weekday has zero hours
    pub weekend: u32,
    /// Weekend days plus observed holidays
    pub non_working: u32,
    pub working: u32,
    /// Days shortened by one hour
    pub preholiday: u32,
    #[serde(serialize_with = "serialize_dates")]
    pub preholiday_dates: Vec<NaiveDate>,
    /// Normative working hours
    pub hours: f64,
}

impl MonthSummary {
    /// An empty tally for a month with `calendar` days
    pub fn new(calendar: u32) -> Self {
        Self {
            calendar,
            holiday: 0,
            holiday_raw_dates: Vec::new(),
            weekend: 0,
            non_working: 0,
            working: 0,
            preholiday: 0,
            preholiday_dates: Vec::new(),
            hours: 0.0,
        }
    }

    pub fn holiday_dates_display(&self) -> Vec<String> {
        self.holiday_raw_dates.iter().copied().map(display_date).collect()
    }

    pub fn preholiday_dates_display(&self) -> Vec<String> {
        self.preholiday_dates.iter().copied().map(display_date).collect()
    }
}

/// Numeric sums over every month of a [`Summary`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub calendar: u32,
    pub holiday: u32,
    pub weekend: u32,
    pub non_working: u32,
    pub working: u32,
    pub preholiday: u32,
    pub hours: f64,
}

/// Result of one calculation, keyed by 1-based month number
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub year: i32,
    #[serde(serialize_with = "serialize_scope")]
    pub scope: Scope,
    pub ignore_holidays: bool,
    pub months: BTreeMap<u32, MonthSummary>,
    pub totals: Totals,
}

impl Summary {
    pub fn new(year: i32, scope: Scope, ignore_holidays: bool, months: BTreeMap<u32, MonthSummary>) -> Self {
        let totals = Self::sum(&months);
        Self {
            year,
            scope,
            ignore_holidays,
            months,
            totals,
        }
    }

    pub fn get(&self, month: u32) -> Option<&MonthSummary> {
        self.months.get(&month)
    }

    /// Months in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &MonthSummary)> {
        self.months.iter().map(|(m, s)| (*m, s))
    }

    pub fn month_numbers(&self) -> Vec<u32> {
        self.months.keys().copied().collect()
    }

    /// Sums over all requested months; date lists are not totalled
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    fn sum(months: &BTreeMap<u32, MonthSummary>) -> Totals {
        months.values().fold(Totals::default(), |mut acc, m| {
            acc.calendar += m.calendar;
            acc.holiday += m.holiday;
            acc.weekend += m.weekend;
            acc.non_working += m.non_working;
            acc.working += m.working;
            acc.preholiday += m.preholiday;
            acc.hours += m.hours;
            acc
        })
    }
}

/// Renders hours rounded to one decimal, without a trailing `.0`
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 10.0).round() / 10.0;
    // avoid printing "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

fn serialize_dates<S: Serializer>(dates: &[NaiveDate], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(dates.iter().copied().map(display_date))
}

fn serialize_scope<S: Serializer>(scope: &Scope, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(scope)
}
