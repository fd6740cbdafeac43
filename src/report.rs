//! Plain-text table of a calculation result.
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

use std::io::{self, Write};

use crate::summary::{MonthSummary, Summary, Totals, format_hours};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shown for zero counts and empty date lists
const EMPTY_CELL: &str = "-";

/// Rows of the table in display order
#[derive(Clone, Copy, PartialEq, Eq)]
enum Row {
    Calendar,
    Holiday,
    HolidayDates,
    Preholiday,
    PreholidayDates,
    Weekend,
    NonWorking,
    Working,
    Hours,
}

impl Row {
    const ALL: [Row; 9] = [
        Row::Calendar,
        Row::Holiday,
        Row::HolidayDates,
        Row::Preholiday,
        Row::PreholidayDates,
        Row::Weekend,
        Row::NonWorking,
        Row::Working,
        Row::Hours,
    ];

    fn label(self) -> &'static str {
        match self {
            Row::Calendar => "Calendar days",
            Row::Holiday => "Holidays",
            Row::HolidayDates => "Holiday dates",
            Row::Preholiday => "Pre-holiday days",
            Row::PreholidayDates => "Pre-holiday dates",
            Row::Weekend => "Weekend days",
            Row::NonWorking => "Non-working days",
            Row::Working => "Working days",
            Row::Hours => "Hours",
        }
    }

    fn is_holiday_row(self) -> bool {
        matches!(
            self,
            Row::Holiday | Row::HolidayDates | Row::Preholiday | Row::PreholidayDates
        )
    }

    fn month_cell(self, m: &MonthSummary) -> String {
        match self {
            Row::Calendar => count_cell(m.calendar),
            Row::Holiday => count_cell(m.holiday),
            Row::HolidayDates => dates_cell(m.holiday_dates_display()),
            Row::Preholiday => count_cell(m.preholiday),
            Row::PreholidayDates => dates_cell(m.preholiday_dates_display()),
            Row::Weekend => count_cell(m.weekend),
            Row::NonWorking => count_cell(m.non_working),
            Row::Working => count_cell(m.working),
            Row::Hours => format_hours(m.hours),
        }
    }

    fn total_cell(self, t: &Totals) -> String {
        match self {
            Row::Calendar => count_cell(t.calendar),
            Row::Holiday => count_cell(t.holiday),
            Row::HolidayDates | Row::PreholidayDates => EMPTY_CELL.to_string(),
            Row::Preholiday => count_cell(t.preholiday),
            Row::Weekend => count_cell(t.weekend),
            Row::NonWorking => count_cell(t.non_working),
            Row::Working => count_cell(t.working),
            Row::Hours => format_hours(t.hours),
        }
    }
}

fn count_cell(n: u32) -> String {
    if n == 0 { EMPTY_CELL.to_string() } else { n.to_string() }
}

/// Dates are shown as dd.mm
fn dates_cell(dates: Vec<String>) -> String {
    if dates.is_empty() {
        return EMPTY_CELL.to_string();
    }
    dates
        .iter()
        .map(|d| d.get(..5).unwrap_or(d))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the table as rows of cells, header first.
///
/// Holiday rows are left out when holidays were ignored, and a total column
/// is added for quarter and full-year scopes.
pub fn table(summary: &Summary) -> Vec<Vec<String>> {
    let with_total = summary.scope.spans_multiple_months();

    let mut header = vec![String::new()];
    header.extend(
        summary
            .month_numbers()
            .into_iter()
            .map(|m| MONTH_NAMES[(m as usize - 1) % 12].to_string()),
    );
    if with_total {
        header.push("Total".to_string());
    }

    let mut rows = vec![header];
    for row in Row::ALL {
        if summary.ignore_holidays && row.is_holiday_row() {
            continue;
        }
        let mut cells = vec![row.label().to_string()];
        cells.extend(summary.iter().map(|(_, m)| row.month_cell(m)));
        if with_total {
            cells.push(row.total_cell(summary.totals()));
        }
        rows.push(cells);
    }
    rows
}

/// Writes the table with columns padded to a common width
pub fn write_report<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    let rows = table(summary);
    let columns = rows.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    writeln!(out, "Working time {}, period {}", summary.year, summary.scope)?;
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}
