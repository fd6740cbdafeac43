//! Normative working-time calculation: holiday shifting, pre-holiday days and monthly tallies.
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

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

use crate::{
    calendar::{Scope, WeeklyHours, days_in_month, month_days},
    holidays::{HolidayRecord, HolidayTable},
    summary::{MonthSummary, Summary},
};

/// A holiday together with the date it is observed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustedHoliday {
    /// Date the holiday is taken off
    pub observed: NaiveDate,
    /// Published date
    pub original: NaiveDate,
    pub name: String,
}

/// Observed holidays of one year.
///
/// Each observed date carries exactly one holiday. Holidays that could not
/// be placed are kept in `dropped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustedHolidays {
    observed: BTreeMap<NaiveDate, AdjustedHoliday>,
    dropped: Vec<HolidayRecord>,
}

impl AdjustedHolidays {
    /// Whether `date` is taken off for a holiday
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.observed.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&AdjustedHoliday> {
        self.observed.get(&date)
    }

    /// Observed holidays by observed date
    pub fn iter(&self) -> impl Iterator<Item = &AdjustedHoliday> {
        self.observed.values()
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Holidays left without an observed date
    pub fn dropped(&self) -> &[HolidayRecord] {
        &self.dropped
    }
}

/// Outcome of looking for a free working day after a holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSearch {
    Found(NaiveDate),
    /// No free working day left in the holiday's year
    Exhausted,
}

/// Looks for the first working day after `original`, within the same
/// year, that no other holiday has claimed yet.
pub fn find_observed_date(
    original: NaiveDate,
    hours: &WeeklyHours,
    claimed: &BTreeMap<NaiveDate, AdjustedHoliday>,
) -> ShiftSearch {
    original
        .iter_days()
        .skip(1)
        .take_while(|d| d.year() == original.year())
        .find(|d| hours.is_working(d.weekday()) && !claimed.contains_key(d))
        .map_or(ShiftSearch::Exhausted, ShiftSearch::Found)
}

/// Computes working-time summaries against a loaded holiday table
pub struct WorkTimeCalculator<'a> {
    holidays: &'a HolidayTable,
}

impl<'a> WorkTimeCalculator<'a> {
    pub fn new(holidays: &'a HolidayTable) -> Self {
        Self { holidays }
    }

    /// Resolves the observed date of every holiday of `year`.
    ///
    /// A holiday on a weekday with hours stays put. One on a non-working
    /// weekday moves to the next free working day of the same year, or is
    /// dropped when the year runs out. Holidays are placed in table order.
    pub fn resolve_adjusted_holidays(&self, year: i32, hours: &WeeklyHours) -> AdjustedHolidays {
        let mut adjusted = AdjustedHolidays::default();

        for record in self.holidays.year(year) {
            let original = record.date;
            let observed = if hours.is_working(original.weekday()) {
                original
            } else {
                match find_observed_date(original, hours, &adjusted.observed) {
                    ShiftSearch::Found(date) => {
                        debug!("Holiday '{}' moved from {original} to {date}", record.name);
                        date
                    }
                    ShiftSearch::Exhausted => {
                        debug!("Holiday '{}' on {original} has no free working day left", record.name);
                        adjusted.dropped.push(record.clone());
                        continue;
                    }
                }
            };

            let entry = AdjustedHoliday {
                observed,
                original,
                name: record.name.clone(),
            };
            if let Some(displaced) = adjusted.observed.insert(observed, entry) {
                debug!("Holiday '{}' lost {observed} to '{}'", displaced.name, record.name);
                adjusted
                    .dropped
                    .push(HolidayRecord::new(displaced.original, displaced.name));
            }
        }
        adjusted
    }

    /// Collects the working days shortened by one hour because a raw
    /// holiday follows them.
    ///
    /// Only applies to intensive weeks (see [`WeeklyHours::is_intensive`]).
    /// Raw dates are used, not observed ones, and New Year's Day of the
    /// following year shortens 31 December.
    pub fn resolve_shortened_days(&self, year: i32, hours: &WeeklyHours) -> BTreeSet<NaiveDate> {
        if !hours.is_intensive() {
            return BTreeSet::new();
        }

        let next_new_year = self
            .holidays
            .year(year + 1)
            .iter()
            .filter(|h| h.date.year() == year + 1 && h.date.ordinal() == 1);

        self.holidays
            .year(year)
            .iter()
            .chain(next_new_year)
            .filter_map(|h| h.date.pred_opt())
            .filter(|prev| prev.year() == year && hours.is_working(prev.weekday()))
            .collect()
    }

    /// Tallies one month. Returns `None` for a month outside 1..=12.
    ///
    /// Precedence per day is holiday, then weekend, then shortened. The
    /// holiday count follows raw dates while the day off follows observed
    /// dates.
    pub fn classify_month(
        &self,
        year: i32,
        month: u32,
        hours: &WeeklyHours,
        adjusted: &AdjustedHolidays,
        shortened: &BTreeSet<NaiveDate>,
        ignore_holidays: bool,
    ) -> Option<MonthSummary> {
        let mut summary = MonthSummary::new(days_in_month(year, month)?);

        let raw_dates: BTreeSet<NaiveDate> = if ignore_holidays {
            BTreeSet::new()
        } else {
            self.holidays
                .year(year)
                .iter()
                .map(|h| h.date)
                .filter(|d| d.year() == year && d.month() == month)
                .collect()
        };

        for date in month_days(year, month) {
            let h0 = hours.hours_on(date);
            let is_holiday = !ignore_holidays && adjusted.contains(date);
            let is_shortened = shortened.contains(&date);
            let is_weekend = !hours.is_working(date.weekday());

            if raw_dates.contains(&date) {
                summary.holiday_raw_dates.push(date);
            }
            if is_weekend {
                summary.weekend += 1;
            }
            if is_holiday || is_weekend {
                summary.non_working += 1;
            } else {
                summary.working += 1;
            }

            if is_holiday {
                continue;
            }

            let mut h = h0;
            if is_shortened && h0 > 1.0 {
                h -= 1.0;
                summary.preholiday += 1;
                summary.preholiday_dates.push(date);
            }
            summary.hours += h;
        }

        summary.holiday = summary.holiday_raw_dates.len() as u32;
        Some(summary)
    }

    /// Computes every month of `scope` for `year`.
    ///
    /// Holidays and shortened days are resolved once and shared across the
    /// months. With `ignore_holidays` neither is resolved.
    pub fn calculate_summary(
        &self,
        year: i32,
        scope: Scope,
        hours: &WeeklyHours,
        ignore_holidays: bool,
    ) -> Summary {
        let (adjusted, shortened) = if ignore_holidays {
            (AdjustedHolidays::default(), BTreeSet::new())
        } else {
            (
                self.resolve_adjusted_holidays(year, hours),
                self.resolve_shortened_days(year, hours),
            )
        };

        if !adjusted.dropped().is_empty() {
            debug!("{} holiday(s) of {year} have no observed date", adjusted.dropped().len());
        }

        let mut months = BTreeMap::new();
        for month in scope.months() {
            match self.classify_month(year, month, hours, &adjusted, &shortened, ignore_holidays) {
                Some(summary) => {
                    months.insert(month, summary);
                }
                None => warn!("Skipping invalid month {month}"),
            }
        }

        Summary::new(year, scope, ignore_holidays, months)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::calendar::Quarter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(dates: &[(i32, u32, u32)]) -> HolidayTable {
        dates
            .iter()
            .map(|&(y, m, d)| HolidayRecord::new(date(y, m, d), format!("{d:02}.{m:02}")))
            .collect()
    }

    const SIX_HOUR_WEEK: WeeklyHours = WeeklyHours::new([6.0, 6.0, 6.0, 6.0, 6.0, 0.0, 0.0]);

    #[test]
    fn holiday_on_working_day_stays() {
        // 2024-05-01 is a Wednesday
        let holidays = table(&[(2024, 5, 1)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let adjusted = calc.resolve_adjusted_holidays(2024, &WeeklyHours::FIVE_DAY);
        assert!(adjusted.contains(date(2024, 5, 1)));
        assert_eq!(adjusted.len(), 1);
    }

    #[test]
    fn sunday_holiday_moves_to_monday() {
        // 2023-01-01 is a Sunday
        let holidays = table(&[(2023, 1, 1)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let adjusted = calc.resolve_adjusted_holidays(2023, &WeeklyHours::FIVE_DAY);
        let observed = adjusted.get(date(2023, 1, 2)).unwrap();
        assert_eq!(observed.original, date(2023, 1, 1));
        assert!(!adjusted.contains(date(2023, 1, 1)));
    }

    #[test]
    fn shifted_holidays_do_not_collide() {
        // 2022-12-24 and 2022-12-25 are Saturday and Sunday
        let holidays = table(&[(2022, 12, 24), (2022, 12, 25)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let adjusted = calc.resolve_adjusted_holidays(2022, &WeeklyHours::FIVE_DAY);
        let observed: Vec<NaiveDate> = adjusted.iter().map(|h| h.observed).collect();
        assert_eq!(observed, [date(2022, 12, 26), date(2022, 12, 27)]);
    }

    #[test]
    fn shift_search_stops_at_year_end() {
        // 2022-12-31 is a Saturday, nothing left in 2022
        let holidays = table(&[(2022, 12, 31)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let adjusted = calc.resolve_adjusted_holidays(2022, &WeeklyHours::FIVE_DAY);
        assert!(adjusted.is_empty());
        assert_eq!(adjusted.dropped().len(), 1);
        assert_eq!(
            find_observed_date(date(2022, 12, 31), &WeeklyHours::FIVE_DAY, &BTreeMap::new()),
            ShiftSearch::Exhausted
        );
    }

    #[test]
    fn raw_holiday_takes_slot_from_shifted_one() {
        // Sunday 2023-01-01 shifts to Monday 2023-01-02, which is itself listed
        let holidays = table(&[(2023, 1, 1), (2023, 1, 2)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let adjusted = calc.resolve_adjusted_holidays(2023, &WeeklyHours::FIVE_DAY);
        assert_eq!(adjusted.len(), 1);
        assert_eq!(adjusted.get(date(2023, 1, 2)).unwrap().original, date(2023, 1, 2));
        assert_eq!(adjusted.dropped()[0].date, date(2023, 1, 1));
    }

    #[test]
    fn shortened_days_precede_raw_holidays() {
        // 2024-03-08 is a Friday, 2024-05-01 a Wednesday, 2024-06-16 a Sunday
        let holidays = table(&[(2024, 3, 8), (2024, 5, 1), (2024, 6, 16)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let shortened = calc.resolve_shortened_days(2024, &WeeklyHours::FIVE_DAY);
        // the Saturday before 16 June is not a working day
        assert_eq!(shortened, BTreeSet::from([date(2024, 3, 7), date(2024, 4, 30)]));
    }

    #[test]
    fn next_new_year_shortens_december_31() {
        // 2024-12-31 is a Tuesday
        let holidays = table(&[(2025, 1, 1), (2025, 1, 7)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let shortened = calc.resolve_shortened_days(2024, &WeeklyHours::FIVE_DAY);
        assert_eq!(shortened, BTreeSet::from([date(2024, 12, 31)]));

        // New Year's Day of the same year reaches back into the previous one
        let shortened = calc.resolve_shortened_days(2025, &WeeklyHours::FIVE_DAY);
        assert_eq!(shortened, BTreeSet::from([date(2025, 1, 6)]));
    }

    #[test]
    fn light_week_has_no_shortened_days() {
        let holidays = table(&[(2024, 3, 8), (2024, 5, 1)]);
        let calc = WorkTimeCalculator::new(&holidays);
        assert!(calc.resolve_shortened_days(2024, &SIX_HOUR_WEEK).is_empty());

        let summary = calc.calculate_summary(2024, Scope::FullYear, &SIX_HOUR_WEEK, false);
        for (_, month) in summary.iter() {
            assert_eq!(month.preholiday, 0);
            assert!(month.preholiday_dates.is_empty());
        }
    }

    #[test]
    fn march_2024_with_womens_day() {
        let holidays = table(&[(2024, 3, 8)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let summary = calc.calculate_summary(2024, Scope::Month(3), &WeeklyHours::FIVE_DAY, false);
        let march = summary.get(3).unwrap();

        assert_eq!(march.calendar, 31);
        assert_eq!(march.weekend, 10);
        assert_eq!(march.holiday, 1);
        assert_eq!(march.holiday_raw_dates, [date(2024, 3, 8)]);
        assert_eq!(march.non_working, 11);
        assert_eq!(march.working, 20);
        assert_eq!(march.preholiday, 1);
        assert_eq!(march.preholiday_dates, [date(2024, 3, 7)]);
        assert_relative_eq!(march.hours, 159.0);
    }

    #[test]
    fn holiday_count_follows_raw_dates() {
        // Saturday 2024-06-29 is observed on Monday 2024-07-01
        let holidays = table(&[(2024, 6, 29)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let summary = calc.calculate_summary(2024, Scope::FullYear, &WeeklyHours::FIVE_DAY, false);

        let june = summary.get(6).unwrap();
        assert_eq!(june.holiday, 1);
        assert_eq!(june.non_working, june.weekend);

        let july = summary.get(7).unwrap();
        assert_eq!(july.holiday, 0);
        assert_eq!(july.non_working, july.weekend + 1);
        assert_eq!(july.working, 22);
        assert_relative_eq!(july.hours, 176.0);
    }

    #[test]
    fn shortened_observed_holiday_keeps_holiday_precedence() {
        // Friday 2024-03-08 and Saturday 2024-03-09: the Saturday holiday is
        // observed on Monday 11th, and the raw Friday precedes a raw holiday
        let holidays = table(&[(2024, 3, 8), (2024, 3, 9)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let summary = calc.calculate_summary(2024, Scope::Month(3), &WeeklyHours::FIVE_DAY, false);
        let march = summary.get(3).unwrap();
        assert_eq!(march.preholiday_dates, [date(2024, 3, 7)]);
        assert_eq!(march.holiday, 2);
        assert_eq!(march.non_working, march.weekend + 2);
    }

    #[test]
    fn one_hour_days_are_not_shortened() {
        let hours = WeeklyHours::new([8.0, 8.0, 1.0, 8.0, 8.0, 0.0, 0.0]);
        // 2024-05-02 is a Thursday, the day before is a one-hour Wednesday
        let holidays = table(&[(2024, 5, 2)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let summary = calc.calculate_summary(2024, Scope::Month(5), &hours, false);
        let may = summary.get(5).unwrap();
        assert_eq!(may.preholiday, 0);
        assert!(calc.resolve_shortened_days(2024, &hours).contains(&date(2024, 5, 1)));
    }

    #[test]
    fn ignoring_holidays_clears_holiday_rows() {
        let holidays = table(&[(2024, 1, 1), (2024, 3, 8), (2024, 12, 25), (2025, 1, 1)]);
        let calc = WorkTimeCalculator::new(&holidays);
        let summary = calc.calculate_summary(2024, Scope::FullYear, &WeeklyHours::FIVE_DAY, true);
        for (_, month) in summary.iter() {
            assert_eq!(month.holiday, 0);
            assert!(month.holiday_raw_dates.is_empty());
            assert_eq!(month.preholiday, 0);
            assert!(month.preholiday_dates.is_empty());
            assert_eq!(month.non_working, month.weekend);
        }
        assert_eq!(summary.totals().working, 262);
        assert_relative_eq!(summary.totals().hours, 2096.0);
    }

    #[test]
    fn hours_without_holidays_follow_template() {
        let hours = WeeklyHours::new([8.0, 8.0, 8.0, 8.0, 7.5, 4.0, 0.0]);
        let empty = HolidayTable::new();
        let calc = WorkTimeCalculator::new(&empty);
        let summary = calc.calculate_summary(2023, Scope::Month(2), &hours, false);
        let feb = summary.get(2).unwrap();

        let expected: f64 = month_days(2023, 2).map(|d| hours.hours_on(d)).sum();
        assert_relative_eq!(feb.hours, expected);
        assert_eq!(feb.calendar, 28);
        assert_eq!(feb.weekend, 4);
        assert_eq!(feb.working + feb.non_working, feb.calendar);
    }

    #[test]
    fn short_template_leaves_remaining_days_off() {
        let hours = WeeklyHours::from_slice(&[8.0, 8.0, 8.0]);
        let empty = HolidayTable::new();
        let calc = WorkTimeCalculator::new(&empty);
        // April 2024 starts on a Monday: Mon-Wed occur 5, 5 and 4 times
        let summary = calc.calculate_summary(2024, Scope::Month(4), &hours, false);
        let april = summary.get(4).unwrap();

        assert_eq!(april.working, 14);
        assert_eq!(april.weekend, 16);
        assert_eq!(april.non_working, 16);
        assert_relative_eq!(april.hours, 14.0 * 8.0);
    }

    #[test]
    fn invalid_template_values_add_no_hours() {
        let hours = WeeklyHours::new([8.0, 8.0, 8.0, 8.0, 8.0, f64::NAN, -2.0]);
        let empty = HolidayTable::new();
        let calc = WorkTimeCalculator::new(&empty);
        let summary = calc.calculate_summary(2024, Scope::Month(4), &hours, false);
        let april = summary.get(4).unwrap();

        assert_eq!(april.weekend, 8);
        assert_eq!(april.working, 22);
        assert!(april.hours.is_finite());
        assert_relative_eq!(april.hours, 22.0 * 8.0);
    }

    #[test]
    fn quarter_scope_months() {
        let empty = HolidayTable::new();
        let calc = WorkTimeCalculator::new(&empty);
        let summary = calc.calculate_summary(2024, Scope::Quarter(Quarter::Q2), &WeeklyHours::FIVE_DAY, false);
        assert_eq!(summary.month_numbers(), [4, 5, 6]);
    }

    #[test]
    fn invalid_month_is_skipped() {
        let empty = HolidayTable::new();
        let calc = WorkTimeCalculator::new(&empty);
        let summary = calc.calculate_summary(2024, Scope::Month(13), &WeeklyHours::FIVE_DAY, false);
        assert!(summary.months.is_empty());
    }
}
