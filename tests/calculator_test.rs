use std::path::PathBuf;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use workhours::{HolidayProvider, Scope, WeeklyHours, WorkTimeCalculator};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn provider() -> HolidayProvider {
    let mut provider = HolidayProvider::new([fixture("holidays.json"), fixture("extra.ics")]);
    provider.load().await;
    provider
}

#[tokio::test]
async fn sources_are_merged() {
    let provider = provider().await;
    let table = provider.table().unwrap();
    assert_eq!(table.year(2024).len(), 6);
    assert_eq!(table.year(2024)[5].name, "Independence Day");
    assert_eq!(table.year(2025).len(), 1);
    // the 2023 entry has a malformed date
    assert!(table.year(2023).is_empty());
}

#[tokio::test]
async fn full_year_five_day_week() {
    let provider = provider().await;
    let calc = WorkTimeCalculator::new(provider.table().unwrap());
    let summary = calc.calculate_summary(2024, Scope::FullYear, &WeeklyHours::FIVE_DAY, false);

    assert_eq!(summary.month_numbers(), (1..=12).collect::<Vec<_>>());

    let totals = summary.totals();
    assert_eq!(totals.calendar, 366);
    assert_eq!(totals.weekend, 104);
    assert_eq!(totals.holiday, 6);
    assert_eq!(totals.non_working, 110);
    assert_eq!(totals.working, 256);
    assert_eq!(totals.preholiday, 6);
    assert_relative_eq!(totals.hours, 2042.0);
    assert_eq!(totals.working + totals.non_working, totals.calendar);
}

#[tokio::test]
async fn saturday_holiday_is_observed_on_monday() {
    let provider = provider().await;
    let calc = WorkTimeCalculator::new(provider.table().unwrap());
    let summary = calc.calculate_summary(2024, Scope::Month(8), &WeeklyHours::FIVE_DAY, false);
    let august = summary.get(8).unwrap();

    assert_eq!(august.calendar, 31);
    assert_eq!(august.weekend, 9);
    assert_eq!(august.holiday, 1);
    assert_eq!(august.holiday_dates_display(), ["24.08.24"]);
    assert_eq!(august.non_working, 10);
    assert_eq!(august.working, 21);
    assert_eq!(august.preholiday_dates, [date(2024, 8, 23)]);
    assert_relative_eq!(august.hours, 167.0);

    let adjusted = calc.resolve_adjusted_holidays(2024, &WeeklyHours::FIVE_DAY);
    assert_eq!(adjusted.get(date(2024, 8, 26)).unwrap().original, date(2024, 8, 24));
}

#[tokio::test]
async fn december_is_shortened_before_next_new_year() {
    let provider = provider().await;
    let calc = WorkTimeCalculator::new(provider.table().unwrap());
    let summary = calc.calculate_summary(2024, Scope::Month(12), &WeeklyHours::FIVE_DAY, false);
    let december = summary.get(12).unwrap();

    assert_eq!(december.preholiday_dates_display(), ["24.12.24", "31.12.24"]);
    assert_eq!(december.working, 21);
    assert_relative_eq!(december.hours, 166.0);
}

#[tokio::test]
async fn ignored_holidays_count_weekends_only() {
    let provider = provider().await;
    let calc = WorkTimeCalculator::new(provider.table().unwrap());
    let summary = calc.calculate_summary(2024, "Q2".parse().unwrap(), &WeeklyHours::FIVE_DAY, true);

    assert_eq!(summary.month_numbers(), [4, 5, 6]);
    for (_, month) in summary.iter() {
        assert_eq!(month.holiday, 0);
        assert!(month.holiday_raw_dates.is_empty());
        assert_eq!(month.preholiday, 0);
        assert_eq!(month.non_working, month.weekend);
    }
}

#[tokio::test]
async fn light_week_keeps_full_days() {
    let provider = provider().await;
    let calc = WorkTimeCalculator::new(provider.table().unwrap());
    let hours = WeeklyHours::new([6.0, 6.0, 6.0, 6.0, 6.0, 0.0, 0.0]);
    let summary = calc.calculate_summary(2024, Scope::FullYear, &hours, false);

    assert_eq!(summary.totals().preholiday, 0);
    assert_relative_eq!(summary.totals().hours, 256.0 * 6.0);
}
