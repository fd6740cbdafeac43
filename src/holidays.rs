//! Holiday records and the provider that loads them from local sources.
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

use std::{
    collections::BTreeMap,
    io::Cursor,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use log::{debug, info, warn};
use serde::{Deserialize, de::Visitor};

use crate::{
    error::{Error, Result},
    ical,
};

/// Date format used by holiday tables (dd.mm.yyyy)
const HOLIDAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// A public holiday as published
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayRecord {
    /// Published (raw) date
    #[serde(deserialize_with = "deserialize_holiday_date")]
    pub date: NaiveDate,
    /// Display name, not used by the calculation
    #[serde(default)]
    pub name: String,
}

impl HolidayRecord {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// Holidays grouped by year.
///
/// A year that is absent has no holidays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayTable {
    years: BTreeMap<i32, Vec<HolidayRecord>>,
}

impl HolidayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a record under `year`
    pub fn insert(&mut self, year: i32, record: HolidayRecord) {
        self.years.entry(year).or_default().push(record);
    }

    /// Holidays of a year in source order; empty when the year is unknown
    pub fn year(&self, year: i32) -> &[HolidayRecord] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Years that have at least one entry
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Appends every year of `other` after the records already present
    pub fn merge(&mut self, other: HolidayTable) {
        for (year, records) in other.years {
            self.years.entry(year).or_default().extend(records);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.values().all(Vec::is_empty)
    }

    /// Total number of records across all years
    pub fn len(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    /// Parses a year-keyed JSON table:
    ///
    /// ```json
    /// { "2024": [ { "date": "01.01.2024", "name": "New Year" } ] }
    /// ```
    ///
    /// Every year is decoded on its own. A malformed year is skipped with a
    /// warning so the rest of the table stays usable.
    pub fn from_json_slice(bytes: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_slice(bytes)?;
        let mut table = Self::new();

        for (key, value) in raw {
            let Ok(year) = key.trim().parse::<i32>() else {
                warn!("Skipping holiday entry with non-numeric year '{key}'");
                continue;
            };
            match Vec::<HolidayRecord>::deserialize(value) {
                Ok(records) => {
                    table.years.entry(year).or_default().extend(records);
                }
                Err(e) => {
                    warn!("Ignoring malformed holidays for {year}: {e}");
                }
            }
        }
        Ok(table)
    }
}

impl FromIterator<HolidayRecord> for HolidayTable {
    /// Files every record under the year of its own date
    fn from_iter<I: IntoIterator<Item = HolidayRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record.date.year(), record);
        }
        table
    }
}

/// Loads holiday tables once and keeps them in memory.
///
/// Sources ending in `.ics` are read as iCalendar files, anything else as a
/// JSON table. Sources are merged in order.
pub struct HolidayProvider {
    /// Local paths of holiday sources
    sources: Vec<PathBuf>,
    /// Zone used to date timed calendar events
    zone: Option<Tz>,
    /// Loaded table (cached after first load)
    table: Option<HolidayTable>,
}

impl HolidayProvider {
    pub fn new<I, P>(sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            zone: None,
            table: None,
        }
    }

    /// A provider that is ready from the start
    pub fn with_table(table: HolidayTable) -> Self {
        Self {
            sources: Vec::new(),
            zone: None,
            table: Some(table),
        }
    }

    pub fn with_zone(mut self, zone: Option<Tz>) -> Self {
        self.zone = zone;
        self
    }

    /// Whether `load` has completed
    pub fn is_ready(&self) -> bool {
        self.table.is_some()
    }

    /// The loaded table, `None` before `load`
    pub fn table(&self) -> Option<&HolidayTable> {
        self.table.as_ref()
    }

    /// Reads all sources the first time it is called and returns the cached
    /// table afterwards.
    ///
    /// A source that cannot be read or parsed is logged and contributes no
    /// holidays.
    pub async fn load(&mut self) -> &HolidayTable {
        if self.table.is_none() {
            let zone = self.zone;
            let tasks = self.sources.iter().map(|path| async move {
                match Self::read_source(path, zone).await {
                    Ok(table) => {
                        debug!("Loaded {} holidays from '{}'", table.len(), path.display());
                        table
                    }
                    Err(e) => {
                        warn!("{e}");
                        HolidayTable::new()
                    }
                }
            });

            let mut merged = HolidayTable::new();
            for task in tasks {
                merged.merge(task.await);
            }
            info!(
                "Holiday data ready: {} holidays from {} source(s)",
                merged.len(),
                self.sources.len()
            );
            self.table = Some(merged);
        }
        self.table.get_or_insert_with(HolidayTable::new)
    }

    /// Reads one source, picking the parser by file extension
    async fn read_source(path: &Path, zone: Option<Tz>) -> Result<HolidayTable> {
        let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_ics = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ics"));

        if is_ics {
            ical::read_holidays(Cursor::new(bytes), zone)
                .map(HolidayTable::from_iter)
                .map_err(|message| Error::Ical {
                    path: path.to_path_buf(),
                    message,
                })
        } else {
            HolidayTable::from_json_slice(&bytes).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Deserializes a `dd.mm.yyyy` string into a date
fn deserialize_holiday_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_str(HolidayDateVisitor)
}

/// Error message for holiday date deserialization errors
const DATE_ERR_FMT: &str = "a date string like '01.01.2024' (dd.mm.yyyy)";

struct HolidayDateVisitor;

impl<'a> Visitor<'a> for HolidayDateVisitor {
    type Value = NaiveDate;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", DATE_ERR_FMT)
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        NaiveDate::parse_from_str(v.trim(), HOLIDAY_DATE_FORMAT)
            .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &DATE_ERR_FMT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn json_table_by_year() {
        let json = br#"{
            "2024": [
                {"date": "01.01.2024", "name": "New Year"},
                {"date": "08.03.2024", "name": "Women's Day"}
            ],
            "2025": [{"date": "01.01.2025", "name": "New Year"}]
        }"#;
        let table = HolidayTable::from_json_slice(json).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.year(2024)[1].date, date(2024, 3, 8));
        assert_eq!(table.year(2024)[1].name, "Women's Day");
        assert!(table.year(2023).is_empty());
    }

    #[test]
    fn malformed_year_degrades_to_empty() {
        let json = br#"{
            "2024": [{"date": "2024-01-01", "name": "bad format"}],
            "2025": [{"date": "01.01.2025"}],
            "next": []
        }"#;
        let table = HolidayTable::from_json_slice(json).unwrap();
        assert!(table.year(2024).is_empty());
        assert_eq!(table.year(2025).len(), 1);
        assert_eq!(table.year(2025)[0].name, "");
    }

    #[test]
    fn non_object_json_is_an_error() {
        assert!(HolidayTable::from_json_slice(b"[1, 2]").is_err());
    }

    #[test]
    fn merge_keeps_source_order() {
        let mut a: HolidayTable = [HolidayRecord::new(date(2024, 1, 1), "a")].into_iter().collect();
        let b: HolidayTable = [
            HolidayRecord::new(date(2024, 5, 1), "b"),
            HolidayRecord::new(date(2025, 1, 1), "c"),
        ]
        .into_iter()
        .collect();
        a.merge(b);
        let names: Vec<&str> = a.year(2024).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(a.years().collect::<Vec<_>>(), [2024, 2025]);
    }

    #[tokio::test]
    async fn missing_source_loads_as_empty() {
        let mut provider = HolidayProvider::new(["does/not/exist.json"]);
        assert!(!provider.is_ready());
        assert!(provider.load().await.is_empty());
        assert!(provider.is_ready());
    }

    #[tokio::test]
    async fn preloaded_table_is_not_replaced() {
        let table: HolidayTable = [HolidayRecord::new(date(2024, 1, 1), "New Year")]
            .into_iter()
            .collect();
        let mut provider = HolidayProvider::with_table(table.clone());
        assert!(provider.is_ready());
        assert_eq!(provider.load().await, &table);
    }
}
