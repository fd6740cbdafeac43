//! iCalendar reader for holiday sources.
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

use std::io::BufRead;

use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use ical::property::Property;
use log::debug;

use crate::holidays::HolidayRecord;

/// iCalendar property key for event summary
const KEY_SUMMARY: &str = "SUMMARY";
/// iCalendar property key for event start time
const KEY_DTSTART: &str = "DTSTART";

/// iCalendar date format: YYYYMMDD
const DATE_FMT: &str = "%Y%m%d";
/// iCalendar datetime format: YYYYMMDDTHHMMSS
const DT_FMT: &str = "%Y%m%dT%H%M%S";

/// Reads every event of every calendar in `reader` as a holiday.
///
/// # Arguments
/// * `reader` - Buffered reader containing iCalendar data
/// * `zone` - Zone in which timed events are dated; `None` keeps the
///   wall-clock date of `TZID` events and the UTC date of `Z` events
///
/// # Returns
/// * Holidays in file order, or the parser message for a broken calendar
///
/// Events without a usable `DTSTART` are skipped.
pub fn read_holidays<T: BufRead>(reader: T, zone: Option<Tz>) -> Result<Vec<HolidayRecord>, String> {
    let mut holidays = Vec::new();
    let parser = ical::IcalParser::new(reader);

    for calendar in parser {
        let cal = calendar.map_err(|e| e.to_string())?;
        for event in cal.events {
            let mut name = None;
            let mut date = None;

            for prop in &event.properties {
                match prop.name.as_str() {
                    KEY_SUMMARY => name = prop.value.clone(),
                    KEY_DTSTART => match parse_date(prop, zone) {
                        Ok(d) => date = Some(d),
                        Err(e) => debug!("Skipping DTSTART {:?}: {e}", prop.value),
                    },
                    _ => {}
                }
            }

            match date {
                Some(date) => holidays.push(HolidayRecord::new(date, name.unwrap_or_default())),
                None => debug!("Skipping event without start date: {name:?}"),
            }
        }
    }
    Ok(holidays)
}

/// Resolves the calendar date of a `DTSTART` property
///
/// # Supported Formats
/// * YYYYMMDD (all-day events)
/// * YYYYMMDDTHHMMSS (floating local time)
/// * YYYYMMDDTHHMMSSZ (UTC time)
/// * YYYYMMDDTHHMMSS with TZID parameter
fn parse_date(prop: &Property, zone: Option<Tz>) -> Result<NaiveDate, &'static str> {
    let Some(value) = &prop.value else {
        return Err("Missing date value");
    };

    let value = value.trim().to_uppercase();

    if value.len() == 8 {
        return NaiveDate::parse_from_str(&value, DATE_FMT).map_err(|_| "Invalid date format");
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let dt = NaiveDateTime::parse_from_str(utc, DT_FMT)
            .map_err(|_| "Invalid datetime format")?
            .and_utc();
        return Ok(match zone {
            Some(zone) => dt.with_timezone(&zone).date_naive(),
            None => dt.date_naive(),
        });
    }

    let local = NaiveDateTime::parse_from_str(&value, DT_FMT).map_err(|_| "Invalid datetime format")?;

    let tzid = prop.params.as_ref().and_then(|params| {
        params
            .iter()
            .find(|(name, field)| name.eq_ignore_ascii_case("TZID") && !field.is_empty())
            .map(|(_, field)| field[0].clone())
    });

    let Some(tzid) = tzid else {
        // Floating time
        return Ok(local.date());
    };

    let tz = tzid.parse::<Tz>().map_err(|_| "Invalid timezone identifier")?;
    let dt = match tz.from_local_datetime(&local) {
        chrono::offset::LocalResult::Single(dt) => dt,
        chrono::offset::LocalResult::Ambiguous(early, _) => early,
        chrono::offset::LocalResult::None => return Err("Invalid datetime for timezone"),
    };

    Ok(match zone {
        Some(zone) => dt.with_timezone(&zone).date_naive(),
        None => dt.date_naive(),
    })
}
