//! Configuration module for the working-hours calculator.
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

use chrono_tz::Tz;
use serde::{
    Deserialize, Deserializer,
    de::{self, SeqAccess, Visitor},
};

use crate::{
    calendar::WeeklyHours,
    error::{Error, Result},
};

/// Main configuration structure for the application.
///
/// ```toml
/// [base]
/// hours = "8,8,8,8,8,0,0"
/// ignore_holidays = false
///
/// [holidays]
/// source = ["data/holidays.json"]
/// timezone = "Europe/Kyiv"
///
/// [templates]
/// six_day = "7,7,7,7,7,5,0"
/// ```
#[derive(Deserialize, Clone, Default)]
pub struct Conf {
    /// Basic configuration settings
    base: Option<Base>,
    /// Holiday data sources
    holidays: Option<Holidays>,
    /// Named weekly templates
    #[serde(default)]
    templates: BTreeMap<String, HoursSetting>,
}

/// Basic configuration settings.
#[derive(Deserialize, Clone)]
struct Base {
    /// Default weekly hours template
    hours: Option<HoursSetting>,
    /// Skip holidays and pre-holiday days entirely
    #[serde(default)]
    ignore_holidays: bool,
}

/// Holiday source configuration.
#[derive(Deserialize, Clone)]
struct Holidays {
    /// Local paths of JSON or iCalendar holiday files
    source: Option<Vec<String>>,
    /// Zone in which timed calendar events are dated
    timezone: Option<String>,
}

/// Weekly hours written either as `"8,8,8,8,8,0,0"` or `[8, 8, 8, 8, 8, 0, 0]`
#[derive(Clone, Debug, PartialEq)]
struct HoursSetting(WeeklyHours);

impl Conf {
    /// Returns the default weekly template if configured.
    pub fn hours(&self) -> Option<WeeklyHours> {
        self.base.as_ref().and_then(|base| base.hours.as_ref()).map(|h| h.0)
    }

    /// Returns the named template.
    ///
    /// # Errors
    /// * `Error::UnknownTemplate` when no template has that name
    pub fn template(&self, name: &str) -> Result<WeeklyHours> {
        self.templates
            .get(name)
            .map(|h| h.0)
            .ok_or_else(|| {
                let names: Vec<&str> = self.template_names().collect();
                Error::UnknownTemplate {
                    name: name.to_string(),
                    available: if names.is_empty() { "none".to_string() } else { names.join(", ") },
                }
            })
    }

    /// Names of all configured templates
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn ignore_holidays(&self) -> bool {
        self.base.as_ref().is_some_and(|base| base.ignore_holidays)
    }

    /// Returns the list of holiday sources if configured.
    pub fn holiday_sources(&self) -> &[String] {
        self.holidays
            .as_ref()
            .and_then(|h| h.source.as_deref())
            .unwrap_or(&[])
    }

    /// Returns the configured holiday time zone.
    ///
    /// # Errors
    /// * `Error::Timezone` for a name unknown to the tz database
    pub fn timezone(&self) -> Result<Option<Tz>> {
        match self.holidays.as_ref().and_then(|h| h.timezone.as_deref()) {
            Some(name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|_| Error::Timezone(name.to_string())),
            None => Ok(None),
        }
    }
}

impl<'de> Deserialize<'de> for HoursSetting {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WeeklyHoursVisitor)
    }
}

/// Error message format for weekly hours deserialization errors.
const ERR_FMT: &str = "weekly hours like \"8,8,8,8,8,0,0\" or [8, 8, 8, 8, 8, 0, 0] (0-24 each, Monday first)";

/// Visitor for deserializing weekly hours from a string or a list.
struct WeeklyHoursVisitor;

impl<'a> Visitor<'a> for WeeklyHoursVisitor {
    type Value = HoursSetting;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", &ERR_FMT)
    }

    /// # Examples
    /// * "8,8,8,8,8,0,0" → five eight-hour days
    /// * "8,8,8" → Monday to Wednesday, the rest off
    fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse::<WeeklyHours>().map(HoursSetting).map_err(E::custom)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'a>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(7));
        while let Some(value) = seq.next_element::<f64>()? {
            values.push(value);
        }
        let source = format!("{values:?}");
        WeeklyHours::try_from_values(&values, &source)
            .map(HoursSetting)
            .map_err(de::Error::custom)
    }
}
