//! Command-line interface parser for the working-hours calculator.
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

use std::{fs::File, io::Read, path::PathBuf};

use chrono::{Datelike, Local};
use chrono_tz::Tz;
use clap::{Parser, builder::TypedValueParser};
use workhours::{Result, Scope, WeeklyHours, conf::Conf};

/// Help message for the period argument
const PERIOD_HELP: &str = "Period: \"0\" for the whole year, \"Q1\"..\"Q4\" for a quarter or a month number 1-12";
/// Help message for the weekly hours argument
const HOURS_HELP: &str = "Weekly hours Monday first, e.g. \"8,8,8,8,8,0,0\" (0-24 each, missing days are 0)";

const DEFAULT_PERIOD_VALUE: &str = "0";

/// Command-line interface structure
#[derive(Parser)]
#[command(
    version(env!("CARGO_PKG_VERSION")),
    author(env!("CARGO_PKG_AUTHORS")),
    about(env!("CARGO_PKG_DESCRIPTION")),
    long_about = "Computes calendar, holiday, pre-holiday, weekend and working days \
                 and the normative working hours for a month, quarter or year."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        long,
        short,
        value_parser = ConfParser,
        help = "Path to TOML configuration file"
    )]
    conf: Option<Conf>,

    /// Year to calculate, defaults to the current year
    #[arg(long, short)]
    year: Option<i32>,

    /// Month, quarter or whole year
    #[arg(
        long,
        short,
        value_parser = ScopeParser,
        default_value = DEFAULT_PERIOD_VALUE,
        help = PERIOD_HELP
    )]
    period: Scope,

    /// Weekly hours template, overrides the configuration
    #[arg(long = "hours", short = 'w', help = HOURS_HELP)]
    hours: Option<WeeklyHours>,

    /// Named template from the configuration
    #[arg(long, short, conflicts_with = "hours")]
    template: Option<String>,

    /// Additional holiday sources (JSON or .ics), may be repeated
    #[arg(long = "holidays", short = 'H')]
    holidays: Vec<PathBuf>,

    /// Count weekends only, without holidays and pre-holiday days
    #[arg(long, short)]
    ignore_holidays: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Returns the target year
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Local::now().year())
    }

    pub fn scope(&self) -> Scope {
        self.period
    }

    /// Resolves the weekly template
    ///
    /// Precedence: `--hours`, `--template`, `base.hours`, then a five-day week.
    pub fn weekly_hours(&self) -> Result<WeeklyHours> {
        if let Some(hours) = self.hours {
            return Ok(hours);
        }
        if let Some(name) = &self.template {
            return self.conf().template(name);
        }
        Ok(self.conf().hours().unwrap_or_default())
    }

    pub fn ignore_holidays(&self) -> bool {
        self.ignore_holidays || self.conf().ignore_holidays()
    }

    /// Holiday sources from the configuration followed by `--holidays`
    pub fn holiday_sources(&self) -> Vec<PathBuf> {
        self.conf()
            .holiday_sources()
            .iter()
            .map(PathBuf::from)
            .chain(self.holidays.iter().cloned())
            .collect()
    }

    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.conf().timezone()
    }

    pub fn json(&self) -> bool {
        self.json
    }

    fn conf(&self) -> &Conf {
        static EMPTY: std::sync::OnceLock<Conf> = std::sync::OnceLock::new();
        self.conf
            .as_ref()
            .unwrap_or_else(|| EMPTY.get_or_init(Conf::default))
    }
}

/// Custom parser for period values
#[derive(Clone)]
struct ScopeParser;

impl TypedValueParser for ScopeParser {
    type Value = Scope;

    /// Parses `"0"`, `"Q1"`..`"Q4"` or `"1"`..`"12"`
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> std::result::Result<Self::Value, clap::Error> {
        let Some(value_str) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::DisplayHelp));
        };

        value_str
            .parse::<Scope>()
            .map_err(|e| clap::Error::raw(clap::error::ErrorKind::InvalidValue, format!("{e}\n")))
    }
}

/// Custom parser for configuration file loading
#[derive(Clone)]
struct ConfParser;

impl TypedValueParser for ConfParser {
    type Value = Conf;

    /// Parses configuration file path and loads the configuration
    ///
    /// # Errors
    /// * File not found or permission denied
    /// * Invalid TOML format
    /// * Invalid weekly hours in the configuration
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> std::result::Result<Self::Value, clap::Error> {
        let Some(file_path) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::DisplayHelp));
        };

        // Open configuration file
        let mut file = File::open(file_path).map_err(|e| {
            let error_msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("Configuration file '{}' not found", file_path),
                std::io::ErrorKind::PermissionDenied => format!("Permission denied for '{}'", file_path),
                _ => format!("Cannot access configuration file '{}': {}", file_path, e),
            };
            clap::Error::raw(clap::error::ErrorKind::InvalidValue, error_msg)
        })?;

        // Read file contents
        let mut config_content = String::new();
        file.read_to_string(&mut config_content).map_err(|e| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("Failed to read configuration file '{}': {}", file_path, e),
            )
        })?;

        // Parse TOML configuration
        toml::from_str(&config_content).map_err(|e| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("Invalid configuration in '{}': {}", file_path, e),
            )
        })
    }
}
