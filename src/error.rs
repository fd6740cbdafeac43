//! Error types for the working-hours calculator.
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

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the loading and parsing boundary.
///
/// The calculation itself never fails; these only come out of reading
/// holiday sources, configuration and command-line values.
#[derive(Debug, Error)]
pub enum Error {
    /// A holiday source could not be read
    #[error("cannot read holiday source '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON holiday table is not a year-keyed object
    #[error("malformed holiday table '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An iCalendar source could not be parsed
    #[error("malformed calendar '{path}': {message}")]
    Ical { path: PathBuf, message: String },

    /// Scope string outside "0", "Q1".."Q4", "1".."12"
    #[error("invalid period '{0}': expected \"0\", \"Q1\"..\"Q4\" or a month number 1-12")]
    Scope(String),

    /// Weekly hours string that does not describe up to 7 values in 0..=24
    #[error("invalid weekly hours '{value}': {reason}")]
    WeeklyHours { value: String, reason: String },

    /// Time zone name unknown to the tz database
    #[error("unknown time zone '{0}'")]
    Timezone(String),

    /// Template name not present in the configuration
    #[error("unknown template '{name}', available: {available}")]
    UnknownTemplate { name: String, available: String },
}

/// Shorthand result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
