//! Working-hours calendar command-line tool.
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

use clap::Parser;
use log::info;
use workhours::{HolidayProvider, WorkTimeCalculator, report};

mod cli;

/// Main entry point for the working-hours calculator
///
/// # Usage Examples
/// ```bash
/// # Whole current year, five-day week, holidays from the config
/// workhours -c config.toml
///
/// # Second quarter of 2024 for a six-day week
/// workhours -c config.toml -y 2024 -p Q2 -w 7,7,7,7,7,5,0
///
/// # March 2025 as JSON, weekends only
/// workhours -y 2025 -p 3 -i --json
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Parse command-line arguments
    let cli = cli::Cli::parse();
    let hours = cli.weekly_hours()?;
    let ignore_holidays = cli.ignore_holidays();

    // Holiday data is loaded once before any calculation
    let mut provider = HolidayProvider::new(cli.holiday_sources()).with_zone(cli.timezone()?);
    let holidays = provider.load().await;

    if !ignore_holidays && !hours.is_intensive() {
        info!("Weekly hours {hours} are below 40 with fewer than two 8-hour days, pre-holiday days are not shortened");
    }

    let calculator = WorkTimeCalculator::new(holidays);
    let summary = calculator.calculate_summary(cli.year(), cli.scope(), &hours, ignore_holidays);

    // Output result
    if cli.json() {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report::write_report(&mut std::io::stdout().lock(), &summary)?;
    }
    Ok(())
}
