//! Lecture Bash Binary
//!
//! Reads the free-times sheet, searches every timetable of the configured
//! semester and writes the lectures where enough people are free to the
//! output sheet.
//!
//! # Usage
//!
//! ```bash
//! SHEETS_ACCESS_TOKEN=ya29... cargo run --bin lecture-bash -- config/lecture-bash.toml
//! ```
//!
//! # Environment Variables
//!
//! - `LECTURE_BASH_CONFIG`: configuration file used when no path is given
//! - `SHEETS_ACCESS_TOKEN`: OAuth access token for the spreadsheet API (required)
//! - `OIS_API_URL`: timetable API base URL
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lecture_bash::clients::{GoogleSheetsClient, OisClient, SpreadsheetStore};
use lecture_bash::models::AvailabilityIndex;
use lecture_bash::services::{publish, PlanDriver, ProcessingContext};
use lecture_bash::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let config_path = env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
    info!(
        academic_year = %config.search.academic_year,
        semester = %config.search.semester,
        "Starting lecture search"
    );

    let sheets = GoogleSheetsClient::new(
        &config.sheets,
        config.sheets_token()?,
        Duration::from_secs(config.api.request_timeout_secs),
    )?;

    let times_table = sheets
        .read_range(
            &config.sheets.availability_spreadsheet_id,
            &config.sheets.availability_range,
        )
        .await
        .context("reading the free times sheet")?;
    let index = AvailabilityIndex::from_table(&times_table)
        .context("building the table of available times")?;
    println!("Constructed table of available times");
    println!("Current week: {}", index.current_week());

    let api = Arc::new(OisClient::new(&config.api)?);
    let context = ProcessingContext::new(index, &config);
    let driver = PlanDriver::new(
        api,
        context,
        config.search.clone(),
        config.sheets.max_record_columns,
    );
    let summary = driver.run().await.context("processing timetables")?;
    println!();
    println!("Plans processed in {:.1} seconds", summary.elapsed_secs());

    let written = publish(&sheets, &config.sheets, &summary)
        .await
        .context("writing found lectures")?;
    println!(
        "Output {} lectures to '{}'",
        written, config.sheets.output_range
    );

    for (time, count) in summary.lecture_times.ranked() {
        println!("{}\t{}", time, count);
    }

    Ok(())
}
