//! Output formatting and persistence for period statistics.
//!
//! Supports pretty JSON on stdout and CSV append for keeping a running log
//! of scored periods.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::scoring::aggregate::AggregationMode;
use crate::scoring::period::PeriodStatistics;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One flat CSV row summarizing a scored period.
#[derive(Debug, Serialize)]
pub struct StatsRow {
    pub timestamp: DateTime<Utc>,
    pub period: String,
    pub mode: AggregationMode,
    pub weighted: bool,
    pub total_production: f64,
    pub total_count: u64,
    pub primary_pct: f64,
    pub primary_factor: f64,
    pub primary_impact: f64,
    pub primary_rejected: bool,
    pub alternate_pct: f64,
    pub alternate_factor: f64,
    pub alternate_impact: f64,
    pub alternate_rejected: bool,
}

impl StatsRow {
    pub fn from_stats(
        period: &str,
        mode: AggregationMode,
        weighted: bool,
        stats: &PeriodStatistics,
    ) -> Self {
        StatsRow {
            timestamp: Utc::now(),
            period: period.to_string(),
            mode,
            weighted,
            total_production: stats.total_production,
            total_count: stats.total_count,
            primary_pct: stats.primary.pct,
            primary_factor: stats.primary.factor,
            primary_impact: stats.primary.impact,
            primary_rejected: stats.primary.rejected,
            alternate_pct: stats.alternate.pct,
            alternate_factor: stats.alternate.factor,
            alternate_impact: stats.alternate.impact,
            alternate_rejected: stats.alternate.rejected,
        }
    }
}

/// Prints any serializable result as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`StatsRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_row(path: &str, row: &StatsRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV row");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}
