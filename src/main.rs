//! CLI entry point for the CCS Quality Rater tool.
//!
//! Provides subcommands for scoring a single accounting period and for
//! producing a financial report over a range of months.

use anyhow::{Result, bail};
use ccs_rater::dataset::{load_config, load_profiles, load_records};
use ccs_rater::output::{StatsRow, append_row, print_json};
use ccs_rater::record::parse_date_key;
use ccs_rater::scoring::aggregate::AggregationMode;
use ccs_rater::scoring::period::score_period;
use ccs_rater::scoring::report::{MonthRange, financial_report, week_index_of_day};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ccs_rater")]
#[command(about = "A tool to score CCS quality measurements against penalty/reward rule profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one accounting period and print the statistics bundle
    Score {
        /// Dataset JSON file with day records
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// Year to score
        #[arg(short, long)]
        year: i32,

        /// Month to score (1-12)
        #[arg(short, long)]
        month: u32,

        /// Accounting week within the month (1-4); omit to score the whole month
        #[arg(short, long)]
        week: Option<u32>,

        /// Aggregation mode
        #[arg(long, value_enum, default_value_t = AggregationMode::PerInterval)]
        mode: AggregationMode,

        /// Weight samples by their apportioned production share
        #[arg(long, default_value_t = false)]
        weighted: bool,

        /// Scoring config JSON (defaults to the built-in ranges)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Rule profiles JSON (defaults to the built-in tables)
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Produce a week-by-week financial report over a month range
    Report {
        /// Dataset JSON file with day records
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        start_month: u32,

        #[arg(long)]
        end_year: i32,

        #[arg(long)]
        end_month: u32,

        /// Aggregation mode
        #[arg(long, value_enum, default_value_t = AggregationMode::PerInterval)]
        mode: AggregationMode,

        /// Weight samples by their apportioned production share
        #[arg(long, default_value_t = false)]
        weighted: bool,

        /// Scoring config JSON (defaults to the built-in ranges)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Rule profiles JSON (defaults to the built-in tables)
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ccs_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ccs_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            dataset,
            year,
            month,
            week,
            mode,
            weighted,
            config,
            profiles,
            output,
        } => {
            if let Some(week) = week {
                if !(1..=4).contains(&week) {
                    bail!("week must be between 1 and 4, got {}", week);
                }
            }

            let records = load_records(&dataset)?;
            let config = load_config(config.as_deref())?;
            let (primary, alternate) = load_profiles(profiles.as_deref())?;

            let period_records: Vec<_> = records
                .into_iter()
                .filter(|r| {
                    parse_date_key(&r.date_key).is_some_and(|(y, m, d)| {
                        y == year
                            && m == month
                            && week.is_none_or(|w| week_index_of_day(d) == Some(w as usize - 1))
                    })
                })
                .collect();

            let label = match week {
                Some(w) => format!("{}/{:02} W{}", year, month, w),
                None => format!("{}/{:02}", year, month),
            };
            info!(period = %label, records = period_records.len(), "Scoring period");

            let stats = score_period(
                &period_records,
                &config,
                &primary,
                &alternate,
                mode,
                weighted,
            );
            print_json(&stats)?;

            if let Some(output) = output {
                let row = StatsRow::from_stats(&label, mode, weighted, &stats);
                append_row(&output, &row)?;
                info!(output, "Summary row appended");
            }
        }
        Commands::Report {
            dataset,
            start_year,
            start_month,
            end_year,
            end_month,
            mode,
            weighted,
            config,
            profiles,
        } => {
            let records = load_records(&dataset)?;
            let config = load_config(config.as_deref())?;
            let (primary, alternate) = load_profiles(profiles.as_deref())?;

            let range = MonthRange {
                start_year,
                start_month,
                end_year,
                end_month,
            };
            let report = financial_report(
                &records, &config, &primary, &alternate, mode, weighted, range,
            );

            info!(
                months = report.months.len(),
                scored_weeks = report.totals.period_count,
                primary_impact = report.totals.primary.impact,
                "Report generated"
            );
            print_json(&report)?;
        }
    }

    Ok(())
}
