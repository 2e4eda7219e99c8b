//! Command implementations for the agmon CLI.
//!
//! Provides subcommands for analyzing satellite vegetation payloads:
//! one-off reports, chart exports, alert triage, NDVI categories, and
//! re-analysis of a stream of pushed snapshots.

use agmon_data::{AnalysisOptions, VegetationCategory};
use clap::Subcommand;

pub mod alerts;
pub mod chart;
pub mod files;
pub mod render;
pub mod report;
pub mod watch;

use chart::ChartFormat;
use render::OutputFormat;
use watch::DEFAULT_FEED_CAPACITY;

#[derive(Subcommand)]
pub enum Command {
    /// Compute validation scores, growth pattern and alerts for a payload
    Report {
        /// Payload JSON file (.json or .json.gz), or - for stdin
        #[arg(short = 'i', long, default_value = files::STDIN_PATH)]
        input: String,

        /// Reference month (YYYY-MM) for data freshness; defaults to today
        #[arg(long)]
        as_of: Option<String>,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output path; defaults to stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Export deduplicated chart points
    Chart {
        /// Payload JSON file (.json or .json.gz), or - for stdin
        #[arg(short = 'i', long, default_value = files::STDIN_PATH)]
        input: String,

        #[arg(short = 'f', long, value_enum, default_value_t = ChartFormat::Csv)]
        format: ChartFormat,

        /// Output path; defaults to stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Triage supplied alerts and re-check NDVI thresholds
    Alerts {
        /// Payload JSON file (.json or .json.gz), or - for stdin
        #[arg(short = 'i', long, default_value = files::STDIN_PATH)]
        input: String,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output path; defaults to stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Print the vegetation category for NDVI values
    Categorize {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Re-analyze every payload pushed as newline-delimited JSON
    Watch {
        /// Newline-delimited payload file, or - for stdin
        #[arg(short = 'i', long, default_value = files::STDIN_PATH)]
        input: String,

        /// Snapshots buffered between reader and analysis
        #[arg(long, default_value_t = DEFAULT_FEED_CAPACITY)]
        capacity: usize,

        /// Reference month (YYYY-MM) for data freshness; defaults to today
        #[arg(long)]
        as_of: Option<String>,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Format `value<TAB>category` for each NDVI value.
///
/// NaN has no category and is rejected.
pub fn categorize_values(values: &[f64]) -> anyhow::Result<Vec<String>> {
    values
        .iter()
        .map(|value| {
            if value.is_nan() {
                anyhow::bail!("NDVI value must be a number");
            }
            Ok(format!("{value}\t{}", VegetationCategory::from_ndvi(*value)))
        })
        .collect()
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Report {
            input,
            as_of,
            format,
            output,
        } => report::run_report(&input, as_of.as_deref(), format, output.as_deref()),
        Command::Chart {
            input,
            format,
            output,
        } => chart::run_chart(&input, format, output.as_deref()),
        Command::Alerts {
            input,
            format,
            output,
        } => alerts::run_alerts(&input, format, output.as_deref()),
        Command::Categorize { values } => {
            for line in categorize_values(&values)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::Watch {
            input,
            capacity,
            as_of,
            format,
        } => {
            let options = AnalysisOptions {
                as_of: Some(report::as_of_date(as_of.as_deref())?),
            };
            watch::run_watch(&input, capacity, options, format).await
        }
    }
}
