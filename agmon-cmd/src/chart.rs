//! Chart point export.

use agmon_core::require_results;
use agmon_data::{chart_points, ChartPoint};
use clap::ValueEnum;
use log::{info, warn};
use std::io::Write;

use crate::{
    files::{load_payload, open_output},
    render::render_empty_state,
};

/// Output format for chart points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartFormat {
    Csv,
    Json,
}

/// Write chart points as CSV with a header row.
///
/// Absent optional fields are written as empty cells.
pub fn write_chart_csv<W: Write>(points: &[ChartPoint], out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for point in points {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Run the `chart` command.
pub fn run_chart(input: &str, format: ChartFormat, output: Option<&str>) -> anyhow::Result<()> {
    let payload = load_payload(input)?;
    let raw = match payload.as_ref().map_err(|reason| *reason).and_then(|p| require_results(Some(p))) {
        Ok(raw) => raw,
        Err(reason) => {
            warn!("Nothing to chart: {reason}");
            eprint!("{}", render_empty_state(&reason));
            return Ok(());
        }
    };

    let points = chart_points(raw);
    let mut out = open_output(output)?;
    match format {
        ChartFormat::Csv => write_chart_csv(&points, &mut out)?,
        ChartFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &points)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    info!("Wrote {} chart points", points.len());
    Ok(())
}
