//! Dashboard report for a single payload.

use agmon_data::{analyze, AnalysisError, AnalysisOptions, DashboardReport};
use agmon_utils::months::parse_month;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::io::Write;

use crate::{
    files::{load_payload, open_output, PayloadInput},
    render::{render_empty_state, render_report, OutputFormat},
};

/// Parse `--as-of`, defaulting to today.
pub fn as_of_date(as_of: Option<&str>) -> anyhow::Result<NaiveDate> {
    match as_of {
        Some(month) => parse_month(month),
        None => Ok(Local::now().naive_local().date()),
    }
}

/// Analyze a loaded payload.
///
/// `Ok(None)` means there was nothing to analyze; the reason has already
/// been written to `out` as an empty state.
pub fn report_payload<W: Write>(
    input: &PayloadInput,
    options: &AnalysisOptions,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<Option<DashboardReport>> {
    let result = match input {
        Ok(payload) => analyze(Some(payload), options),
        Err(reason) => Err(AnalysisError::MissingData(*reason)),
    };
    match result {
        Ok(report) => {
            match format {
                OutputFormat::Text => out.write_all(render_report(&report).as_bytes())?,
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &report)?;
                    writeln!(out)?;
                }
            }
            Ok(Some(report))
        }
        Err(AnalysisError::MissingData(reason)) => {
            warn!("Nothing to analyze: {reason}");
            match format {
                OutputFormat::Text => out.write_all(render_empty_state(&reason).as_bytes())?,
                OutputFormat::Json => {
                    let empty = serde_json::json!({ "empty": true, "reason": reason.to_string() });
                    serde_json::to_writer_pretty(&mut *out, &empty)?;
                    writeln!(out)?;
                }
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the `report` command.
pub fn run_report(
    input: &str,
    as_of: Option<&str>,
    format: OutputFormat,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let options = AnalysisOptions {
        as_of: Some(as_of_date(as_of)?),
    };
    let payload = load_payload(input)?;
    let mut out = open_output(output)?;
    if let Some(report) = report_payload(&payload, &options, format, &mut out)? {
        info!(
            "Report complete: {} months, overall score {}",
            report.series.len(),
            report.validation.overall_score
        );
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::read_payload;
    use agmon_core::MissingDataError;

    const PAYLOAD: &str = r#"{
        "success": true,
        "results": [
            {"month":"2024-01","ndviValue":0.3,"stdDev":0.01,"imageCount":{"total":5},"dataQuality":"high"},
            {"month":"2024-02","ndviValue":0.5,"stdDev":0.01,"imageCount":{"total":5},"dataQuality":"high"},
            {"month":"2024-03","ndviValue":0.4,"stdDev":0.01,"imageCount":{"total":5},"dataQuality":"high"}
        ]
    }"#;

    fn options() -> AnalysisOptions {
        AnalysisOptions {
            as_of: Some(as_of_date(Some("2024-04")).unwrap()),
        }
    }

    #[test]
    fn test_report_json() {
        let input = read_payload(PAYLOAD.as_bytes()).unwrap();
        let mut out = Vec::new();
        let report = report_payload(&input, &options(), OutputFormat::Json, &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(report.validation.overall_score, 80);
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["validation"]["qualityScore"], 100);
        assert_eq!(json["validation"]["consistencyScore"], 90);
        assert_eq!(json["validation"]["coverageScore"], 50);
        assert_eq!(json["freshness"]["monthsSinceLatest"], 1);
    }

    #[test]
    fn test_report_empty_state() {
        let input = read_payload(r#"{"success":false,"results":[]}"#.as_bytes()).unwrap();
        let mut out = Vec::new();
        let report = report_payload(&input, &options(), OutputFormat::Text, &mut out).unwrap();
        assert!(report.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("No satellite observations"));
    }

    #[test]
    fn test_report_empty_state_json() {
        let input: PayloadInput = Err(MissingDataError::ResultsNotArray);
        let mut out = Vec::new();
        report_payload(&input, &options(), OutputFormat::Json, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["empty"], true);
    }

    #[test]
    fn test_as_of_date() {
        assert!(as_of_date(Some("2024-13")).is_err());
        assert!(as_of_date(None).is_ok());
    }
}
