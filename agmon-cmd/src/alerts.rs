//! Alert triage for a single payload.

use agmon_core::{require_results, Alert};
use agmon_data::{
    alerts::{evaluate_thresholds, triage, AlertTriage},
    CanonicalSeries,
};
use log::{info, warn};
use serde_json::json;
use std::io::Write;

use crate::{
    files::{load_payload, open_output, PayloadInput},
    render::{render_alert, render_empty_state, render_triage, OutputFormat},
};

/// Triage supplied alerts and recompute threshold alerts for a loaded payload.
///
/// Payloads that fail the data guard get an empty state and no triage;
/// `Ok(None)` is returned in that case.
pub fn alerts_payload<W: Write>(
    input: &PayloadInput,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<Option<(AlertTriage, Vec<Alert>)>> {
    let guarded = input
        .as_ref()
        .map_err(|reason| *reason)
        .and_then(|payload| require_results(Some(payload)).map(|raw| (payload, raw)));
    let (payload, raw) = match guarded {
        Ok(found) => found,
        Err(reason) => {
            warn!("Nothing to triage: {reason}");
            match format {
                OutputFormat::Text => out.write_all(render_empty_state(&reason).as_bytes())?,
                OutputFormat::Json => {
                    let empty = json!({ "empty": true, "reason": reason.to_string() });
                    serde_json::to_writer_pretty(&mut *out, &empty)?;
                    writeln!(out)?;
                }
            }
            return Ok(None);
        }
    };

    let thresholds = payload.thresholds();
    let supplied = triage(payload.alerts());
    let derived = evaluate_thresholds(&CanonicalSeries::from_raw(raw), &thresholds);

    match format {
        OutputFormat::Text => {
            out.write_all(render_triage(&supplied).as_bytes())?;
            writeln!(out, "Threshold alerts: {}", derived.len())?;
            for alert in &derived {
                writeln!(out, "  {}", render_alert(alert))?;
            }
        }
        OutputFormat::Json => {
            let body = json!({
                "alerts": &supplied,
                "thresholdAlerts": &derived,
                "thresholds": thresholds,
            });
            serde_json::to_writer_pretty(&mut *out, &body)?;
            writeln!(out)?;
        }
    }
    Ok(Some((supplied, derived)))
}

/// Run the `alerts` command.
pub fn run_alerts(input: &str, format: OutputFormat, output: Option<&str>) -> anyhow::Result<()> {
    let payload = load_payload(input)?;
    let mut out = open_output(output)?;
    if let Some((supplied, derived)) = alerts_payload(&payload, format, &mut out)? {
        info!(
            "Triaged {} supplied alerts, {} threshold alerts",
            supplied.total,
            derived.len()
        );
    }
    out.flush()?;
    Ok(())
}
