//! Re-analysis on every pushed snapshot.
//!
//! Updates arrive as newline-delimited JSON payloads, one full snapshot of
//! the observation array per line. A reader task pushes each parsed
//! snapshot through a bounded channel; the consumer runs the analysis on
//! each one in turn and keeps nothing between snapshots.

use agmon_core::NdviPayload;
use agmon_data::{analyze, AnalysisError, AnalysisOptions, DashboardReport};
use anyhow::Context;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    files::{PayloadInput, STDIN_PATH},
    render::OutputFormat,
};

/// Default number of snapshots buffered between reader and analysis.
pub const DEFAULT_FEED_CAPACITY: usize = 8;

/// One pushed update.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Position in the feed, starting at 1
    pub sequence: u64,
    pub payload: Arc<PayloadInput>,
}

/// Result of analyzing one snapshot, printed as one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOutcome {
    pub sequence: u64,
    pub months: usize,
    pub quality_score: Option<u32>,
    pub consistency_score: Option<u32>,
    pub coverage_score: Option<u32>,
    pub overall_score: Option<u32>,
    pub is_realistic: Option<bool>,
    pub alerts: usize,
    /// Why the snapshot could not be analyzed
    pub empty_reason: Option<String>,
}

impl SnapshotOutcome {
    fn from_report(sequence: u64, report: &DashboardReport) -> Self {
        let validation = &report.validation;
        SnapshotOutcome {
            sequence,
            months: report.series.len(),
            quality_score: Some(validation.quality_score),
            consistency_score: Some(validation.consistency_score),
            coverage_score: Some(validation.coverage_score),
            overall_score: Some(validation.overall_score),
            is_realistic: Some(validation.is_realistic),
            alerts: report.alerts.total + report.threshold_alerts.len(),
            empty_reason: None,
        }
    }

    fn empty(sequence: u64, reason: String) -> Self {
        SnapshotOutcome {
            sequence,
            months: 0,
            quality_score: None,
            consistency_score: None,
            coverage_score: None,
            overall_score: None,
            is_realistic: None,
            alerts: 0,
            empty_reason: Some(reason),
        }
    }

    pub fn render_text(&self) -> String {
        match &self.empty_reason {
            Some(reason) => format!("#{} no data ({reason})", self.sequence),
            None => format!(
                "#{} {} months: quality {}% consistency {}% coverage {}% overall {}% growth {} alerts {}",
                self.sequence,
                self.months,
                self.quality_score.unwrap_or_default(),
                self.consistency_score.unwrap_or_default(),
                self.coverage_score.unwrap_or_default(),
                self.overall_score.unwrap_or_default(),
                if self.is_realistic == Some(true) {
                    "realistic"
                } else {
                    "unusual"
                },
                self.alerts
            ),
        }
    }
}

/// Create the bounded snapshot channel. A capacity of 0 is raised to 1.
pub fn snapshot_channel(capacity: usize) -> (mpsc::Sender<Snapshot>, mpsc::Receiver<Snapshot>) {
    mpsc::channel(capacity.max(1))
}

/// Read newline-delimited payloads and send each one as a snapshot.
///
/// Blank lines are skipped and lines that are not valid JSON are logged
/// and dropped. Returns the number of snapshots sent; stops early if the
/// receiver goes away.
pub async fn produce_snapshots<R>(reader: R, tx: mpsc::Sender<Snapshot>) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_number = 0u64;
    let mut sequence = 0u64;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        let payload: PayloadInput = match NdviPayload::from_json(&line) {
            Ok(payload) => Ok(payload),
            Err(agmon_core::CoreError::MissingData(reason)) => Err(reason),
            Err(e) => {
                warn!("Skipping line {line_number}: {e}");
                continue;
            }
        };
        let snapshot = Snapshot {
            sequence: sequence + 1,
            payload: Arc::new(payload),
        };
        if tx.send(snapshot).await.is_err() {
            debug!("Snapshot receiver closed after {sequence} snapshots");
            break;
        }
        sequence += 1;
    }
    Ok(sequence)
}

/// Analyze one snapshot.
pub fn process_snapshot(snapshot: &Snapshot, options: &AnalysisOptions) -> anyhow::Result<SnapshotOutcome> {
    let result = match &*snapshot.payload {
        Ok(payload) => analyze(Some(payload), options),
        Err(reason) => Err(AnalysisError::MissingData(*reason)),
    };
    match result {
        Ok(report) => Ok(SnapshotOutcome::from_report(snapshot.sequence, &report)),
        Err(AnalysisError::MissingData(reason)) => {
            warn!("Snapshot #{} has nothing to analyze: {reason}", snapshot.sequence);
            Ok(SnapshotOutcome::empty(snapshot.sequence, reason.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Drain the channel, analyzing each snapshot and handing the outcome to `sink`.
pub async fn consume_snapshots<F>(
    mut rx: mpsc::Receiver<Snapshot>,
    options: AnalysisOptions,
    mut sink: F,
) -> anyhow::Result<u64>
where
    F: FnMut(SnapshotOutcome),
{
    let mut processed = 0u64;
    while let Some(snapshot) = rx.recv().await {
        sink(process_snapshot(&snapshot, &options)?);
        processed += 1;
    }
    Ok(processed)
}

/// Run the `watch` command.
pub async fn run_watch(
    input: &str,
    capacity: usize,
    options: AnalysisOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (tx, rx) = snapshot_channel(capacity);
    let producer = if input == STDIN_PATH {
        tokio::spawn(produce_snapshots(BufReader::new(tokio::io::stdin()), tx))
    } else {
        let file = tokio::fs::File::open(input)
            .await
            .with_context(|| format!("Failed to open {input}"))?;
        tokio::spawn(produce_snapshots(BufReader::new(file), tx))
    };

    let processed = consume_snapshots(rx, options, |outcome| match format {
        OutputFormat::Text => println!("{}", outcome.render_text()),
        OutputFormat::Json => match serde_json::to_string(&outcome) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("Failed to serialize snapshot #{}: {e}", outcome.sequence),
        },
    })
    .await?;

    let sent = producer.await.context("Snapshot reader task failed")??;
    info!("Watch complete: {sent} snapshots received, {processed} analyzed");
    Ok(())
}
