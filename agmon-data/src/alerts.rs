//! Threshold alerts and alert triage.
//!
//! Alerts from the fetch layer are an append-only log; nothing here
//! deduplicates them. [`evaluate_thresholds`] derives the same kind of
//! alert from a canonical series so they can be recomputed locally.

use agmon_core::{Alert, AlertSeverity, Observation, Thresholds};
use serde::Serialize;
use std::collections::BTreeMap;

pub const LOW_NDVI_ALERT: &str = "low_ndvi";
pub const NDVI_DROP_ALERT: &str = "ndvi_drop";
pub const HIGH_NDVI_ALERT: &str = "high_ndvi";

fn alert_for(obs: &Observation, kind: &str, severity: AlertSeverity, message: String, value: f64, threshold: f64) -> Alert {
    Alert {
        month: obs.month.clone(),
        kind: kind.to_string(),
        severity,
        message,
        data_source: obs.data_source.clone(),
        index_type: obs.index_type.clone(),
        value: Some(value),
        threshold: Some(threshold),
    }
}

/// Check each month of a series against the NDVI thresholds.
///
/// Months without an NDVI reading are skipped, and a drop is measured
/// against the previous month that had one.
pub fn evaluate_thresholds(series: &[Observation], thresholds: &Thresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let mut previous: Option<f64> = None;
    for obs in series {
        let Some(ndvi) = obs.ndvi_value else {
            continue;
        };
        if ndvi < thresholds.low {
            alerts.push(alert_for(
                obs,
                LOW_NDVI_ALERT,
                AlertSeverity::High,
                format!(
                    "NDVI {:.3} in {} is below the low threshold {:.3}",
                    ndvi, obs.month, thresholds.low
                ),
                ndvi,
                thresholds.low,
            ));
        }
        if let Some(prev) = previous {
            let drop = prev - ndvi;
            if drop > thresholds.drop {
                alerts.push(alert_for(
                    obs,
                    NDVI_DROP_ALERT,
                    AlertSeverity::Medium,
                    format!(
                        "NDVI fell by {:.3} in {} (drop threshold {:.3})",
                        drop, obs.month, thresholds.drop
                    ),
                    drop,
                    thresholds.drop,
                ));
            }
        }
        if ndvi > thresholds.high {
            alerts.push(alert_for(
                obs,
                HIGH_NDVI_ALERT,
                AlertSeverity::Low,
                format!(
                    "NDVI {:.3} in {} is above the high threshold {:.3}",
                    ndvi, obs.month, thresholds.high
                ),
                ndvi,
                thresholds.high,
            ));
        }
        previous = Some(ndvi);
    }
    alerts
}

/// Alerts split for display: high severity first, everything else after.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTriage {
    pub high: Vec<Alert>,
    pub other: Vec<Alert>,
    pub by_type: BTreeMap<String, usize>,
    pub total: usize,
}

impl AlertTriage {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Sort alerts by month (stable) and split them by severity.
pub fn triage(alerts: &[Alert]) -> AlertTriage {
    let mut sorted: Vec<&Alert> = alerts.iter().collect();
    sorted.sort_by(|a, b| a.month.cmp(&b.month));

    let mut result = AlertTriage {
        total: sorted.len(),
        ..Default::default()
    };
    for alert in sorted {
        *result.by_type.entry(alert.kind.clone()).or_default() += 1;
        if alert.severity.is_high() {
            result.high.push(alert.clone());
        } else {
            result.other.push(alert.clone());
        }
    }
    result
}
