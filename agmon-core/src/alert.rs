use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity attached to an alert.
///
/// Only `High` is treated specially by the dashboard; any label other than
/// high, medium or low is preserved verbatim in `Other`.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
    Other(String),
}

impl AlertSeverity {
    pub fn is_high(&self) -> bool {
        matches!(self, AlertSeverity::High)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AlertSeverity::High => "high",
            AlertSeverity::Medium => "medium",
            AlertSeverity::Low => "low",
            AlertSeverity::Other(s) => s,
        }
    }
}

impl Default for AlertSeverity {
    fn default() -> Self {
        AlertSeverity::Other(String::new())
    }
}

impl From<String> for AlertSeverity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => AlertSeverity::High,
            "medium" => AlertSeverity::Medium,
            "low" => AlertSeverity::Low,
            _ => AlertSeverity::Other(value),
        }
    }
}

impl From<AlertSeverity> for String {
    fn from(value: AlertSeverity) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flagged anomaly for one month.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub month: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub severity: AlertSeverity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub index_type: Option<String>,
    /// The measured figure that triggered the alert
    #[serde(default)]
    pub value: Option<f64>,
    /// The configured boundary that was crossed
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Default NDVI below which vegetation is flagged as stressed.
pub const DEFAULT_LOW_NDVI: f64 = 0.3;
/// Default month-over-month NDVI decrease that is flagged as a drop.
pub const DEFAULT_NDVI_DROP: f64 = 0.15;
/// Default NDVI above which vegetation is flagged as unusually dense.
pub const DEFAULT_HIGH_NDVI: f64 = 0.8;
/// Default Sentinel-1 backscatter bounds in dB.
pub const DEFAULT_RADAR_LOW_DB: f64 = -20.0;
pub const DEFAULT_RADAR_HIGH_DB: f64 = -5.0;

/// Backscatter bounds, in dB.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for RadarThresholds {
    fn default() -> Self {
        RadarThresholds {
            low: DEFAULT_RADAR_LOW_DB,
            high: DEFAULT_RADAR_HIGH_DB,
        }
    }
}

/// Alert thresholds echoed by the fetch layer.
///
/// Missing fields fall back to the `DEFAULT_*` constants.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub low: f64,
    pub drop: f64,
    pub high: f64,
    pub radar: RadarThresholds,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            low: DEFAULT_LOW_NDVI,
            drop: DEFAULT_NDVI_DROP,
            high: DEFAULT_HIGH_NDVI,
            radar: RadarThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alert() {
        let json = r#"{"month":"2024-06","type":"low_ndvi","severity":"HIGH","message":"NDVI below 0.3",
            "dataSource":"Sentinel-2","indexType":"NDVI","value":0.21,"threshold":0.3}"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.kind, "low_ndvi");
        assert!(alert.severity.is_high());
        assert_eq!(alert.value, Some(0.21));
        assert_eq!(alert.threshold, Some(0.3));
    }

    #[test]
    fn test_unknown_severity_is_preserved() {
        let alert: Alert =
            serde_json::from_str(r#"{"month":"2024-06","type":"x","severity":"critical"}"#).unwrap();
        assert_eq!(alert.severity, AlertSeverity::Other("critical".to_string()));
        assert!(!alert.severity.is_high());
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["type"], "x");
    }

    #[test]
    fn test_partial_thresholds_use_defaults() {
        let thresholds: Thresholds =
            serde_json::from_str(r#"{"low":0.25,"radar":{"high":-3.0}}"#).unwrap();
        assert_eq!(thresholds.low, 0.25);
        assert_eq!(thresholds.drop, DEFAULT_NDVI_DROP);
        assert_eq!(thresholds.high, DEFAULT_HIGH_NDVI);
        assert_eq!(thresholds.radar.low, DEFAULT_RADAR_LOW_DB);
        assert_eq!(thresholds.radar.high, -3.0);
    }
}
