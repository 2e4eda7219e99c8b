use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, io::Read};

use crate::{
    alert::{Alert, Thresholds},
    error::{MissingDataError, Result},
    observation::Observation,
};

/// Request echo and coverage information from the fetch layer.
///
/// Displayed as-is; none of it feeds the analysis.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub request: Option<Value>,
    pub coverage: Option<Value>,
    pub data_sources: Option<Value>,
    pub advantages: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Everything the fetch layer hands to the dashboard for one render.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdviPayload {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub results: Option<Vec<Observation>>,
    #[serde(default)]
    pub alerts: Option<Vec<Alert>>,
    #[serde(default)]
    pub thresholds: Option<Thresholds>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl NdviPayload {
    /// Build a successful payload around a set of observations.
    pub fn with_results(results: Vec<Observation>) -> Self {
        NdviPayload {
            success: Some(true),
            results: Some(results),
            ..Default::default()
        }
    }

    /// Parse a payload from a JSON string.
    ///
    /// A `results` field that is present but not an array is reported as
    /// [`MissingDataError::ResultsNotArray`] rather than a generic parse error.
    pub fn from_json(json: &str) -> Result<NdviPayload> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a payload from any reader producing JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<NdviPayload> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<NdviPayload> {
        if let Some(results) = value.get("results") {
            if !results.is_array() && !results.is_null() {
                return Err(MissingDataError::ResultsNotArray.into());
            }
        }
        let payload: NdviPayload = serde_json::from_value(value)?;
        debug!(
            "parsed payload: {} results, {} alerts",
            payload.results.as_ref().map_or(0, Vec::len),
            payload.alerts().len()
        );
        Ok(payload)
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.as_deref().unwrap_or_default()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds.unwrap_or_default()
    }
}

/// Check that a payload can be analyzed and return its observations.
///
/// This is the only way into the analysis: an absent payload, one marked
/// unsuccessful, or one without observations is rejected here.
pub fn require_results(payload: Option<&NdviPayload>) -> std::result::Result<&[Observation], MissingDataError> {
    let payload = payload.ok_or(MissingDataError::Absent)?;
    if payload.success == Some(false) {
        return Err(MissingDataError::Unsuccessful);
    }
    match payload.results.as_deref() {
        None => Err(MissingDataError::MissingResults),
        Some([]) => Err(MissingDataError::EmptyResults),
        Some(results) => Ok(results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    const PAYLOAD: &str = r#"{
        "success": true,
        "results": [
            {"month":"2024-02","ndviValue":0.35,"stdDev":0.04,"imageCount":{"total":8},"dataQuality":"high"},
            {"month":"2024-01","ndviValue":0.31,"stdDev":0.06,"imageCount":{"total":4},"dataQuality":"medium"}
        ],
        "alerts": [{"month":"2024-01","type":"low_ndvi","severity":"high","message":"low","value":0.31,"threshold":0.3}],
        "thresholds": {"low":0.3,"drop":0.1,"high":0.85,"radar":{"low":-18.0,"high":-6.0}},
        "metadata": {"request":{"fieldId":"f-12"},"dataSources":["Sentinel-2"],"advantages":["cloud-free"],"generatedBy":"mock"}
    }"#;

    #[test]
    fn test_parse_payload() {
        let payload = NdviPayload::from_json(PAYLOAD).unwrap();
        assert_eq!(payload.results.as_ref().unwrap().len(), 2);
        assert_eq!(payload.alerts().len(), 1);
        assert_eq!(payload.thresholds().drop, 0.1);
        let metadata = payload.metadata.unwrap();
        assert_eq!(metadata.extra["generatedBy"], "mock");
        assert_eq!(metadata.request.unwrap()["fieldId"], "f-12");
    }

    #[test]
    fn test_results_not_array() {
        let err = NdviPayload::from_json(r#"{"success":true,"results":{"month":"2024-01"}}"#).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingData(MissingDataError::ResultsNotArray)
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = NdviPayload::from_json("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn test_require_results_guards() {
        assert_eq!(require_results(None), Err(MissingDataError::Absent));

        let unsuccessful = NdviPayload {
            success: Some(false),
            results: Some(vec![Observation::new("2024-01")]),
            ..Default::default()
        };
        assert_eq!(
            require_results(Some(&unsuccessful)),
            Err(MissingDataError::Unsuccessful)
        );

        let missing = NdviPayload::from_json(r#"{"success":true}"#).unwrap();
        assert_eq!(
            require_results(Some(&missing)),
            Err(MissingDataError::MissingResults)
        );

        let null_results = NdviPayload::from_json(r#"{"results":null}"#).unwrap();
        assert_eq!(
            require_results(Some(&null_results)),
            Err(MissingDataError::MissingResults)
        );

        let empty = NdviPayload::with_results(Vec::new());
        assert_eq!(
            require_results(Some(&empty)),
            Err(MissingDataError::EmptyResults)
        );
    }

    #[test]
    fn test_require_results_accepts_unflagged_payload() {
        let payload = NdviPayload::from_json(r#"{"results":[{"month":"2024-01"}]}"#).unwrap();
        assert_eq!(require_results(Some(&payload)).unwrap().len(), 1);
    }

    #[test]
    fn test_defaults_without_thresholds() {
        let payload = NdviPayload::with_results(vec![Observation::new("2024-01")]);
        assert_eq!(payload.thresholds(), Thresholds::default());
        assert!(payload.alerts().is_empty());
    }
}
