//! Assembly of the validation report and the full dashboard report.

use agmon_core::{require_results, Alert, Metadata, MissingDataError, NdviPayload, Observation, Thresholds};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    alerts::{evaluate_thresholds, triage, AlertTriage},
    error::{AnalysisError, MetricsError},
    freshness::{freshness, missing_months, Freshness},
    growth::{GrowthAnalysis, GrowthPoint},
    metrics::Scores,
    normalize::{chart_points, CanonicalSeries, ChartPoint},
    summary::{summarize, SeriesSummary},
};

/// Data validation figures for one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub quality_score: u32,
    pub consistency_score: u32,
    pub coverage_score: u32,
    pub overall_score: u32,
    pub growth_pattern: Vec<GrowthPoint>,
    pub is_realistic: bool,
}

impl ValidationReport {
    pub fn from_series(series: &CanonicalSeries) -> Result<ValidationReport, MetricsError> {
        let scores = Scores::from_series(series)?;
        let growth = GrowthAnalysis::from_series(series);
        Ok(ValidationReport {
            quality_score: scores.quality_score,
            consistency_score: scores.consistency_score,
            coverage_score: scores.coverage_score,
            overall_score: scores.overall_score,
            growth_pattern: growth.growth_pattern,
            is_realistic: growth.is_realistic,
        })
    }
}

/// Options for [`analyze`].
///
/// Freshness is left out of the report when the latest month key cannot
/// be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalysisOptions {
    /// Reference date for freshness; freshness is skipped when None
    pub as_of: Option<NaiveDate>,
}

/// Everything the dashboard renders for one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub validation: ValidationReport,
    pub series: Vec<Observation>,
    pub chart_points: Vec<ChartPoint>,
    pub summary: SeriesSummary,
    pub alerts: AlertTriage,
    pub threshold_alerts: Vec<Alert>,
    pub thresholds: Thresholds,
    pub freshness: Option<Freshness>,
    pub missing_months: Vec<String>,
    pub metadata: Option<Metadata>,
}

/// Guard the payload and run every derivation over it.
///
/// Returns [`AnalysisError::MissingData`] without computing anything when
/// the payload has no usable observations.
pub fn analyze(
    payload: Option<&NdviPayload>,
    options: &AnalysisOptions,
) -> Result<DashboardReport, AnalysisError> {
    let payload = payload.ok_or(MissingDataError::Absent)?;
    let raw = require_results(Some(payload))?;

    let series = CanonicalSeries::from_raw(raw);
    let validation = ValidationReport::from_series(&series)?;
    let summary = summarize(&series)?;
    let freshness = options
        .as_of
        .and_then(|as_of| match freshness(&series, &as_of) {
            Ok(f) => Some(f),
            Err(e) => {
                warn!("Skipping freshness: {e}");
                None
            }
        });
    let thresholds = payload.thresholds();
    let threshold_alerts = evaluate_thresholds(&series, &thresholds);
    let alerts = triage(payload.alerts());

    debug!(
        "analyzed payload: {} months, overall score {}, {} supplied alerts, {} threshold alerts",
        series.len(),
        validation.overall_score,
        alerts.total,
        threshold_alerts.len()
    );

    Ok(DashboardReport {
        validation,
        missing_months: missing_months(&series),
        chart_points: chart_points(raw),
        series: series.into_inner(),
        summary,
        alerts,
        threshold_alerts,
        thresholds,
        freshness,
        metadata: payload.metadata.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agmon_core::{DataQuality, ImageCount};
    use agmon_utils::months::parse_month;

    fn obs(month: &str, ndvi: f64, quality: DataQuality, std_dev: f64, images: u32) -> Observation {
        let mut o = Observation::new(month);
        o.ndvi_value = Some(ndvi);
        o.data_quality = quality;
        o.std_dev = Some(std_dev);
        o.image_count = Some(ImageCount {
            total: Some(images),
            ..Default::default()
        });
        o
    }

    fn sample_payload() -> NdviPayload {
        NdviPayload::with_results(vec![
            obs("2024-03", 0.40, DataQuality::Medium, 0.02, 6),
            obs("2024-01", 0.30, DataQuality::High, 0.04, 4),
            obs("2024-02", 0.50, DataQuality::High, 0.03, 8),
            obs("2024-03", 0.90, DataQuality::High, 0.01, 12),
        ])
    }

    #[test]
    fn test_validation_report() {
        let payload = sample_payload();
        let series = CanonicalSeries::from_raw(payload.results.as_deref().unwrap());
        let report = ValidationReport::from_series(&series).unwrap();
        // 2 of 3 unique months are high quality
        assert_eq!(report.quality_score, 67);
        // avg std dev 0.03
        assert_eq!(report.consistency_score, 70);
        // avg 6 images per month
        assert_eq!(report.coverage_score, 60);
        assert_eq!(report.overall_score, 66);
        assert_eq!(report.growth_pattern.len(), 3);
        assert_eq!(report.growth_pattern[2].ndvi, 0.40);
        assert!(report.is_realistic);
    }

    #[test]
    fn test_analyze_payload() {
        let options = AnalysisOptions {
            as_of: Some(parse_month("2024-06").unwrap()),
        };
        let payload = sample_payload();
        let report = analyze(Some(&payload), &options).unwrap();
        assert_eq!(report.series.len(), 3);
        assert_eq!(report.chart_points.len(), 3);
        assert_eq!(report.chart_points[2].ndvi, 0.40);
        assert_eq!(report.summary.latest_month, "2024-03");
        assert!(report.missing_months.is_empty());
        let freshness = report.freshness.unwrap();
        assert_eq!(freshness.months_since_latest, 3);
        assert!(!freshness.is_current);
        assert!(report.alerts.is_empty());
        // 0.5 -> 0.4 is not above the default drop threshold
        assert!(report.threshold_alerts.is_empty());
    }

    #[test]
    fn test_analyze_rejects_missing_data() {
        let options = AnalysisOptions::default();
        assert_eq!(
            analyze(None, &options),
            Err(AnalysisError::MissingData(MissingDataError::Absent))
        );
        let empty = NdviPayload::with_results(Vec::new());
        assert_eq!(
            analyze(Some(&empty), &options),
            Err(AnalysisError::MissingData(MissingDataError::EmptyResults))
        );
    }

    #[test]
    fn test_analyze_is_repeatable() {
        let payload = sample_payload();
        let options = AnalysisOptions::default();
        assert_eq!(
            analyze(Some(&payload), &options),
            analyze(Some(&payload), &options)
        );
    }

    #[test]
    fn test_null_sub_source_count_still_scores() {
        let payload = NdviPayload::from_json(
            r#"{"success":true,"results":[
                {"month":"2024-01","ndviValue":0.3,"stdDev":0.01,
                 "imageCount":{"sentinel2":4,"landsat":null,"total":4},"dataQuality":"high"},
                {"month":"2024-02","ndviValue":0.5,"stdDev":0.01,
                 "imageCount":{"sentinel2":6,"landsat":null,"total":6},"dataQuality":"high"}
            ]}"#,
        )
        .unwrap();
        let report = analyze(Some(&payload), &AnalysisOptions::default()).unwrap();
        assert_eq!(report.validation.quality_score, 100);
        assert_eq!(report.validation.consistency_score, 90);
        // avg 5 images per month
        assert_eq!(report.validation.coverage_score, 50);
        assert_eq!(report.validation.overall_score, 80);
    }

    #[test]
    fn test_report_serializes_contract_fields() {
        let payload = sample_payload();
        let report = analyze(Some(&payload), &AnalysisOptions::default()).unwrap();
        let json = serde_json::to_value(&report.validation).unwrap();
        assert_eq!(json["qualityScore"], 67);
        assert_eq!(json["isRealistic"], true);
        assert_eq!(json["growthPattern"][0]["trend"], "stable");
        assert_eq!(json["growthPattern"][1]["trend"], "up");
    }
}
