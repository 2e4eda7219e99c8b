//! Headline figures for the dashboard summary cards.

use agmon_core::{DataQuality, Observation};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{category::VegetationCategory, error::MetricsError};

/// Summary statistics for a canonical series.
///
/// NDVI statistics only use months that reported a value; they are None
/// when no month did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub months: usize,
    pub months_with_ndvi: usize,
    pub average_ndvi: Option<f64>,
    pub min_ndvi: Option<f64>,
    pub max_ndvi: Option<f64>,
    pub latest_month: String,
    pub latest_ndvi: Option<f64>,
    pub latest_category: Option<VegetationCategory>,
    pub by_source: BTreeMap<String, usize>,
    pub by_quality: BTreeMap<DataQuality, usize>,
}

/// Summarize a series; the last element is taken as the latest month.
pub fn summarize(series: &[Observation]) -> Result<SeriesSummary, MetricsError> {
    let latest = series.last().ok_or(MetricsError::EmptySeries)?;
    let values: Vec<f64> = series.iter().filter_map(|obs| obs.ndvi_value).collect();

    let average_ndvi = agmon_utils::numbers::mean(&values);
    let min_ndvi = values.iter().copied().reduce(f64::min);
    let max_ndvi = values.iter().copied().reduce(f64::max);

    let by_source: BTreeMap<String, usize> = Observation::group_by_source(series)
        .into_iter()
        .map(|(source, group)| (source, group.len()))
        .collect();
    let mut by_quality: BTreeMap<DataQuality, usize> = BTreeMap::new();
    for obs in series {
        *by_quality.entry(obs.data_quality).or_default() += 1;
    }

    Ok(SeriesSummary {
        months: series.len(),
        months_with_ndvi: values.len(),
        average_ndvi,
        min_ndvi,
        max_ndvi,
        latest_month: latest.month.clone(),
        latest_ndvi: latest.ndvi_value,
        latest_category: latest.ndvi_value.map(VegetationCategory::from_ndvi),
        by_source,
        by_quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(month: &str, ndvi: Option<f64>, source: &str, quality: DataQuality) -> Observation {
        let mut o = Observation::new(month);
        o.ndvi_value = ndvi;
        o.data_source = Some(source.to_string());
        o.data_quality = quality;
        o
    }

    #[test]
    fn test_summarize() {
        let series = vec![
            obs("2024-01", Some(0.25), "Sentinel-2", DataQuality::High),
            obs("2024-02", None, "Landsat", DataQuality::Unavailable),
            obs("2024-03", Some(0.75), "Sentinel-2", DataQuality::High),
        ];
        let summary = summarize(&series).unwrap();
        assert_eq!(summary.months, 3);
        assert_eq!(summary.months_with_ndvi, 2);
        assert_eq!(summary.average_ndvi, Some(0.5));
        assert_eq!(summary.min_ndvi, Some(0.25));
        assert_eq!(summary.max_ndvi, Some(0.75));
        assert_eq!(summary.latest_month, "2024-03");
        assert_eq!(
            summary.latest_category,
            Some(VegetationCategory::ExcellentVegetation)
        );
        assert_eq!(summary.by_source["Sentinel-2"], 2);
        assert_eq!(summary.by_quality[&DataQuality::High], 2);
        assert_eq!(summary.by_quality[&DataQuality::Unavailable], 1);
    }

    #[test]
    fn test_summarize_without_ndvi() {
        let series = vec![obs("2024-01", None, "Landsat", DataQuality::Low)];
        let summary = summarize(&series).unwrap();
        assert_eq!(summary.average_ndvi, None);
        assert_eq!(summary.min_ndvi, None);
        assert_eq!(summary.latest_category, None);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), Err(MetricsError::EmptySeries));
    }
}
