//! Deduplication of raw monthly observations.
//!
//! The fetch layer may return the same month more than once and in any
//! order. Two derivations are built from the raw array, each with its own
//! pass: the canonical series used by every metric, and the chart points
//! used for plotting. Both go through [`sort_dedup_by`] so they cannot
//! drift apart in how ties are broken.

use agmon_core::{DataQuality, Observation};
use agmon_utils::months::month_number;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;
use std::ops::Deref;

use crate::category::VegetationCategory;

/// Stable-sort observations by month key, then keep the first observation
/// seen for each value of `key`.
///
/// The winner among duplicates is the one that came first in the input,
/// not the most recently fetched one.
pub fn sort_dedup_by<K, F>(observations: &[Observation], key: F) -> Vec<&Observation>
where
    K: Eq + Hash,
    F: Fn(&Observation) -> K,
{
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by(|a, b| a.cmp_month(b));
    let mut seen: HashSet<K> = HashSet::with_capacity(sorted.len());
    sorted.retain(|obs| seen.insert(key(*obs)));
    sorted
}

/// Deduplicated observations in ascending month order.
///
/// Holds at most one observation per month key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalSeries(Vec<Observation>);

impl CanonicalSeries {
    /// Build the canonical series from a raw observation array.
    pub fn from_raw(raw: &[Observation]) -> Self {
        let series: Vec<Observation> = sort_dedup_by(raw, |obs| obs.month.clone())
            .into_iter()
            .cloned()
            .collect();
        debug!(
            "canonical series: {} raw observations, {} unique months",
            raw.len(),
            series.len()
        );
        CanonicalSeries(series)
    }

    pub fn into_inner(self) -> Vec<Observation> {
        self.0
    }
}

impl Deref for CanonicalSeries {
    type Target = [Observation];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A chart-ready data point.
///
/// Absent NDVI and standard deviation are plotted as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Month key, "YYYY-MM"
    pub month: String,
    /// Calendar month taken from the key (1-12), None if the key is malformed
    pub month_number: Option<u32>,
    pub ndvi: f64,
    pub std_dev: f64,
    pub image_count: u32,
    pub data_quality: DataQuality,
    pub data_source: Option<String>,
    pub category: VegetationCategory,
}

impl From<&Observation> for ChartPoint {
    fn from(obs: &Observation) -> Self {
        let ndvi = obs.ndvi_or_zero();
        ChartPoint {
            month: obs.month.clone(),
            month_number: month_number(&obs.month),
            ndvi,
            std_dev: obs.std_dev_or_zero(),
            image_count: obs.image_total(),
            data_quality: obs.data_quality,
            data_source: obs.data_source.clone(),
            category: VegetationCategory::from_ndvi(ndvi),
        }
    }
}

/// Build chart points straight from the raw observation array.
///
/// This is a second dedup pass over `raw`, keyed on the full month string,
/// and does not reuse the canonical series.
pub fn chart_points(raw: &[Observation]) -> Vec<ChartPoint> {
    sort_dedup_by(raw, |obs| obs.month.clone())
        .into_iter()
        .map(ChartPoint::from)
        .collect()
}
