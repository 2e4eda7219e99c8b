//! Month-over-month NDVI trend analysis.

use agmon_core::Observation;
use serde::Serialize;

/// Direction of NDVI change from the previous month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// One month of the growth pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub month: String,
    pub ndvi: f64,
    /// Signed change from the previous month, 0 for the first month
    pub change: f64,
    pub trend: Trend,
}

/// Growth pattern plus whether it looks like a real growing season.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthAnalysis {
    pub growth_pattern: Vec<GrowthPoint>,
    pub is_realistic: bool,
}

/// Build the growth pattern for a series of observations.
///
/// The input is sorted by month again here so the result does not depend
/// on the caller having done so. The first month is always `Stable`.
/// After that a month is `Up` only when its NDVI is strictly greater than
/// the previous one; an unchanged value is classified `Down`.
pub fn growth_pattern(series: &[Observation]) -> Vec<GrowthPoint> {
    let mut sorted: Vec<&Observation> = series.iter().collect();
    sorted.sort_by(|a, b| a.cmp_month(b));

    let mut pattern = Vec::with_capacity(sorted.len());
    let mut previous: Option<f64> = None;
    for obs in sorted {
        let ndvi = obs.ndvi_or_zero();
        let (change, trend) = match previous {
            None => (0.0, Trend::Stable),
            Some(prev) if ndvi > prev => (ndvi - prev, Trend::Up),
            Some(prev) => (ndvi - prev, Trend::Down),
        };
        pattern.push(GrowthPoint {
            month: obs.month.clone(),
            ndvi,
            change,
            trend,
        });
        previous = Some(ndvi);
    }
    pattern
}

/// True when the pattern rises at least once and falls at least once.
///
/// Strictly monotonic series and single points are flagged as unusual.
pub fn is_realistic(pattern: &[GrowthPoint]) -> bool {
    let has_up = pattern.iter().any(|p| p.trend == Trend::Up);
    let has_down = pattern.iter().any(|p| p.trend == Trend::Down);
    has_up && has_down
}

impl GrowthAnalysis {
    pub fn from_series(series: &[Observation]) -> Self {
        let growth_pattern = growth_pattern(series);
        let is_realistic = is_realistic(&growth_pattern);
        GrowthAnalysis {
            growth_pattern,
            is_realistic,
        }
    }
}
