//! Quality, consistency and coverage scores over a canonical series.
//!
//! Every score is an integer percentage rounded half away from zero.
//! Absent numeric fields count as 0.

use agmon_utils::numbers::{mean, round_score};
use log::debug;
use serde::Serialize;

use crate::{error::MetricsError, normalize::CanonicalSeries};

/// Score lost per unit of average standard deviation (0.1 point per 0.001).
pub const CONSISTENCY_PENALTY: f64 = 1000.0;

/// Average images per month at which the coverage score saturates.
pub const COVERAGE_SATURATION_IMAGES: f64 = 10.0;

/// The four dashboard scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub quality_score: u32,
    pub consistency_score: u32,
    pub coverage_score: u32,
    pub overall_score: u32,
}

fn non_empty(series: &CanonicalSeries) -> Result<&CanonicalSeries, MetricsError> {
    if series.is_empty() {
        Err(MetricsError::EmptySeries)
    } else {
        Ok(series)
    }
}

/// Share of months whose data quality is "high".
pub fn quality_score(series: &CanonicalSeries) -> Result<u32, MetricsError> {
    let series = non_empty(series)?;
    let high = series.iter().filter(|obs| obs.is_high_quality()).count();
    Ok(round_score(high as f64 / series.len() as f64 * 100.0))
}

/// Mean standard deviation across the series.
pub fn average_std_dev(series: &CanonicalSeries) -> Result<f64, MetricsError> {
    let values: Vec<f64> = series.iter().map(|obs| obs.std_dev_or_zero()).collect();
    mean(&values).ok_or(MetricsError::EmptySeries)
}

/// Mean total image count per month.
pub fn average_images_per_month(series: &CanonicalSeries) -> Result<f64, MetricsError> {
    let values: Vec<f64> = series.iter().map(|obs| obs.image_total() as f64).collect();
    mean(&values).ok_or(MetricsError::EmptySeries)
}

/// `max(0, 100 - avgStdDev * 1000)`.
///
/// Not capped at 100: a negative average (outside the input contract)
/// scores above it.
pub fn consistency_score(series: &CanonicalSeries) -> Result<u32, MetricsError> {
    let avg_std_dev = average_std_dev(series)?;
    Ok(round_score(
        (100.0 - avg_std_dev * CONSISTENCY_PENALTY).max(0.0),
    ))
}

/// `min(100, avgImagesPerMonth / 10 * 100)`.
pub fn coverage_score(series: &CanonicalSeries) -> Result<u32, MetricsError> {
    let avg_images = average_images_per_month(series)?;
    Ok(round_score(
        (avg_images / COVERAGE_SATURATION_IMAGES * 100.0).min(100.0),
    ))
}

impl Scores {
    /// Compute all four scores.
    ///
    /// The overall score is the rounded mean of the three already-rounded
    /// component scores.
    pub fn from_series(series: &CanonicalSeries) -> Result<Scores, MetricsError> {
        let quality_score = quality_score(series)?;
        let consistency_score = consistency_score(series)?;
        let coverage_score = coverage_score(series)?;
        let overall_score = round_score(
            (quality_score + consistency_score + coverage_score) as f64 / 3.0,
        );
        debug!(
            "scores over {} months: quality={quality_score} consistency={consistency_score} coverage={coverage_score} overall={overall_score}",
            series.len()
        );
        Ok(Scores {
            quality_score,
            consistency_score,
            coverage_score,
            overall_score,
        })
    }
}
