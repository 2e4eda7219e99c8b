//! How current a series is, and which months it is missing.

use agmon_core::Observation;
use agmon_utils::months::{format_month, months_between, parse_month, MonthRange};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::MetricsError;

/// A series is current when its latest month is at most this far behind.
pub const CURRENT_WITHIN_MONTHS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Freshness {
    pub latest_month: String,
    /// Whole months from the latest observation to the as-of month
    pub months_since_latest: u32,
    pub is_current: bool,
}

/// Compare the latest month of a series with an as-of date.
///
/// A latest month after `as_of` counts as 0 months behind.
pub fn freshness(series: &[Observation], as_of: &NaiveDate) -> Result<Freshness, MetricsError> {
    let latest = series
        .iter()
        .map(|obs| obs.month.as_str())
        .max()
        .ok_or(MetricsError::EmptySeries)?;
    let latest_date =
        parse_month(latest).map_err(|_| MetricsError::InvalidMonth(latest.to_string()))?;
    let months_since_latest = months_between(&latest_date, as_of).max(0) as u32;
    Ok(Freshness {
        latest_month: latest.to_string(),
        months_since_latest,
        is_current: months_since_latest <= CURRENT_WITHIN_MONTHS,
    })
}

/// Month keys between the first and last observation that have no data.
///
/// Malformed month keys are ignored.
pub fn missing_months(series: &[Observation]) -> Vec<String> {
    let present: HashSet<NaiveDate> = series
        .iter()
        .filter_map(|obs| parse_month(&obs.month).ok())
        .collect();
    let (Some(first), Some(last)) = (present.iter().min(), present.iter().max()) else {
        return Vec::new();
    };
    MonthRange(*first, *last)
        .filter(|month| !present.contains(month))
        .map(|month| format_month(&month))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months(keys: &[&str]) -> Vec<Observation> {
        keys.iter().map(|k| Observation::new(k)).collect()
    }

    fn date(key: &str) -> NaiveDate {
        parse_month(key).unwrap()
    }

    #[test]
    fn test_freshness_current() {
        let series = months(&["2024-01", "2024-05", "2024-03"]);
        let result = freshness(&series, &date("2024-06")).unwrap();
        assert_eq!(result.latest_month, "2024-05");
        assert_eq!(result.months_since_latest, 1);
        assert!(result.is_current);
    }

    #[test]
    fn test_freshness_stale_across_year() {
        let series = months(&["2023-10"]);
        let result = freshness(&series, &date("2024-02")).unwrap();
        assert_eq!(result.months_since_latest, 4);
        assert!(!result.is_current);
    }

    #[test]
    fn test_freshness_future_data_clamps() {
        let series = months(&["2024-09"]);
        let result = freshness(&series, &date("2024-06")).unwrap();
        assert_eq!(result.months_since_latest, 0);
        assert!(result.is_current);
    }

    #[test]
    fn test_freshness_errors() {
        assert_eq!(
            freshness(&[], &date("2024-06")),
            Err(MetricsError::EmptySeries)
        );
        assert_eq!(
            freshness(&months(&["June"]), &date("2024-06")),
            Err(MetricsError::InvalidMonth("June".to_string()))
        );
    }

    #[test]
    fn test_missing_months() {
        let series = months(&["2023-11", "2024-02", "2023-12", "bogus"]);
        assert_eq!(missing_months(&series), vec!["2024-01"]);
        assert!(missing_months(&months(&["2024-01", "2024-02"])).is_empty());
        assert!(missing_months(&[]).is_empty());
    }
}
