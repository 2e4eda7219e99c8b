//! Shared utility functions for agmon crates.

/// Month key utility functions.
///
/// Observations are keyed by a `YYYY-MM` string. Lexicographic order of
/// well-formed keys is chronological order, so most callers compare the
/// raw strings and only parse when they need month arithmetic.
pub mod months {
    use chrono::{Datelike, Months, NaiveDate};

    /// Month key format: "YYYY-MM"
    pub const MONTH_FORMAT: &str = "%Y-%m";

    /// Length of a well-formed month key.
    pub const MONTH_KEY_LENGTH: usize = 7;

    /// Format a NaiveDate as a "YYYY-MM" month key
    pub fn format_month(date: &NaiveDate) -> String {
        date.format(MONTH_FORMAT).to_string()
    }

    /// Parse a "YYYY-MM" month key into the first day of that month.
    pub fn parse_month(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        if s.len() != MONTH_KEY_LENGTH || s.as_bytes()[4] != b'-' {
            anyhow::bail!("month key must be of YYYY-MM format: {s:?}");
        }
        Ok(NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")?)
    }

    /// Extract the month token of a "YYYY-MM" key as a number.
    ///
    /// Only the second `-` separated token is looked at, so "2024-03" and
    /// "1999-03" both yield 3. Returns None when the token is missing or
    /// not numeric.
    pub fn month_number(s: &str) -> Option<u32> {
        s.split('-').nth(1).and_then(|t| t.trim().parse::<u32>().ok())
    }

    /// Whole calendar months from `from` to `to` (negative if `to` is earlier).
    pub fn months_between(from: &NaiveDate, to: &NaiveDate) -> i32 {
        (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
    }

    /// An iterator over the first day of every month from the start month
    /// through the end month (inclusive).
    #[derive(Clone, Eq, PartialEq, Copy, Debug)]
    pub struct MonthRange(pub NaiveDate, pub NaiveDate);

    impl Iterator for MonthRange {
        type Item = NaiveDate;
        fn next(&mut self) -> Option<Self::Item> {
            let current = self.0.with_day(1)?;
            if current > self.1 {
                return None;
            }
            match current.checked_add_months(Months::new(1)) {
                Some(next) => self.0 = next,
                // ran off the end of the calendar; make sure we stop
                None => self.0 = NaiveDate::MAX,
            }
            Some(current)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_and_format_month() {
            let date = parse_month("2024-03").unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
            assert_eq!(format_month(&date), "2024-03");
        }

        #[test]
        fn test_parse_month_rejects_bad_keys() {
            assert!(parse_month("2024-3").is_err());
            assert!(parse_month("2024/03").is_err());
            assert!(parse_month("2024-13").is_err());
            assert!(parse_month("").is_err());
        }

        #[test]
        fn test_month_number() {
            assert_eq!(month_number("2024-03"), Some(3));
            assert_eq!(month_number("2023-12"), Some(12));
            assert_eq!(month_number("2024"), None);
            assert_eq!(month_number("2024-xx"), None);
        }

        #[test]
        fn test_months_between() {
            let jan = parse_month("2024-01").unwrap();
            let apr = parse_month("2024-04").unwrap();
            let nov = parse_month("2023-11").unwrap();
            assert_eq!(months_between(&jan, &apr), 3);
            assert_eq!(months_between(&nov, &jan), 2);
            assert_eq!(months_between(&apr, &jan), -3);
        }

        #[test]
        fn test_month_range_crosses_year() {
            let start = parse_month("2023-11").unwrap();
            let end = parse_month("2024-02").unwrap();
            let keys: Vec<String> = MonthRange(start, end).map(|d| format_month(&d)).collect();
            assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
        }

        #[test]
        fn test_month_range_empty() {
            let start = parse_month("2024-02").unwrap();
            let end = parse_month("2024-01").unwrap();
            assert_eq!(MonthRange(start, end).count(), 0);
        }
    }
}

/// Score arithmetic
pub mod numbers {
    /// Round to the nearest integer, halves away from zero (62.5 -> 63).
    pub fn round_half_away(value: f64) -> f64 {
        value.round()
    }

    /// Round a percentage-style score to an integer.
    ///
    /// Negative values saturate to 0.
    pub fn round_score(value: f64) -> u32 {
        round_half_away(value) as u32
    }

    /// Arithmetic mean, None for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_round_half_away_from_zero() {
            assert_eq!(round_half_away(62.5), 63.0);
            assert_eq!(round_half_away(33.5), 34.0);
            assert_eq!(round_half_away(-2.5), -3.0);
            assert_eq!(round_half_away(66.666), 67.0);
        }

        #[test]
        fn test_round_score() {
            assert_eq!(round_score(49.5), 50);
            assert_eq!(round_score(0.4), 0);
            assert_eq!(round_score(-12.0), 0);
        }

        #[test]
        fn test_mean() {
            assert_eq!(mean(&[]), None);
            assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
        }
    }
}

/// Display formatting for dashboard output.
///
/// Aggregation treats absent values as 0; display never does. Absent or
/// non-finite values render as [`format::NOT_AVAILABLE`].
pub mod format {
    /// Placeholder for values that were not reported
    pub const NOT_AVAILABLE: &str = "N/A";

    /// Format an optional value with a fixed number of decimals
    pub fn format_value(value: Option<f64>, decimals: usize) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{v:.decimals$}"),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_value() {
            assert_eq!(format_value(Some(0.45678), 3), "0.457");
            assert_eq!(format_value(Some(0.0), 2), "0.00");
            assert_eq!(format_value(None, 3), "N/A");
            assert_eq!(format_value(Some(f64::NAN), 3), "N/A");
        }
    }
}
