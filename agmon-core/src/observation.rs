use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt};

/// Quality label the fetch layer attaches to a monthly observation.
///
/// Unknown or absent labels are read as `Unavailable` ("none").
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum DataQuality {
    High,
    Medium,
    Low,
    #[default]
    Unavailable,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::High => "high",
            DataQuality::Medium => "medium",
            DataQuality::Low => "low",
            DataQuality::Unavailable => "none",
        }
    }
}

impl From<Option<String>> for DataQuality {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("high") => DataQuality::High,
            Some(s) if s.eq_ignore_ascii_case("medium") => DataQuality::Medium,
            Some(s) if s.eq_ignore_ascii_case("low") => DataQuality::Low,
            _ => DataQuality::Unavailable,
        }
    }
}

impl From<DataQuality> for &'static str {
    fn from(value: DataQuality) -> Self {
        value.as_str()
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of images that went into a monthly composite.
///
/// `sources` holds one count per sub-source (e.g. `sentinel2`, `landsat`),
/// None where the fetch layer sent null. `total` is reported separately and
/// is the only figure used for coverage scoring.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct ImageCount {
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(flatten)]
    pub sources: BTreeMap<String, Option<u32>>,
}

/// A single monthly vegetation index observation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Month key, "YYYY-MM"
    pub month: String,
    #[serde(default)]
    pub ndvi_value: Option<f64>,
    #[serde(default)]
    pub std_dev: Option<f64>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub index_type: Option<String>,
    #[serde(default)]
    pub image_count: Option<ImageCount>,
    #[serde(default)]
    pub data_quality: DataQuality,
}

impl Observation {
    /// Create an observation for `month` with every other field absent.
    pub fn new(month: &str) -> Self {
        Observation {
            month: month.to_string(),
            ndvi_value: None,
            std_dev: None,
            data_source: None,
            index_type: None,
            image_count: None,
            data_quality: DataQuality::Unavailable,
        }
    }

    /// NDVI with absent values read as 0 for aggregation.
    pub fn ndvi_or_zero(&self) -> f64 {
        self.ndvi_value.unwrap_or(0.0)
    }

    /// Standard deviation with absent values read as 0 for aggregation.
    pub fn std_dev_or_zero(&self) -> f64 {
        self.std_dev.unwrap_or(0.0)
    }

    /// Total image count with absent values read as 0 for aggregation.
    pub fn image_total(&self) -> u32 {
        self.image_count
            .as_ref()
            .and_then(|count| count.total)
            .unwrap_or(0)
    }

    pub fn is_high_quality(&self) -> bool {
        self.data_quality == DataQuality::High
    }

    /// Order two observations by their month key (string comparison).
    pub fn cmp_month(&self, other: &Self) -> Ordering {
        self.month.cmp(&other.month)
    }

    /// Group observations by data source, preserving input order per group.
    ///
    /// Observations without a source are grouped under an empty string.
    pub fn group_by_source(observations: &[Observation]) -> BTreeMap<String, Vec<&Observation>> {
        let mut result: BTreeMap<String, Vec<&Observation>> = BTreeMap::new();
        for obs in observations {
            result
                .entry(obs.data_source.clone().unwrap_or_default())
                .or_default()
                .push(obs);
        }
        result
    }
}
