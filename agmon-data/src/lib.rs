//! Data processing for monthly vegetation index observations.
//!
//! This crate turns the raw, possibly duplicated and unordered observation
//! array from the fetch layer into the figures the dashboard renders:
//! a deduplicated series, chart points, validation scores, a growth
//! pattern, vegetation categories and alert triage. Everything here is a
//! pure function of its input; nothing is cached between calls.
//!
//! # Usage
//!
//! ```rust
//! use agmon_core::NdviPayload;
//! use agmon_data::report::{analyze, AnalysisOptions};
//!
//! let payload = NdviPayload::from_json(r#"{
//!     "success": true,
//!     "results": [
//!         {"month": "2024-02", "ndviValue": 0.5, "stdDev": 0.01, "imageCount": {"total": 10}, "dataQuality": "high"},
//!         {"month": "2024-01", "ndviValue": 0.3, "stdDev": 0.01, "imageCount": {"total": 10}, "dataQuality": "high"},
//!         {"month": "2024-03", "ndviValue": 0.4, "stdDev": 0.01, "imageCount": {"total": 10}, "dataQuality": "low"}
//!     ]
//! }"#).unwrap();
//!
//! let report = analyze(Some(&payload), &AnalysisOptions::default()).unwrap();
//! assert_eq!(report.validation.coverage_score, 100);
//! assert_eq!(report.validation.consistency_score, 90);
//! assert!(report.validation.is_realistic);
//! ```

pub mod alerts;
pub mod category;
pub mod error;
pub mod freshness;
pub mod growth;
pub mod metrics;
pub mod normalize;
pub mod report;
pub mod summary;

pub use category::{categorize, VegetationCategory};
pub use error::{AnalysisError, MetricsError};
pub use normalize::{chart_points, CanonicalSeries, ChartPoint};
pub use report::{analyze, AnalysisOptions, DashboardReport, ValidationReport};
