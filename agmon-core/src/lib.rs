//! Core types for monthly satellite vegetation observations.
//!
//! These types mirror the JSON contract of the fetch layer: a payload with
//! `results` (monthly observations), `alerts`, `thresholds` and `metadata`.
//! Field names are kept camelCase on the wire.

pub mod alert;
pub mod error;
pub mod observation;
pub mod payload;

pub use alert::{Alert, AlertSeverity, RadarThresholds, Thresholds};
pub use error::{CoreError, MissingDataError, Result};
pub use observation::{DataQuality, ImageCount, Observation};
pub use payload::{require_results, Metadata, NdviPayload};
