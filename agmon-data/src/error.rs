use agmon_core::MissingDataError;
use thiserror::Error;

/// Errors raised by aggregates over a canonical series.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// An aggregate was requested over a series with no observations
    #[error("Cannot compute metrics over an empty series")]
    EmptySeries,

    /// A month key needed for date arithmetic is malformed
    #[error("Invalid month key: {0}")]
    InvalidMonth(String),
}

/// Why a dashboard report could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    MissingData(#[from] MissingDataError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}
