/// Error types for the agmon core library
use thiserror::Error;

/// Reasons a payload cannot be analyzed.
///
/// These are surfaced to the caller so it can render an empty state; the
/// analytic core is never invoked once one of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingDataError {
    /// No payload was supplied at all
    #[error("No observation payload was supplied")]
    Absent,

    /// The fetch layer marked the payload unsuccessful
    #[error("Observation payload reports an unsuccessful fetch")]
    Unsuccessful,

    /// The payload has no `results` field
    #[error("Observation payload has no results")]
    MissingResults,

    /// The `results` field is present but not an array
    #[error("Observation payload results is not an array")]
    ResultsNotArray,

    /// The `results` array is empty
    #[error("Observation payload results is empty")]
    EmptyResults,
}

/// Main error type for agmon core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Failed to read or parse JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload cannot be analyzed
    #[error(transparent)]
    MissingData(#[from] MissingDataError),
}

/// Type alias for Results using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
