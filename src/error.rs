// Error taxonomy for step training and application.
//
// Every failure aborts the whole train/apply call. Nothing here is retried
// or downgraded; the host reports the message verbatim.

use thiserror::Error;

/// Errors raised by steps, selectors and the dataset container.
#[derive(Error, Debug)]
pub enum StepError {
    /// A selector matched nothing, or named a column the schema lacks.
    #[error("Selection error: {0}")]
    Selection(String),

    /// A selected column does not hold token lists.
    #[error("Type error: list-column expected for `{column}`, found {found}")]
    Type { column: String, found: String },

    /// Unsupported stemmer name or backend option.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation not valid in the step's current lifecycle state.
    #[error("State error: {0}")]
    State(String),

    /// Malformed dataset (ragged columns, duplicate names).
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, StepError>;
