//! Error types for popprior

use thiserror::Error;

/// popprior error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid shape parameter or support, raised at construction time
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numeric failure while building a distribution (e.g. a degenerate normalization)
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
