//! Build delegate error types

use thiserror::Error;

/// Error types for build execution
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Build was cancelled")]
    Cancelled,
}
