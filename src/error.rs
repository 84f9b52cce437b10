//! Crate-wide error type.
//!
//! Check failures are not errors in this sense: they are recovered inside
//! the runner and recorded in the report. This type covers everything that
//! legitimately aborts an invocation, such as bad configuration or suite
//! wiring mistakes.

use thiserror::Error;

/// Main error type that encompasses all possible errors in the system
#[derive(Debug, Error)]
pub enum ProbeKitError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Runner error: {0}")]
    Runner(#[from] crate::runner::RunnerError),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for probekit operations
pub type ProbeKitResult<T> = Result<T, ProbeKitError>;
