//! Check abstraction for the probe suite.
//!
//! A check is one independent, named verification unit: either a synchronous
//! capability check against an injected handle, or an asynchronous probe that
//! performs a real network round trip under a timeout. Checks report their
//! outcome through `CheckResult` and never abort the surrounding run.

pub mod capability;
pub mod probe;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// How a check executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Synchronous verification of a host-provided capability.
    Capability,
    /// Asynchronous network probe, bounded by a timeout.
    Probe,
}

/// Classification of a check failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckErrorKind {
    CapabilityUnavailable,
    NetworkFailure,
    ProtocolFailure,
    Timeout,
}

impl CheckErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckErrorKind::CapabilityUnavailable => "capability unavailable",
            CheckErrorKind::NetworkFailure => "network failure",
            CheckErrorKind::ProtocolFailure => "protocol failure",
            CheckErrorKind::Timeout => "timeout",
        }
    }
}

/// Errors that can surface from a check's execution.
///
/// All variants are recovered by the runner and converted into a failing
/// `CheckResult`; none propagate out of a run.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("protocol failure: {0}")]
    Protocol(String),

    #[error("timed out after {0}ms")]
    Timeout(u64),
}

impl CheckError {
    pub fn kind(&self) -> CheckErrorKind {
        match self {
            CheckError::CapabilityUnavailable(_) => CheckErrorKind::CapabilityUnavailable,
            CheckError::Network(_) => CheckErrorKind::NetworkFailure,
            CheckError::Protocol(_) => CheckErrorKind::ProtocolFailure,
            CheckError::Timeout(_) => CheckErrorKind::Timeout,
        }
    }
}

/// Recorded form of a check failure inside a `CheckResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub kind: CheckErrorKind,
}

impl From<&CheckError> for ErrorInfo {
    fn from(error: &CheckError) -> Self {
        Self {
            message: error.to_string(),
            kind: error.kind(),
        }
    }
}

/// Successful outcome of a check, with an optional human-readable detail.
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub detail: Option<String>,
}

impl CheckOutcome {
    /// Outcome with no detail beyond "it worked".
    pub fn passed() -> Self {
        Self::default()
    }

    /// Outcome carrying a detail string (e.g. the name a probe received).
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

/// Result of one check. Produced exactly once per check per run and never
/// mutated after creation.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: Option<String>,
    pub error: Option<ErrorInfo>,
    pub duration: Duration,
}

impl CheckResult {
    /// Creates a passing result from a check outcome.
    pub fn pass(outcome: CheckOutcome) -> Self {
        Self {
            passed: true,
            detail: outcome.detail,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Creates a failing result from a check error.
    pub fn fail(error: &CheckError) -> Self {
        Self {
            passed: false,
            detail: None,
            error: Some(ErrorInfo::from(error)),
            duration: Duration::ZERO,
        }
    }

    /// Sets how long the check took.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// One independent, named verification unit registered with the runner.
///
/// Checks are immutable once registered and must not share mutable state;
/// each is a pure function of the environment it inspects.
#[async_trait]
pub trait Check: Send + Sync {
    /// Unique name of the check within a run.
    fn name(&self) -> &str;

    fn kind(&self) -> CheckKind;

    /// Execution bound for asynchronous checks. The runner abandons the
    /// pending future on expiry.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError>;
}
