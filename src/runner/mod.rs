//! Probe runner: registration, sequential execution, reporting.
//!
//! The runner executes every registered check in registration order, converts
//! errors and timeouts into failing results, and assembles a `RunReport`
//! whose aggregate verdict maps onto the process exit code. A runner executes
//! at most one run: `run` consumes the instance.

use std::time::Instant;

use colored::Colorize;
use thiserror::Error;
use tracing::{debug, info};

use crate::checks::{Check, CheckError, CheckResult};

/// Registration-time errors. These are programming errors in the suite
/// wiring and abort immediately instead of producing a failing result.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("duplicate check name: {0}")]
    DuplicateCheck(String),
}

/// Ordered, complete record of all check outcomes for one run.
#[derive(Debug)]
pub struct RunReport {
    results: Vec<(String, CheckResult)>,
    all_passed: bool,
}

impl RunReport {
    fn new(results: Vec<(String, CheckResult)>) -> Self {
        let all_passed = results.iter().all(|(_, result)| result.passed);
        Self {
            results,
            all_passed,
        }
    }

    /// Per-check results in registration order.
    pub fn results(&self) -> &[(String, CheckResult)] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when every check passed. A run with zero checks passes vacuously.
    pub fn all_passed(&self) -> bool {
        self.all_passed
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.passed).count()
    }

    /// Exit code for automated invocation: 0 = all passed, 1 = any failure.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed {
            0
        } else {
            1
        }
    }

    /// Renders one line per check in registration order plus a summary line.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for (name, result) in &self.results {
            let marker = if result.passed {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            let note = if result.passed {
                result.detail.clone().unwrap_or_else(|| "ok".to_string())
            } else {
                result
                    .error
                    .as_ref()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "failed".to_string())
            };
            out.push_str(&format!(
                "{} {} - {} ({}ms)\n",
                marker,
                name,
                note,
                result.duration.as_millis()
            ));
        }

        let verdict = if self.all_passed {
            "OK".green().bold()
        } else {
            "FAILED".red().bold()
        };
        out.push_str(&format!(
            "{} {}/{} checks passed\n",
            verdict,
            self.passed_count(),
            self.len()
        ));

        out
    }
}

/// Executes a configured, ordered list of named checks.
pub struct ProbeRunner {
    checks: Vec<Box<dyn Check>>,
}

impl ProbeRunner {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Registers a check. Names must be unique within a run; registration
    /// order is the reporting order.
    pub fn register(&mut self, check: Box<dyn Check>) -> Result<(), RunnerError> {
        if self.checks.iter().any(|c| c.name() == check.name()) {
            return Err(RunnerError::DuplicateCheck(check.name().to_string()));
        }
        self.checks.push(check);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Runs every registered check strictly sequentially and returns the
    /// report. Checks with a timeout are abandoned on expiry; their eventual
    /// resolution is discarded with the dropped future. A failing check
    /// never aborts the run.
    pub async fn run(self) -> RunReport {
        let mut results = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let name = check.name().to_string();
            debug!(check = %name, "executing check");

            let start = Instant::now();
            let outcome = match check.timeout() {
                Some(bound) => match tokio::time::timeout(bound, check.execute()).await {
                    Ok(resolved) => resolved,
                    Err(_) => Err(CheckError::Timeout(bound.as_millis() as u64)),
                },
                None => check.execute().await,
            };
            let duration = start.elapsed();

            let result = match outcome {
                Ok(ok) => CheckResult::pass(ok).with_duration(duration),
                Err(ref error) => {
                    debug!(check = %name, error = %error, "check failed");
                    CheckResult::fail(error).with_duration(duration)
                }
            };
            results.push((name, result));
        }

        let report = RunReport::new(results);
        info!(
            checks = report.len(),
            passed = report.passed_count(),
            "run completed"
        );
        report
    }
}

impl Default for ProbeRunner {
    fn default() -> Self {
        Self::new()
    }
}
