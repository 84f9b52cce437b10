//! Integration tests for the probe runner's execution and reporting contract.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use probekit::checks::capability::{KeyValueStore, StorageCheck};
use probekit::checks::{Check, CheckError, CheckErrorKind, CheckKind, CheckOutcome};
use probekit::runner::{ProbeRunner, RunnerError};

struct NamedCheck {
    name: String,
    passes: bool,
}

#[async_trait]
impl Check for NamedCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Capability
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        if self.passes {
            Ok(CheckOutcome::with_detail("ok"))
        } else {
            Err(CheckError::CapabilityUnavailable("wired to fail".to_string()))
        }
    }
}

/// Probe stand-in whose future never resolves; only the runner's timeout
/// can end it.
struct NeverResolves {
    timeout: Duration,
}

#[async_trait]
impl Check for NeverResolves {
    fn name(&self) -> &str {
        "never-resolves"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Probe
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        std::future::pending().await
    }
}

/// In-memory store for capability-check scenarios.
#[derive(Default)]
struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Store whose writes are rejected, as on a read-only filesystem.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn set(&self, _key: &str, _value: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn get(&self, _key: &str) -> io::Result<Option<String>> {
        Ok(None)
    }

    fn remove(&self, _key: &str) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_every_registered_check_contributes_one_result() {
    let mut runner = ProbeRunner::new();
    for (name, passes) in [("alpha", true), ("beta", false), ("gamma", true)] {
        runner
            .register(Box::new(NamedCheck {
                name: name.to_string(),
                passes,
            }))
            .unwrap();
    }

    let report = runner.run().await;

    assert_eq!(report.len(), 3);
    let names: Vec<&str> = report.results().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn test_zero_checks_is_a_vacuous_pass() {
    let report = ProbeRunner::new().run().await;

    assert_eq!(report.len(), 0);
    assert!(report.all_passed());
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_storage_failure_does_not_stop_later_checks() {
    let mut runner = ProbeRunner::new();
    runner
        .register(Box::new(StorageCheck::new(Arc::new(ReadOnlyStore))))
        .unwrap();
    runner
        .register(Box::new(NamedCheck {
            name: "after-storage".to_string(),
            passes: true,
        }))
        .unwrap();

    let report = runner.run().await;

    assert_eq!(report.len(), 2);
    let (_, storage_result) = &report.results()[0];
    assert!(!storage_result.passed);
    assert_eq!(
        storage_result.error.as_ref().unwrap().kind,
        CheckErrorKind::CapabilityUnavailable
    );

    let (_, later_result) = &report.results()[1];
    assert!(later_result.passed);
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_storage_round_trip_passes_on_working_store() {
    let mut runner = ProbeRunner::new();
    runner
        .register(Box::new(StorageCheck::new(Arc::new(MemoryStore::default()))))
        .unwrap();

    let report = runner.run().await;

    assert!(report.all_passed());
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_timeout_bounds_the_run() {
    let mut runner = ProbeRunner::new();
    runner
        .register(Box::new(NeverResolves {
            timeout: Duration::from_millis(100),
        }))
        .unwrap();
    runner
        .register(Box::new(NamedCheck {
            name: "after-timeout".to_string(),
            passes: true,
        }))
        .unwrap();

    let start = Instant::now();
    let report = runner.run().await;
    let elapsed = start.elapsed();

    // The timed-out probe must not hang the run; generous bound for CI.
    assert!(elapsed < Duration::from_secs(2), "run took {:?}", elapsed);

    assert_eq!(report.len(), 2);
    let (_, timed_out) = &report.results()[0];
    assert!(!timed_out.passed);
    assert_eq!(
        timed_out.error.as_ref().unwrap().kind,
        CheckErrorKind::Timeout
    );
    assert!(timed_out.error.as_ref().unwrap().message.contains("100ms"));

    let (_, later) = &report.results()[1];
    assert!(later.passed);
}

#[tokio::test]
async fn test_duplicate_names_rejected_before_the_run() {
    let mut runner = ProbeRunner::new();
    runner
        .register(Box::new(NamedCheck {
            name: "storage".to_string(),
            passes: true,
        }))
        .unwrap();

    let error = runner
        .register(Box::new(NamedCheck {
            name: "storage".to_string(),
            passes: false,
        }))
        .unwrap_err();

    assert!(matches!(error, RunnerError::DuplicateCheck(_)));
}

#[tokio::test]
async fn test_independent_runs_agree_on_an_unchanged_environment() {
    let mut verdicts = Vec::new();

    for _ in 0..2 {
        let mut runner = ProbeRunner::new();
        runner
            .register(Box::new(StorageCheck::new(Arc::new(MemoryStore::default()))))
            .unwrap();
        runner
            .register(Box::new(NamedCheck {
                name: "static-outcome".to_string(),
                passes: false,
            }))
            .unwrap();

        let report = runner.run().await;
        verdicts.push(
            report
                .results()
                .iter()
                .map(|(name, result)| (name.clone(), result.passed))
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(verdicts[0], verdicts[1]);
}
