//! Synchronous capability checks.
//!
//! Each check verifies that a host-provided capability is present and
//! minimally functional. Capabilities are injected as trait-object handles at
//! construction rather than reached for as ambient state, so every check can
//! be exercised against fake implementations.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tempfile::TempDir;

use super::{Check, CheckError, CheckKind, CheckOutcome};

/// Minimal key-value storage capability: set/get/remove by string key.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Scratch-file store backed by a temporary directory. The directory is
/// removed when the store is dropped.
pub struct ScratchStore {
    dir: TempDir,
}

impl ScratchStore {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(key)
    }
}

impl KeyValueStore for ScratchStore {
    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::write(self.entry_path(key), value)
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        std::fs::remove_file(self.entry_path(key))
    }
}

/// Verifies the storage capability with a set/get/remove round trip.
pub struct StorageCheck {
    store: Arc<dyn KeyValueStore>,
}

impl StorageCheck {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

const ROUND_TRIP_KEY: &str = "test";
const ROUND_TRIP_VALUE: &str = "value";

#[async_trait]
impl Check for StorageCheck {
    fn name(&self) -> &str {
        "storage-roundtrip"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Capability
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        self.store
            .set(ROUND_TRIP_KEY, ROUND_TRIP_VALUE)
            .map_err(|e| CheckError::CapabilityUnavailable(format!("set failed: {}", e)))?;

        let retrieved = self
            .store
            .get(ROUND_TRIP_KEY)
            .map_err(|e| CheckError::CapabilityUnavailable(format!("get failed: {}", e)))?;

        self.store
            .remove(ROUND_TRIP_KEY)
            .map_err(|e| CheckError::CapabilityUnavailable(format!("remove failed: {}", e)))?;

        match retrieved.as_deref() {
            Some(ROUND_TRIP_VALUE) => Ok(CheckOutcome::with_detail("set/get/remove round trip")),
            other => Err(CheckError::CapabilityUnavailable(format!(
                "round trip returned {:?}, expected {:?}",
                other, ROUND_TRIP_VALUE
            ))),
        }
    }
}

/// Network-fetch capability: reports whether HTTP requests can be issued.
pub trait HttpTransport: Send + Sync {
    fn is_available(&self) -> bool;
    fn describe(&self) -> String;
}

/// Production transport backed by a shared `reqwest::Client`. Construction
/// failure is captured instead of propagated so the availability check can
/// report it.
pub struct ReqwestTransport {
    client: Option<Client>,
    build_error: Option<String>,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => Self {
                client: Some(client),
                build_error: None,
            },
            Err(e) => Self {
                client: None,
                build_error: Some(e.to_string()),
            },
        }
    }

    /// The underlying client, when construction succeeded. Probes clone this
    /// handle; `reqwest::Client` is internally reference-counted.
    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }
}

impl HttpTransport for ReqwestTransport {
    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn describe(&self) -> String {
        match &self.build_error {
            None => "HTTP client ready".to_string(),
            Some(e) => format!("HTTP client unavailable: {}", e),
        }
    }
}

/// Verifies the network-fetch capability exists.
pub struct TransportCheck {
    transport: Arc<dyn HttpTransport>,
}

impl TransportCheck {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Check for TransportCheck {
    fn name(&self) -> &str {
        "http-transport"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Capability
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        if self.transport.is_available() {
            Ok(CheckOutcome::with_detail(self.transport.describe()))
        } else {
            Err(CheckError::CapabilityUnavailable(self.transport.describe()))
        }
    }
}

/// A configured name-generator capability. Only its existence is checked;
/// the generate-endpoint probe exercises name generation for real and the
/// two checks are deliberately unrelated.
pub trait NameGenerator: Send + Sync {
    fn describe(&self) -> String;
}

/// Generator handle declared in configuration (an external command the
/// deployment is expected to ship).
pub struct ConfiguredGenerator {
    command: String,
}

impl ConfiguredGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl NameGenerator for ConfiguredGenerator {
    fn describe(&self) -> String {
        format!("generator command {:?}", self.command)
    }
}

/// Verifies that a name-generator handle is configured at all.
pub struct GeneratorCheck {
    generator: Option<Arc<dyn NameGenerator>>,
}

impl GeneratorCheck {
    pub fn new(generator: Option<Arc<dyn NameGenerator>>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Check for GeneratorCheck {
    fn name(&self) -> &str {
        "name-generator"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Capability
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        match &self.generator {
            Some(generator) => Ok(CheckOutcome::with_detail(generator.describe())),
            None => Err(CheckError::CapabilityUnavailable(
                "no name generator configured".to_string(),
            )),
        }
    }
}
