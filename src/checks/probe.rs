//! Asynchronous HTTP probes against the deployment under test.
//!
//! Each probe performs one real network round trip. The runner bounds every
//! probe with its declared timeout; a probe that does not resolve in time is
//! abandoned and reported as a timeout failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Check, CheckError, CheckKind, CheckOutcome};

/// Expected shape of the generate endpoint's body.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    name: String,
}

/// Expected shape of the health endpoint's body.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Issues a GET and decodes a 2xx JSON body, mapping transport errors to
/// `Network` and status/body problems to `Protocol`.
async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<T, CheckError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CheckError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CheckError::Protocol(format!("unexpected status {}", status)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CheckError::Protocol(format!("malformed body: {}", e)))
}

/// Probes the name-generation endpoint; passes on 2xx with a JSON body
/// carrying a `name` string, which becomes the result detail.
pub struct GenerateProbe {
    client: Client,
    url: String,
    timeout: Duration,
}

impl GenerateProbe {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Check for GenerateProbe {
    fn name(&self) -> &str {
        "generate-endpoint"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Probe
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        debug!(url = %self.url, "probing generate endpoint");
        let body: GenerateResponse = fetch_json(&self.client, &self.url).await?;
        Ok(CheckOutcome::with_detail(body.name))
    }
}

/// Probes the health endpoint; passes on 2xx with a JSON body carrying a
/// `status` string.
pub struct HealthProbe {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Check for HealthProbe {
    fn name(&self) -> &str {
        "health-endpoint"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Probe
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        debug!(url = %self.url, "probing health endpoint");
        let body: HealthResponse = fetch_json(&self.client, &self.url).await?;
        Ok(CheckOutcome::with_detail(body.status))
    }
}

/// Fetches the landing page and requires every configured marker substring
/// to be present in the body.
pub struct PageProbe {
    client: Client,
    url: String,
    markers: Vec<String>,
    timeout: Duration,
}

impl PageProbe {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        markers: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            markers,
            timeout,
        }
    }
}

#[async_trait]
impl Check for PageProbe {
    fn name(&self) -> &str {
        "page-content"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Probe
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn execute(&self) -> Result<CheckOutcome, CheckError> {
        debug!(url = %self.url, markers = self.markers.len(), "probing page content");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CheckError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Protocol(format!("unexpected status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CheckError::Network(e.to_string()))?;

        let missing: Vec<&str> = self
            .markers
            .iter()
            .filter(|marker| !body.contains(marker.as_str()))
            .map(|marker| marker.as_str())
            .collect();

        if missing.is_empty() {
            Ok(CheckOutcome::with_detail(format!(
                "{} bytes, {} markers present",
                body.len(),
                self.markers.len()
            )))
        } else {
            Err(CheckError::Protocol(format!(
                "missing markers: {}",
                missing.join(", ")
            )))
        }
    }
}
