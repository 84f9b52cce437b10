//! Configuration management for the probe suite.
//!
//! Settings live in a TOML file under the user's config directory and can be
//! overridden per-invocation from the command line.

pub mod loader;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    pub probes: ProbeConfig,
    pub generator: GeneratorConfig,
}

/// Deployment under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Base URL all probe paths are resolved against.
    pub base_url: String,
    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Endpoint paths and page expectations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub generate_path: String,
    pub health_path: String,
    /// Substrings the landing page body must contain.
    pub page_markers: Vec<String>,
}

/// Name-generator capability declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Command the deployment ships for name generation. The capability
    /// check verifies only that the setting is present.
    pub command: Option<String>,
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Configuration manager
#[derive(Debug)]
pub struct ConfigManager {
    config: Config,
    config_path: PathBuf,
    loader: loader::ConfigLoader,
    validator: validation::ConfigValidator,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = config_path.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("probekit")
                .join("config.toml")
        });

        let loader = loader::ConfigLoader::new();
        let validator = validation::ConfigValidator::new();

        let config = if config_path.exists() {
            loader.load_from_file(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self {
            config,
            config_path,
            loader,
            validator,
        })
    }

    /// Load configuration from file
    pub fn load(&mut self) -> Result<(), ConfigError> {
        if self.config_path.exists() {
            self.config = self.loader.load_from_file(&self.config_path)?;
            self.validator.validate(&self.config)?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.loader.save_to_file(&self.config, &self.config_path)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reset to default configuration
    pub fn reset_to_default(&mut self) {
        self.config = Config::default();
    }

    /// Export configuration as JSON
    pub fn export_as_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }

    /// Import configuration from JSON
    pub fn import_from_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let config: Config = serde_json::from_str(json)?;

        self.validator.validate(&config)?;
        self.config = config;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            probes: ProbeConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            generate_path: "/api/generate".to_string(),
            health_path: "/api/health".to_string(),
            page_markers: Vec::new(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { command: None }
    }
}
