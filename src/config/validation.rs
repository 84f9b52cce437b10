//! Configuration validation utilities.

use crate::config::{Config, ConfigError};
use std::collections::HashSet;
use url::Url;

/// Configuration validator
#[derive(Debug)]
pub struct ConfigValidator {
    valid_url_schemes: HashSet<String>,
}

impl ConfigValidator {
    /// Creates a new configuration validator with all validation rules
    pub fn new() -> Self {
        let mut valid_url_schemes = HashSet::new();
        valid_url_schemes.insert("http".to_string());
        valid_url_schemes.insert("https".to_string());

        Self { valid_url_schemes }
    }

    /// Validates the whole configuration, section by section
    pub fn validate(&self, config: &Config) -> Result<(), ConfigError> {
        self.validate_target(config)?;
        self.validate_probes(config)?;
        Ok(())
    }

    /// Validates the target section
    fn validate_target(&self, config: &Config) -> Result<(), ConfigError> {
        let target = &config.target;

        let url = Url::parse(&target.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid base_url '{}': {}",
                target.base_url, e
            ))
        })?;

        if !self.valid_url_schemes.contains(url.scheme()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid base_url scheme '{}'. Valid options are: {:?}",
                url.scheme(),
                self.valid_url_schemes
            )));
        }

        if target.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }

        if target.timeout_ms > 300_000 {
            return Err(ConfigError::ValidationError(
                "timeout_ms cannot exceed 300000 (5 minutes)".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates the probes section
    fn validate_probes(&self, config: &Config) -> Result<(), ConfigError> {
        let probes = &config.probes;

        for (field, path) in [
            ("generate_path", &probes.generate_path),
            ("health_path", &probes.health_path),
        ] {
            if path.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} cannot be empty",
                    field
                )));
            }

            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "{} '{}' must start with '/'",
                    field, path
                )));
            }
        }

        for marker in &probes.page_markers {
            if marker.is_empty() {
                return Err(ConfigError::ValidationError(
                    "page_markers entries cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let validator = ConfigValidator::new();
        assert!(validator.validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_unparsable_base_url() {
        let validator = ConfigValidator::new();
        let mut config = Config::default();
        config.target.base_url = "not a url".to_string();

        assert!(matches!(
            validator.validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let validator = ConfigValidator::new();
        let mut config = Config::default();
        config.target.base_url = "ftp://example.com".to_string();

        assert!(validator.validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let validator = ConfigValidator::new();
        let mut config = Config::default();
        config.target.timeout_ms = 0;

        assert!(validator.validate(&config).is_err());
    }

    #[test]
    fn test_rejects_relative_probe_path() {
        let validator = ConfigValidator::new();
        let mut config = Config::default();
        config.probes.health_path = "api/health".to_string();

        assert!(validator.validate(&config).is_err());
    }
}
