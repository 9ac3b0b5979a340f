// crates/testutils-toolkit/src/config.rs
// ============================================================================
// Module: Toolkit Configuration
// Description: TOML configuration for certificate and integration defaults.
// Purpose: Let a test suite adjust helper defaults without code changes.
// Dependencies: serde, toml, thiserror
// ============================================================================

//! ## Overview
//! [`TestutilsConfig::load`] resolves the configuration source in order:
//! an explicit path, then the `TESTUTILS_CONFIG` environment variable, then
//! built-in defaults. Files are size-limited, must be UTF-8 and reject
//! unknown fields.
//!
//! ```toml
//! [certificates]
//! organization = "acme-tests"
//! validity_days = 30
//!
//! [integration]
//! env_var = "ACME_INTEGRATION"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::certificates::CertificateOptions;
use crate::integration::IntegrationConfig;
use crate::integration::IntegrationGate;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "TESTUTILS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Toolkit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestutilsConfig {
    /// Certificate generation defaults.
    pub certificates: CertificateOptions,
    /// Integration gate settings.
    pub integration: IntegrationConfig,
}

impl TestutilsConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| env::var(name).ok())
    }

    /// Loads configuration, resolving the environment through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing or validation fails.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let Some(resolved) = resolve_path(path, lookup) else {
            tracing::debug!("no toolkit config file; using defaults");
            return Ok(Self::default());
        };
        let bytes = read_limited(&resolved)?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml_str(content)?;
        tracing::debug!(path = %resolved.display(), "loaded toolkit config");
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is not valid configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns an integration gate using the configured variable and value.
    #[must_use]
    pub fn integration_gate(&self) -> IntegrationGate {
        IntegrationGate::new(self.integration.clone())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a section is inconsistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.certificates.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.integration.env_var.trim().is_empty() {
            return Err(ConfigError::Invalid("integration.env_var must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument or the environment.
fn resolve_path<F>(path: Option<&Path>, lookup: F) -> Option<PathBuf>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Some(path.to_path_buf());
    }
    lookup(CONFIG_ENV_VAR).filter(|value| !value.is_empty()).map(PathBuf::from)
}

/// Reads at most one byte past [`MAX_CONFIG_FILE_SIZE`] from `path`.
fn read_limited(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let file = File::open(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let limit = u64::try_from(MAX_CONFIG_FILE_SIZE).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    file.take(limit).read_to_end(&mut bytes).map_err(|err| ConfigError::Io(err.to_string()))?;
    Ok(bytes)
}
