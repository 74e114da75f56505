//! Configuration for the directory layer and the transaction retry driver.
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! `QUIVER_*` environment overrides. Every field has a default, so an empty
//! file is valid.
//!
//! ```toml
//! [directory]
//! node_prefix = 254
//! allow_manual_prefixes = true
//!
//! [transact]
//! retry_limit = 100
//! initial_backoff_ms = 1
//! max_backoff_ms = 128
//! ```

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use snafu::ResultExt;
use snafu::Snafu;
use tracing::info;

use crate::constants::DEFAULT_INITIAL_BACKOFF_MS;
use crate::constants::DEFAULT_MAX_BACKOFF_MS;
use crate::constants::DEFAULT_RETRY_LIMIT;
use crate::constants::directory::DEFAULT_NODE_PREFIX;
use crate::constants::transaction::MAX_RETRY_LIMIT;

/// Environment variable overriding [`TransactConfig::retry_limit`].
pub const ENV_RETRY_LIMIT: &str = "QUIVER_RETRY_LIMIT";

/// Environment variable overriding [`DirectoryConfig::allow_manual_prefixes`].
pub const ENV_ALLOW_MANUAL_PREFIXES: &str = "QUIVER_ALLOW_MANUAL_PREFIXES";

/// Errors that can occur while loading configuration.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("failed to read config file {}: {source}", path.display()))]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("failed to parse TOML config: {source}"))]
    Parse { source: toml::de::Error },

    #[snafu(display("invalid value for {name}: {value:?}"))]
    InvalidOverride { name: String, value: String },

    #[snafu(display("invalid configuration: {reason}"))]
    Invalid { reason: String },
}

/// Directory layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Single byte prefixing the root node subspace.
    pub node_prefix: u8,
    /// Whether callers may choose directory prefixes explicitly.
    pub allow_manual_prefixes: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            node_prefix: DEFAULT_NODE_PREFIX,
            allow_manual_prefixes: true,
        }
    }
}

/// Retry driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactConfig {
    /// Attempts made before the last retryable error is returned.
    pub retry_limit: u32,
    /// Backoff after the first failed attempt.
    pub initial_backoff_ms: u64,
    /// Upper bound for the doubling backoff.
    pub max_backoff_ms: u64,
}

impl Default for TransactConfig {
    fn default() -> Self {
        Self {
            retry_limit: DEFAULT_RETRY_LIMIT,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuiverConfig {
    pub directory: DirectoryConfig,
    pub transact: TransactConfig,
}

impl QuiverConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).context(ParseSnafu)
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        Self::from_toml_str(&content)
    }

    /// Build the effective configuration: defaults, then `path` if given,
    /// then environment overrides. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "loading configuration file");
                Self::from_toml_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QUIVER_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(value) = lookup(ENV_RETRY_LIMIT) {
            self.transact.retry_limit = value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                name: ENV_RETRY_LIMIT.to_string(),
                value: value.clone(),
            })?;
            info!(retry_limit = self.transact.retry_limit, "retry limit overridden from environment");
        }

        if let Some(value) = lookup(ENV_ALLOW_MANUAL_PREFIXES) {
            self.directory.allow_manual_prefixes = match value.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(ConfigError::InvalidOverride {
                        name: ENV_ALLOW_MANUAL_PREFIXES.to_string(),
                        value,
                    });
                }
            };
        }

        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let transact = &self.transact;
        if transact.retry_limit == 0 || transact.retry_limit > MAX_RETRY_LIMIT {
            return Err(ConfigError::Invalid {
                reason: format!("retry_limit must be between 1 and {MAX_RETRY_LIMIT}"),
            });
        }
        if transact.initial_backoff_ms > transact.max_backoff_ms {
            return Err(ConfigError::Invalid {
                reason: "initial_backoff_ms must not exceed max_backoff_ms".to_string(),
            });
        }
        Ok(())
    }
}
