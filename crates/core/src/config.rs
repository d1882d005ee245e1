//! Configuration -- `rdpshot.toml` parsing and runtime defaults
//!
//! [`RdpshotConfig`] holds the defaults that command-line flags fall back to.
//!
//! # Precedence
//! 1. CLI flags (highest)
//! 2. Environment variables (`RDPSHOT_SCAN_WORKERS=50` style)
//! 3. Config file (`rdpshot.toml`)
//! 4. Built-in defaults (`Default` impls)
//!
//! # Example
//! ```no_run
//! # async fn example() -> Result<(), rdpshot_core::error::RdpshotError> {
//! use rdpshot_core::config::RdpshotConfig;
//!
//! // Load from file and apply env overrides
//! let config = RdpshotConfig::load("rdpshot.toml").await?;
//!
//! // Parse a TOML string directly
//! let config = RdpshotConfig::parse("[scan]\nworkers = 50")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, RdpshotError};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rdpshot.toml";

/// Top-level rdpshot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RdpshotConfig {
    /// Logging settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Scan defaults
    #[serde(default)]
    pub scan: ScanDefaults,
}

impl RdpshotConfig {
    /// Load a TOML file, apply env overrides, then validate.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RdpshotError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Layer env overrides over the explicitly requested file, or over the
    /// default file if it exists, or over built-in defaults.
    ///
    /// The result is not validated: callers with a higher-precedence layer
    /// (command-line flags) merge it first and then call [`Self::validate`].
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, RdpshotError> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None if tokio::fs::try_exists(DEFAULT_CONFIG_FILE).await? => {
                Self::from_file(DEFAULT_CONFIG_FILE).await?
            }
            None => {
                debug!("no config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load a TOML file without env overrides or validation.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RdpshotError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RdpshotError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RdpshotError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// Parse a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, RdpshotError> {
        toml::from_str(toml_str).map_err(|e| {
            RdpshotError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Override values from environment variables.
    ///
    /// Naming: `RDPSHOT_{SECTION}_{FIELD}`, e.g. `RDPSHOT_SCAN_WORKERS=50`.
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "RDPSHOT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "RDPSHOT_GENERAL_LOG_FORMAT");

        override_string(&mut self.scan.url, "RDPSHOT_SCAN_URL");
        override_u32(&mut self.scan.workers, "RDPSHOT_SCAN_WORKERS");
        override_u32(&mut self.scan.timeout_secs, "RDPSHOT_SCAN_TIMEOUT_SECS");
        override_string(&mut self.scan.scanner_path, "RDPSHOT_SCAN_SCANNER_PATH");
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<(), RdpshotError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.scan.url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.url".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.scan.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.workers".to_owned(),
                reason: "must be at least 1".to_owned(),
            }
            .into());
        }

        if self.scan.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.timeout_secs".to_owned(),
                reason: "must be at least 1".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log format (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// Defaults for a scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDefaults {
    /// Connection URL template
    pub url: String,
    /// Parallel workers handed to the scanner
    pub workers: u32,
    /// Per-connection timeout (seconds)
    pub timeout_secs: u32,
    /// Scanner executable; empty means the bundled venv path
    pub scanner_path: String,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            url: "rdp://".to_owned(),
            workers: 10,
            timeout_secs: 10,
            scanner_path: String::new(),
        }
    }
}

// --- env override helpers ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}
