//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::error::ConfigError;
use crate::process::procfs::DEFAULT_PROC_ROOT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest settling delay accepted for health checks
pub const MAX_HEALTH_DELAY_SECONDS: u64 = 300;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Native library settings
    pub library: LibraryConfig,
    /// Health check settings
    pub health: HealthConfig,
    /// Process table settings
    pub process: ProcessConfig,
}

impl Config {
    /// Check values that the type system cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.health.delay_seconds > MAX_HEALTH_DELAY_SECONDS {
            return Err(ConfigError::InvalidValue {
                key: "health.delay_seconds".to_string(),
                message: format!(
                    "{} exceeds the maximum of {}",
                    self.health.delay_seconds, MAX_HEALTH_DELAY_SECONDS
                ),
            });
        }
        if self.process.proc_root.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "process.proc_root".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
}

/// Native library configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LibraryConfig {
    /// Candidate library paths, tried in order; empty means the defaults
    pub paths: Vec<String>,
}

/// Health check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Settling delay before each health query, in seconds
    pub delay_seconds: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { delay_seconds: 1 }
    }
}

impl HealthConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

/// Process table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// procfs mount point of the host
    pub proc_root: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            proc_root: DEFAULT_PROC_ROOT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.general.verbose);
        assert!(config.library.paths.is_empty());
        assert_eq!(config.health.delay(), Duration::from_secs(1));
        assert_eq!(config.process.proc_root, "/proc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [library]
            paths = ["/opt/neuware/lib64/libcndev.so"]
            "#,
        )
        .unwrap();
        assert_eq!(config.library.paths.len(), 1);
        assert_eq!(config.health.delay_seconds, 1);
    }

    #[test]
    fn test_validate_rejects_long_delay() {
        let mut config = Config::default();
        config.health.delay_seconds = MAX_HEALTH_DELAY_SECONDS + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_proc_root() {
        let mut config = Config::default();
        config.process.proc_root.clear();
        assert!(config.validate().is_err());
    }
}
