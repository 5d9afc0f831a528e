//! Config loading and validation.

use super::model::Config;
use crate::error::{Result, ShpFilesError};
use std::path::Path;

/// Environment variable naming a YAML config file for the CLI.
pub const CONFIG_ENV_VAR: &str = "SHPFILES_CONFIG";

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ShpFilesError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ShpFilesError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the file named by `SHPFILES_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a defaulted struct.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ShpFilesError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ShpFilesError::Config(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `stale_locker_secs`, `audit_interval_secs` and `http_timeout_secs` must be positive
    /// - `staging_dir`, when set, must not be empty
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("stale_locker_secs", self.stale_locker_secs),
            ("audit_interval_secs", self.audit_interval_secs),
            ("http_timeout_secs", self.http_timeout_secs),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ShpFilesError::Config(format!(
                    "config validation failed: {} must be greater than 0",
                    name
                )));
            }
        }

        if let Some(dir) = &self.staging_dir
            && dir.as_os_str().is_empty()
        {
            return Err(ShpFilesError::Config(
                "config validation failed: staging_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
