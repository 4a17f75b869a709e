//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::parse_mode;
use crate::error::{PoolError, Result};
use crate::pool::MIN_POOL_SIZE;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PoolError::Io)` - The file could not be read
    /// * `Err(PoolError::InvalidArgument)` - Parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PoolError::io(format!("failed to read config file '{}'", path.display()), e)
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            PoolError::InvalidArgument(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PoolError::InvalidArgument(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `pool_size` must be at least the minimum pool size
    /// - `mode` must be octal permission bits no larger than `07777`
    pub fn validate(&self) -> Result<()> {
        if self.pool_size < MIN_POOL_SIZE {
            return Err(PoolError::InvalidArgument(format!(
                "config validation failed: pool_size must be at least {}",
                MIN_POOL_SIZE
            )));
        }

        parse_mode(&self.mode).map_err(|e| {
            PoolError::InvalidArgument(format!("config validation failed: {}", e))
        })?;

        Ok(())
    }

    /// Permission bits for new pools.
    pub fn mode_bits(&self) -> Result<u32> {
        parse_mode(&self.mode)
    }
}
