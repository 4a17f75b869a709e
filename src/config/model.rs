//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for the logpool CLI and pool manager.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size in bytes of pools created without an explicit size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u64,

    /// Octal permission bits for new pools (default: "0600").
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Whether `create` syncs the initialized pool before publishing it.
    #[serde(default = "default_true")]
    pub sync_on_create: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            mode: default_mode(),
            sync_on_create: default_true(),
        }
    }
}
