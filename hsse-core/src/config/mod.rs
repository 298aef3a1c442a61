//! Configuration: one struct per subsystem, aggregated by [`HsseConfig`].

pub mod defaults;
mod observability_config;
mod offline_config;
mod remote_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use observability_config::ObservabilityConfig;
pub use offline_config::OfflineConfig;
pub use remote_config::RemoteConfig;
pub use storage_config::StorageConfig;

/// Top-level configuration. Every section is optional in TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HsseConfig {
    pub storage: StorageConfig,
    pub offline: OfflineConfig,
    pub remote: RemoteConfig,
    pub observability: ObservabilityConfig,
}

impl HsseConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }
}
