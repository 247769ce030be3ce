//! Core configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration for the administrative core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// Unit label stamped on audit events
    pub unit_name: String,
    /// Reject opening a register when the attendant already has one open
    pub enforce_single_open_register: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            unit_name: "Unidade Central".to_string(),
            enforce_single_open_register: true,
        }
    }
}

impl CoreConfig {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
