//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::ConfigError;

/// A named extension to load at startup
///
/// Declaration order is load order: later failures never roll back earlier
/// successes, so the order is observable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtensionRef {
    pub name: String,
}

/// Bot configuration, read once at startup and immutable afterwards
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub extensions: Vec<ExtensionRef>,
    pub owner_id: u64,
    pub command_prefix: String,
    pub token: String,
    pub debug: bool,
    /// Channels the Discord adapter polls for messages
    #[serde(default)]
    pub channels: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec![ExtensionRef {
                name: "utility".to_string(),
            }],
            owner_id: 0,
            command_prefix: "/".to_string(),
            token: String::new(),
            debug: false,
            channels: Vec::new(),
        }
    }
}

impl Config {
    /// Load is all-or-nothing: a missing file, malformed JSON, or any
    /// missing required field fails the whole read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist the in-memory configuration
    ///
    /// Serializes this value directly; never re-reads the target file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }
}
