//! Configuration for the engine.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::{Result, TermRankError};
use crate::storage::{StoreConfig, StoreFactory};

/// Options that change how text is turned into terms.
///
/// The same options must be used for indexing and searching a given store;
/// a store built case-insensitively holds only lower-case terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Keep the case of terms instead of lower-casing them.
    pub case_sensitive: bool,
}

impl EngineOptions {
    /// Options with case sensitivity switched on or off.
    pub fn case_sensitive(case_sensitive: bool) -> Self {
        EngineOptions { case_sensitive }
    }
}

/// Full engine configuration: normalization options plus the store backend.
///
/// # Example
///
/// ```
/// use termrank::engine::config::EngineConfig;
/// use termrank::storage::StoreConfig;
///
/// let config = EngineConfig::from_json_str(
///     r#"{ "options": { "case_sensitive": true }, "store": { "type": "memory" } }"#,
/// ).unwrap();
///
/// assert!(config.options.case_sensitive);
/// assert!(matches!(config.store, StoreConfig::Memory(_)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Normalization options.
    pub options: EngineOptions,

    /// Statistics store backend.
    pub store: StoreConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TermRankError::invalid_config(format!("Invalid engine config: {e}")))
    }

    /// Read a configuration from a JSON file.
    ///
    /// A file that cannot be read surfaces as [`TermRankError::Anyhow`] with
    /// the path as context; malformed JSON is [`TermRankError::InvalidConfig`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Create the configured store and an engine over it.
    pub fn build(self) -> Result<Engine> {
        let store = StoreFactory::create(self.store)?;
        Ok(Engine::new(self.options, store))
    }
}
