//! Run configuration.
//!
//! Load order: `.trellis.toml` → `TRELLIS_*` environment variables → defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".trellis.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrellisConfig {
    pub matrix: MatrixConfig,
    pub labels: Labels,
    pub catalog: CatalogConfig,
}

/// Connectivity matrix extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatrixConfig {
    /// Only trigger edges whose name starts with this prefix become rows.
    pub trigger_prefix: String,
    /// Edge property key holding the interface names.
    pub interface_key: String,
    /// Interface name used when an edge carries no interface value.
    pub not_applicable: String,
}

/// Rendered placeholders for resolution results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Labels {
    /// Shown when no classification ancestor exists.
    pub none_found: String,
    /// Shown when the containment walk hit a cycle.
    pub cycle: String,
    /// Joins multiple ancestor names.
    pub separator: String,
}

/// Application catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Application-kind tags to include. Empty means every application kind.
    pub application_kinds: Vec<String>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            trigger_prefix: "IF-".to_string(),
            interface_key: "Interface".to_string(),
            not_applicable: "N/A".to_string(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            none_found: "none found".to_string(),
            cycle: "cycle".to_string(),
            separator: ", ".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn accepts(&self, tag: &str) -> bool {
        self.application_kinds.is_empty() || self.application_kinds.iter().any(|k| k == tag)
    }
}

fn env_override(lookup: &impl Fn(&str) -> Option<String>, var: &str, target: &mut String) {
    if let Some(v) = lookup(var) {
        *target = v;
    }
}

impl TrellisConfig {
    /// Load config from `path`, with env var overrides.
    /// Falls back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|var| std::env::var(var).ok());
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Config file contents only, defaults if the file does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CoreError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `TRELLIS_*` overrides from `lookup` (the process environment in
    /// [`TrellisConfig::load`]).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        env_override(&lookup, "TRELLIS_TRIGGER_PREFIX", &mut self.matrix.trigger_prefix);
        env_override(&lookup, "TRELLIS_INTERFACE_KEY", &mut self.matrix.interface_key);
        env_override(&lookup, "TRELLIS_NONE_FOUND", &mut self.labels.none_found);
        if let Some(kinds) = lookup("TRELLIS_APPLICATION_KINDS") {
            self.catalog.application_kinds = kinds
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }
    }
}
