//! TOML-based application configuration.
//!
//! Stores CLI-facing preferences: suggestion limits and thresholds, the
//! default display timezone, and the stale-slot pruning policy.
//!
//! Configuration is stored at `~/.config/quorum/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Suggestion-selection defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    /// Maximum suggestions returned by default
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Minimum availability percentage a suggestion must reach
    #[serde(default = "default_min_pct")]
    pub min_availability_pct: f64,
    /// Delete persisted slots the current configuration no longer produces
    /// on every (non-forced) recompute
    #[serde(default)]
    pub prune_stale: bool,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            min_availability_pct: default_min_pct(),
            prune_stale: false,
        }
    }
}

/// Display defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default heatmap display timezone
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/quorum/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_limit() -> usize {
    10
}

fn default_min_pct() -> f64 {
    50.0
}

fn default_timezone() -> String {
    "Asia/Ho_Chi_Minh".to_string()
}

impl AppConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/quorum"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration file, falling back to defaults when it does
    /// not exist yet.
    pub fn load_or_default() -> Self {
        Self::path()
            .ok()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|raw| toml::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Load from an explicit path.
    pub fn load(path: &PathBuf) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}
