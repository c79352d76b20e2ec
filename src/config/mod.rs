//! Configuration loading for docgap
//!
//! Settings are assembled as a JSON tree (built-in defaults, then the user's
//! file deep-merged on top, then CLI overrides) and only then frozen into a
//! typed [`Config`]. Nothing in the pipeline mutates configuration afterwards.

mod merge;
mod schema;

pub use merge::deep_merge;
pub use schema::{
    CodeAnalysisConfig, ComplexityThresholds, Config, DiscoveryConfig, DocumentationStandards,
    DEFAULT_MINIMUM_WORDS,
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILENAME: &str = ".docgaprc.json";

/// Shortcut accepted by [`ConfigManager::set_threshold`] for the coverage floor
pub const FAIL_UNDER: &str = "fail_under";
/// Shortcut accepted by [`ConfigManager::set_threshold`] for the quality floor
pub const MIN_QUALITY: &str = "min_quality";

const COVERAGE_FLOOR_KEY: &str = "documentation_standards.minimum_coverage_percentage";
const QUALITY_FLOOR_KEY: &str = "documentation_standards.minimum_quality_score";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config key: {0:?}")]
    InvalidKey(String),
}

/// Builds the run's configuration: defaults + file + overrides
#[derive(Debug, Clone)]
pub struct ConfigManager {
    values: Value,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ConfigManager {
    /// Built-in defaults only
    pub fn defaults() -> Self {
        Self {
            values: default_values(),
        }
    }

    /// Load `path` on top of the defaults. Never fails: a broken file falls
    /// back to defaults, and a missing file is created from the defaults
    /// (best effort).
    pub fn load(path: &Path) -> Self {
        let mut manager = Self::defaults();

        if !path.exists() {
            match manager.save(path) {
                Ok(()) => info!("Created default configuration at {}", path.display()),
                Err(e) => warn!("{}", e),
            }
            return manager;
        }

        match read_user_config(path) {
            Ok(user) => deep_merge(&mut manager.values, user),
            Err(e) => warn!("{}; using defaults", e),
        }
        manager
    }

    /// Write the current settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content =
            serde_json::to_string_pretty(&self.values).unwrap_or_else(|_| "{}".to_string());
        fs::write(path, content + "\n").map_err(write_err)
    }

    /// Raw value at a dotted path, e.g. `code_analysis.complexity_thresholds.medium`
    pub fn get(&self, key: &str) -> Option<&Value> {
        merge::lookup(&self.values, key)
    }

    /// Typed value at a dotted path, or `default` if absent or of another shape
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(default)
    }

    /// Apply a CLI override. `fail_under` and `min_quality` are shortcuts for
    /// the coverage and quality floors; anything else is a dotted path.
    pub fn set_threshold(&mut self, name: &str, value: Value) -> Result<(), ConfigError> {
        let key = match name {
            FAIL_UNDER => COVERAGE_FLOOR_KEY,
            MIN_QUALITY => QUALITY_FLOOR_KEY,
            other => other,
        };
        if merge::assign(&mut self.values, key, value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidKey(name.to_string()))
        }
    }

    /// Freeze into the typed config handed to the pipeline
    pub fn build(&self) -> Config {
        match serde_json::from_value(self.values.clone()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Configuration does not match the expected schema ({}); using defaults", e);
                Config::default()
            }
        }
    }
}

fn default_values() -> Value {
    serde_json::to_value(Config::default()).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn read_user_config(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `--set` value: JSON when it parses, otherwise a plain string
pub fn parse_override_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
