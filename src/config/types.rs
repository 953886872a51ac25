//! Configuration type definitions

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::DEFAULT_SCHEMA_URL;
use crate::domain::services::DEFAULT_CACHE_SIZE;
use crate::infrastructure::repositories::{LockfileSettings, DEFAULT_LOCKFILE_NAME};
use crate::infrastructure::watch::DEFAULT_DEBOUNCE_MS;

use super::loader::{self, ConfigResult, ConfigWarning};

/// Lockfile location and stamping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockfileConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default = "default_schema_url")]
    pub schema_url: String,

    /// `<tool>@<version>` written into `generatedBy`
    #[serde(default = "default_generated_by")]
    pub generated_by: String,
}

impl Default for LockfileConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            schema_url: default_schema_url(),
            generated_by: default_generated_by(),
        }
    }
}

fn default_file_name() -> String {
    DEFAULT_LOCKFILE_NAME.to_string()
}

fn default_schema_url() -> String {
    DEFAULT_SCHEMA_URL.to_string()
}

fn default_generated_by() -> String {
    LockfileSettings::default().generated_by
}

/// Version cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Validated when the consolidator is built, never clamped
    #[serde(default = "default_cache_size")]
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: default_cache_size(),
        }
    }
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

/// Lockfile watcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lockfile: LockfileConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ConfigResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> Self {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (BUNDLELOCK_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Settings for lockfile repositories built from this config
    pub fn lockfile_settings(&self) -> LockfileSettings {
        LockfileSettings {
            file_name: self.lockfile.file_name.clone(),
            schema_url: self.lockfile.schema_url.clone(),
            generated_by: self.lockfile.generated_by.clone(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.watch.debounce_ms)
    }
}
