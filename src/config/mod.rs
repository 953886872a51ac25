//! Configuration module for bundlelock
//!
//! Configuration hierarchy:
//! 1. Environment variables (BUNDLELOCK_*)
//! 2. Project config (<repo>/.bundlelock/config.toml)
//! 3. User config (<config dir>/bundlelock/config.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{ConfigError, ConfigResult, ConfigWarning, PROJECT_CONFIG_PATH, USER_CONFIG_PATH};
pub use types::{CacheConfig, Config, LockfileConfig, WatchConfig};
