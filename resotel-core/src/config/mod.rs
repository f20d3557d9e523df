//! Configuration system
//!
//! Values are resolved defaults-first, then the TOML file, then environment
//! variables (highest priority):
//!
//! 1. **Environment variables** (`RT_*`)
//! 2. **Config file** (resotel.toml)
//! 3. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use resotel_core::config::ResotelConfig;
//!
//! // Load with full supersedence
//! let config = ResotelConfig::load()?;
//!
//! // Or load from a specific file
//! let config = ResotelConfig::from_file("resotel.toml")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod dashboard;
pub mod logging;
pub mod store;

pub use dashboard::DashboardConfig;
pub use logging::LoggingConfig;
pub use store::StoreConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete resotel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResotelConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
}

impl ResotelConfig {
    /// Load configuration with the full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from("resotel.toml")
    }

    /// Load configuration, reading `path` when it exists
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.store.merge(other.store);
        self.logging.merge(other.logging);
        self.dashboard.merge(other.dashboard);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.store.apply_env_vars();
        self.logging.apply_env_vars();
        self.dashboard.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.logging.validate()?;
        self.dashboard.validate()?;
        Ok(())
    }
}
