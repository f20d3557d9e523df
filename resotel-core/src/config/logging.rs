//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: error, warn, info, debug or trace
    /// Env: RT_LOG_LEVEL
    pub level: String,
    /// Include timestamps in log lines
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), timestamps: true }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("RT_LOG_LEVEL") {
            self.level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if log::LevelFilter::from_str(&self.level).is_err() {
            bail!("Invalid log level: {}", self.level);
        }
        Ok(())
    }

    /// Initialize the global logger. Safe to call more than once; later
    /// calls are no-ops.
    pub fn init(&self) {
        let level = log::LevelFilter::from_str(&self.level).unwrap_or(log::LevelFilter::Info);
        let mut builder = env_logger::Builder::from_default_env();
        builder.filter_level(level);
        if !self.timestamps {
            builder.format_timestamp(None);
        }
        let _ = builder.try_init();
    }
}
