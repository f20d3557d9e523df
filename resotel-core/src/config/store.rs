//! Data-store configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::store::{RemoteStore, StoreError};

/// Remote data-API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the data API, without trailing slash
    /// Env: RT_STORE_ENDPOINT
    /// Default: "" (fallback dataset only)
    pub endpoint: String,

    /// API key sent on every request
    /// Env: RT_STORE_API_KEY
    /// Default: None
    pub api_key: Option<String>,

    /// Request timeout in seconds
    /// Env: RT_STORE_TIMEOUT
    /// Default: 30
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { endpoint: String::new(), api_key: None, timeout_secs: 30 }
    }
}

impl StoreConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.endpoint = other.endpoint;
        self.api_key = other.api_key;
        self.timeout_secs = other.timeout_secs;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(endpoint) = env::var("RT_STORE_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(api_key) = env::var("RT_STORE_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Ok(timeout) = env::var("RT_STORE_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("Invalid timeout_secs: must be greater than 0");
        }
        if !self.endpoint.is_empty() && !self.endpoint.starts_with("http") {
            bail!("Invalid endpoint: must be an http(s) URL");
        }
        Ok(())
    }

    /// Build the remote store client from these settings
    pub fn connect(&self) -> Result<RemoteStore, StoreError> {
        let mut headers = HashMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("apikey".to_string(), api_key.clone());
        }
        RemoteStore::with_headers(
            self.endpoint.clone(),
            headers,
            Duration::from_secs(self.timeout_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_fails() {
        let cfg = StoreConfig { timeout_secs: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_non_http_endpoint_fails() {
        let cfg = StoreConfig { endpoint: "ftp://nope".to_string(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_apply_env_vars() {
        let mut cfg = StoreConfig::default();
        std::env::set_var("RT_STORE_ENDPOINT", "https://data.example.fr");
        std::env::set_var("RT_STORE_TIMEOUT", "5");
        cfg.apply_env_vars();
        assert_eq!(cfg.endpoint, "https://data.example.fr");
        assert_eq!(cfg.timeout_secs, 5);
        std::env::remove_var("RT_STORE_ENDPOINT");
        std::env::remove_var("RT_STORE_TIMEOUT");
    }
}
