//! Dashboard configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::model::HotelId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between automatic state refreshes
    /// Env: RT_DASHBOARD_REFRESH
    /// Default: 60
    pub refresh_secs: u64,

    /// Hotel preselected at startup (None = all hotels)
    /// Env: RT_DASHBOARD_HOTEL
    /// Default: None
    pub default_hotel: Option<HotelId>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_secs: 60, default_hotel: None }
    }
}

impl DashboardConfig {
    pub fn merge(&mut self, other: Self) {
        self.refresh_secs = other.refresh_secs;
        self.default_hotel = other.default_hotel;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(refresh) = env::var("RT_DASHBOARD_REFRESH") {
            if let Ok(secs) = refresh.parse() {
                self.refresh_secs = secs;
            }
        }
        if let Ok(hotel) = env::var("RT_DASHBOARD_HOTEL") {
            if let Ok(id) = hotel.parse() {
                self.default_hotel = Some(id);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_secs == 0 {
            bail!("Invalid refresh_secs: must be greater than 0");
        }
        Ok(())
    }
}
