//! Resotel - Core
//!
//! Reservation and client management for hotel and social-housing
//! operators: a typed client directory (particuliers, entreprises,
//! associations / opérateurs sociaux), negotiated price conventions per
//! hotel and room category, and the hotel-scoped filtering that feeds the
//! dashboard.
//!
//! # Overview
//!
//! All records live in memory and flow one way: the remote data store loads
//! them into an [`filter::AppState`], selections derive filtered views from
//! it, and the dashboard aggregates those views. Rendering and persistence
//! internals stay outside this crate; the store is reached through the
//! generic [`store::DataStore`] trait.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use resotel_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ResotelConfig::load()?;
//!     config.logging.init();
//!
//!     let store = config.store.connect()?;
//!     let state = resotel_core::store::load_app_state(&store).await;
//!
//!     let view = state.select_hotel(Some(2)).view();
//!     let stats = DashboardStats::compute(&view);
//!     log::info!("{} chambres occupées", stats.chambres_occupees);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`model`] - domain records (clients, hotels, reservations, conventions)
//! - [`directory`] - client numbering, search, creation and updates
//! - [`convention`] - price-convention editing sessions
//! - [`filter`] / [`dashboard`] - hotel selection and derived counters
//! - [`store`] - the data-access collaborator (remote, in-memory, fallback)
//! - [`config`] - TOML + environment configuration

pub mod config;
pub mod convention;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod filter;
pub mod model;
pub mod store;

// Prelude module for convenient imports
pub mod prelude;

// Re-exports of main types
pub use config::ResotelConfig;
pub use dashboard::DashboardStats;
pub use directory::ClientDirectory;
pub use error::{ResotelError, Result, ValidationError};
pub use filter::{AppState, FilteredView};
