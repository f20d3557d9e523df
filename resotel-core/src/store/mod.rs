//! Data-access collaborator
//!
//! The surrounding application persists everything in a remote relational
//! backend reached through a generic data API: plain table reads, inserts,
//! and named stored procedures. This crate only depends on that contract,
//! expressed as the [`DataStore`] trait, so the dashboard logic runs the
//! same against the hosted backend ([`remote::RemoteStore`]) and the
//! in-memory stand-in ([`memory::MemoryStore`]).
//!
//! Failure policy: load paths log the store error and fall back to a
//! locally generated placeholder dataset; mutation paths surface the error
//! to the caller with no retry.

pub mod memory;
pub mod remote;
pub mod request_guard;

pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use request_guard::{RequestToken, RequestTracker};

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use crate::filter::AppState;

/// Error surfaced by a [`DataStore`] implementation
///
/// Remote failures are opaque passthroughs: the message is logged and shown,
/// never interpreted.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("procedure {name} failed: {message}")]
    Procedure { name: String, message: String },
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("internal store error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Equality filter on a column
pub type ColumnFilter = (String, Value);

/// Generic data-access interface over the remote backend
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Read rows from `table`, keeping those matching every filter, ordered
    /// by the given column (store-determined order when `None`).
    async fn query(
        &self,
        table: &str,
        filters: &[ColumnFilter],
        order: Option<&str>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Insert one row, returning the stored row (with assigned id)
    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError>;

    /// Call a stored procedure with named parameters
    async fn call_procedure(&self, name: &str, params: Value) -> Result<Value, StoreError>;
}

fn rows_to<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

/// Load the full application state from the store
pub async fn try_load_app_state(store: &dyn DataStore) -> Result<AppState, StoreError> {
    let hotels = rows_to(store.query("hotels", &[], Some("nom")).await?)?;
    let reservations = rows_to(store.query("reservations", &[], None).await?)?;
    let clients = rows_to(store.query("clients", &[], Some("numero_client")).await?)?;
    let conventions = rows_to(store.query("conventions_prix", &[], None).await?)?;
    Ok(AppState::new(hotels, reservations, clients, conventions))
}

/// Load the application state, falling back to the seeded placeholder
/// dataset when the store is unreachable.
pub async fn load_app_state(store: &dyn DataStore) -> AppState {
    match try_load_app_state(store).await {
        Ok(state) => state,
        Err(err) => {
            warn!("store unavailable, using placeholder dataset: {}", err);
            memory::seed_state()
        }
    }
}

/// Reloads application state while guarding against out-of-order
/// completions: a refresh superseded by a newer one is discarded.
#[derive(Debug, Default)]
pub struct StateLoader {
    tracker: RequestTracker,
}

impl StateLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a fresh state. Returns `None` when a newer refresh started
    /// while this one was in flight; the caller must not apply it.
    pub async fn refresh(&self, store: &dyn DataStore) -> Option<AppState> {
        let token = self.tracker.begin();
        let state = load_app_state(store).await;
        if self.tracker.is_current(token) {
            Some(state)
        } else {
            debug!("discarding stale state refresh (token {})", token.value());
            None
        }
    }
}
