//! Error taxonomy for the resotel core.
//!
//! Three failure families cross this crate (validation, lookup, store), plus
//! configuration loading. Validation errors are meant to be surfaced to the
//! caller for display; store errors are caught at the call site, logged, and
//! either replaced by a fallback dataset (load paths) or propagated without
//! retry (mutation paths). Nothing here is fatal to the process.

use crate::store::StoreError;

/// Main result type for the crate
pub type Result<T> = std::result::Result<T, ResotelError>;

/// Validation failures on client and convention input
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("field {0} is immutable once assigned")]
    Immutable(&'static str),
}

/// Top-level error type for the resotel core
#[derive(thiserror::Error, Debug)]
pub enum ResotelError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl ResotelError {
    /// Short machine-readable code, used in logs and API payloads
    pub fn code(&self) -> &'static str {
        match self {
            ResotelError::Validation(_) => "validation_error",
            ResotelError::NotFound(_) => "not_found",
            ResotelError::Store(_) => "store_error",
            ResotelError::Config(_) => "config_error",
            ResotelError::SerdeJson(_) => "serialization_error",
        }
    }
}
