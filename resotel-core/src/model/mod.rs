//! Domain records shared across the crate
//!
//! Field names stay aligned with the remote store's columns (French
//! snake_case), so these structs serialize straight into the rows the data
//! API expects.

pub mod client;
pub mod convention;
pub mod hotel;

pub use client::{
    Client, ClientCreate, ClientKind, ClientSearchResult, ClientStatus, ClientTypeId, ClientUpdate,
};
pub use convention::{MonthlyRate, PriceConvention, RateBasis, ROOM_TYPE_PRIORITY};
pub use hotel::{Hotel, HotelStatus, Reservation, ReservationStatus};

/// Store-assigned identifier for a hotel row
pub type HotelId = i64;

/// Store-assigned identifier for a client row
pub type ClientId = i64;
