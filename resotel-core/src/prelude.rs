//! Convenient single-import surface
//!
//! ```rust
//! use resotel_core::prelude::*;
//! ```

pub use crate::config::ResotelConfig;
pub use crate::convention::{ConventionField, ConventionSession, RoomTypeFilter};
pub use crate::dashboard::DashboardStats;
pub use crate::directory::{ClientDirectory, SearchCriteria};
pub use crate::error::{ResotelError, Result, ValidationError};
pub use crate::filter::{AppState, FilteredView};
pub use crate::model::{
    Client, ClientCreate, ClientKind, ClientStatus, ClientTypeId, ClientUpdate, Hotel,
    HotelStatus, PriceConvention, RateBasis, Reservation, ReservationStatus,
};
pub use crate::store::{DataStore, MemoryStore, RemoteStore, StoreError};
