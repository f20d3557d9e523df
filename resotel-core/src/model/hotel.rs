//! Hotel and reservation records
//!
//! Read-mostly in this crate: the dashboard filters and counts them, it
//! never mutates them. Statuses use the store's SCREAMING_SNAKE labels.

use serde::{Deserialize, Serialize};

use crate::model::HotelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HotelStatus {
    Actif,
    Maintenance,
    Inactif,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: HotelId,
    pub nom: String,
    #[serde(default)]
    pub ville: Option<String>,
    pub chambres_total: u32,
    pub chambres_occupees: u32,
    /// Occupancy percentage, 0..=100, as reported by the store
    pub taux_occupation: f64,
    pub statut: HotelStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    EnCours,
    Confirmee,
    Terminee,
    Annulee,
}

impl ReservationStatus {
    /// Active means the reservation still occupies (or will occupy) a room
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::EnCours | ReservationStatus::Confirmee)
    }
}

/// Reservation row. Hotels are referenced by *name* here, an inherited
/// quirk of the store schema that the filtering layer has to honor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    /// Person placed in the room (usager hébergé)
    pub usager: String,
    /// Hotel name, not id
    pub hotel: String,
    pub statut: ReservationStatus,
    #[serde(default)]
    pub montant: f64,
}
