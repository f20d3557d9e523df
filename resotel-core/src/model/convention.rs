//! Conventions de prix
//!
//! A price convention is a negotiated room rate between a client and a
//! hotel, per room category, optionally overridden month by month (per
//! person or per room). The discount percentage is derived, never entered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ClientId, HotelId};

/// Room categories with a negotiated-rate priority; anything else sorts
/// alphabetically after these.
pub const ROOM_TYPE_PRIORITY: [&str; 5] =
    ["standard", "confort", "superieure", "suite", "adaptee"];

/// Sort key: position in the priority list, then the name itself
pub(crate) fn room_type_rank(type_chambre: &str) -> (usize, &str) {
    let pos = ROOM_TYPE_PRIORITY
        .iter()
        .position(|t| *t == type_chambre)
        .unwrap_or(ROOM_TYPE_PRIORITY.len());
    (pos, type_chambre)
}

/// Pricing basis for a monthly override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// PAX pricing
    ParPersonne,
    ParChambre,
}

/// Month-specific rate override. Unset sides fall back to the base rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRate {
    #[serde(default)]
    pub prix_par_personne: Option<f64>,
    #[serde(default)]
    pub prix_par_chambre: Option<f64>,
}

impl MonthlyRate {
    pub fn is_empty(&self) -> bool {
        self.prix_par_personne.is_none() && self.prix_par_chambre.is_none()
    }
}

/// Discount percentage, rounded to the nearest whole percent.
///
/// A zero standard price yields 0 rather than a division by zero.
pub fn compute_reduction(prix_standard: f64, prix_conventionne: f64) -> i64 {
    if prix_standard == 0.0 {
        return 0;
    }
    ((prix_standard - prix_conventionne) / prix_standard * 100.0).round() as i64
}

/// Negotiated rate record for one (client, hotel, room category)
///
/// `key` is a stable synthetic identity for editing sessions; the store does
/// not persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConvention {
    #[serde(default = "Uuid::new_v4")]
    pub key: Uuid,
    pub client_id: ClientId,
    pub hotel_id: HotelId,
    pub type_chambre: String,
    pub prix_standard: f64,
    pub prix_conventionne: f64,
    /// Derived from the two prices, kept in sync by the editing session
    pub reduction: i64,
    #[serde(default)]
    pub conditions_speciales: Option<String>,
    /// Month (1..=12) to override; absent months mean "no override"
    #[serde(default)]
    pub tarifs_mensuels: BTreeMap<u8, MonthlyRate>,
}

impl PriceConvention {
    /// New draft with the default negotiated rate (45 over a 50 standard)
    pub fn draft(client_id: ClientId, hotel_id: HotelId) -> Self {
        Self {
            key: Uuid::new_v4(),
            client_id,
            hotel_id,
            type_chambre: "standard".to_string(),
            prix_standard: 50.0,
            prix_conventionne: 45.0,
            reduction: 10,
            conditions_speciales: None,
            tarifs_mensuels: BTreeMap::new(),
        }
    }

    /// Savings per night against the standard rate
    pub fn economie(&self) -> f64 {
        self.prix_standard - self.prix_conventionne
    }

    pub(crate) fn recompute_reduction(&mut self) {
        self.reduction = compute_reduction(self.prix_standard, self.prix_conventionne);
    }
}
