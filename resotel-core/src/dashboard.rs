//! Dashboard counters
//!
//! Pure aggregation over a [`FilteredView`]: whatever the hotel selection
//! produced is what gets counted, so the numbers always agree with the
//! tables on screen.

use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;
use crate::model::{ClientStatus, HotelStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_hotels: usize,
    pub active_hotels: usize,
    pub total_chambres: u32,
    pub chambres_occupees: u32,
    /// Mean of the hotels' occupancy rates, rounded; 0 when no hotels
    pub taux_occupation_moyen: u32,
    pub reservations_actives: usize,
    pub total_operateurs: usize,
    pub operateurs_actifs: usize,
}

impl DashboardStats {
    pub fn compute(view: &FilteredView) -> Self {
        let total_hotels = view.hotels.len();
        let taux_occupation_moyen = if total_hotels == 0 {
            0
        } else {
            let sum: f64 = view.hotels.iter().map(|h| h.taux_occupation).sum();
            (sum / total_hotels as f64).round().max(0.0) as u32
        };

        Self {
            total_hotels,
            active_hotels: view.hotels.iter().filter(|h| h.statut == HotelStatus::Actif).count(),
            total_chambres: view.hotels.iter().map(|h| h.chambres_total).sum(),
            chambres_occupees: view.hotels.iter().map(|h| h.chambres_occupees).sum(),
            taux_occupation_moyen,
            reservations_actives: view
                .reservations
                .iter()
                .filter(|r| r.statut.is_active())
                .count(),
            total_operateurs: view.clients.len(),
            operateurs_actifs: view
                .clients
                .iter()
                .filter(|c| c.statut == ClientStatus::Actif)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hotel, Reservation, ReservationStatus};

    fn hotel(id: i64, taux: f64, statut: HotelStatus) -> Hotel {
        Hotel {
            id,
            nom: format!("Hotel {}", id),
            ville: None,
            chambres_total: 30,
            chambres_occupees: 12,
            taux_occupation: taux,
            statut,
        }
    }

    fn reservation(id: i64, statut: ReservationStatus) -> Reservation {
        Reservation {
            id,
            usager: format!("Usager {}", id),
            hotel: "Hotel 1".to_string(),
            statut,
            montant: 0.0,
        }
    }

    #[test]
    fn test_empty_view_is_all_zero() {
        let stats = DashboardStats::compute(&FilteredView::default());
        assert_eq!(stats, DashboardStats::default());
        assert_eq!(stats.taux_occupation_moyen, 0);
    }

    #[test]
    fn test_hotel_counters() {
        let view = FilteredView {
            hotels: vec![
                hotel(1, 40.0, HotelStatus::Actif),
                hotel(2, 75.0, HotelStatus::Maintenance),
                hotel(3, 60.0, HotelStatus::Actif),
            ],
            ..Default::default()
        };
        let stats = DashboardStats::compute(&view);
        assert_eq!(stats.total_hotels, 3);
        assert_eq!(stats.active_hotels, 2);
        assert_eq!(stats.total_chambres, 90);
        assert_eq!(stats.chambres_occupees, 36);
        // mean(40, 75, 60) = 58.33 -> 58
        assert_eq!(stats.taux_occupation_moyen, 58);
    }

    #[test]
    fn test_active_reservation_statuses() {
        let view = FilteredView {
            reservations: vec![
                reservation(1, ReservationStatus::EnCours),
                reservation(2, ReservationStatus::Confirmee),
                reservation(3, ReservationStatus::Terminee),
                reservation(4, ReservationStatus::Annulee),
            ],
            ..Default::default()
        };
        assert_eq!(DashboardStats::compute(&view).reservations_actives, 2);
    }
}
