//! Hotel selection and derived filtering
//!
//! The whole dashboard pivots on one piece of state: the selected hotel
//! (`None` = all hotels). Rather than an ambient global, the selection
//! lives on an explicit [`AppState`] and transitions go through pure
//! update functions; every derived collection is recomputed from scratch
//! on each transition (copy-on-write, no in-place mutation).

use serde::{Deserialize, Serialize};

use crate::model::{Client, Hotel, HotelId, PriceConvention, Reservation};

/// In-memory application state, loaded from the store in one pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub hotels: Vec<Hotel>,
    pub reservations: Vec<Reservation>,
    pub clients: Vec<Client>,
    pub conventions: Vec<PriceConvention>,
    /// `None` means "all hotels"
    pub selected_hotel: Option<HotelId>,
}

/// Collections visible under the current hotel selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    pub hotels: Vec<Hotel>,
    pub reservations: Vec<Reservation>,
    pub clients: Vec<Client>,
    pub conventions: Vec<PriceConvention>,
}

impl AppState {
    pub fn new(
        hotels: Vec<Hotel>,
        reservations: Vec<Reservation>,
        clients: Vec<Client>,
        conventions: Vec<PriceConvention>,
    ) -> Self {
        Self { hotels, reservations, clients, conventions, selected_hotel: None }
    }

    /// Pure transition: change the hotel selection
    #[must_use]
    pub fn select_hotel(mut self, hotel: Option<HotelId>) -> Self {
        self.selected_hotel = hotel;
        self
    }

    /// Recompute every derived collection for the current selection.
    ///
    /// Reservations reference hotels by *name*, so they are matched against
    /// the selected hotel's `nom`; clients are kept when they hold at least
    /// one convention with the selected hotel.
    pub fn view(&self) -> FilteredView {
        let Some(hotel_id) = self.selected_hotel else {
            return FilteredView {
                hotels: self.hotels.clone(),
                reservations: self.reservations.clone(),
                clients: self.clients.clone(),
                conventions: self.conventions.clone(),
            };
        };

        let hotels: Vec<Hotel> =
            self.hotels.iter().filter(|h| h.id == hotel_id).cloned().collect();

        // Selecting an id with no hotel row leaves every collection empty
        let hotel_nom = hotels.first().map(|h| h.nom.clone());
        let reservations: Vec<Reservation> = match &hotel_nom {
            Some(nom) => {
                self.reservations.iter().filter(|r| r.hotel == *nom).cloned().collect()
            }
            None => Vec::new(),
        };

        let conventions: Vec<PriceConvention> =
            self.conventions.iter().filter(|c| c.hotel_id == hotel_id).cloned().collect();

        let clients: Vec<Client> = self
            .clients
            .iter()
            .filter(|client| conventions.iter().any(|c| c.client_id == client.id))
            .cloned()
            .collect();

        FilteredView { hotels, reservations, clients, conventions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ClientKind, ClientStatus, HotelStatus, ReservationStatus,
    };
    use chrono::Utc;

    fn hotel(id: HotelId, nom: &str) -> Hotel {
        Hotel {
            id,
            nom: nom.to_string(),
            ville: None,
            chambres_total: 20,
            chambres_occupees: 10,
            taux_occupation: 50.0,
            statut: HotelStatus::Actif,
        }
    }

    fn reservation(id: i64, hotel: &str) -> Reservation {
        Reservation {
            id,
            usager: format!("Usager {}", id),
            hotel: hotel.to_string(),
            statut: ReservationStatus::EnCours,
            montant: 0.0,
        }
    }

    fn client(id: i64) -> Client {
        let now = Utc::now();
        Client {
            id,
            numero_client: format!("PAR{:04}", id),
            kind: ClientKind::Individual {
                nom: format!("Client {}", id),
                prenom: String::new(),
                nombre_enfants: 0,
            },
            email: None,
            telephone: None,
            adresse: None,
            ville: None,
            code_postal: None,
            pays: "France".to_string(),
            statut: ClientStatus::Actif,
            nombre_reservations: 0,
            montant_total_reservations: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn convention(client_id: i64, hotel_id: HotelId) -> PriceConvention {
        PriceConvention::draft(client_id, hotel_id)
    }

    fn sample_state() -> AppState {
        AppState::new(
            vec![hotel(1, "Hôtel du Parc"), hotel(2, "Résidence Les Tilleuls")],
            vec![
                reservation(1, "Hôtel du Parc"),
                reservation(2, "Résidence Les Tilleuls"),
                reservation(3, "Résidence Les Tilleuls"),
            ],
            vec![client(1), client(2)],
            vec![convention(1, 1), convention(2, 2)],
        )
    }

    #[test]
    fn test_no_selection_shows_everything() {
        let state = sample_state();
        let view = state.view();
        assert_eq!(view.hotels.len(), 2);
        assert_eq!(view.reservations.len(), 3);
        assert_eq!(view.clients.len(), 2);
        assert_eq!(view.conventions.len(), 2);
    }

    #[test]
    fn test_selection_filters_reservations_by_hotel_name() {
        let state = sample_state().select_hotel(Some(2));
        let view = state.view();
        assert_eq!(view.hotels.len(), 1);
        assert_eq!(view.hotels[0].nom, "Résidence Les Tilleuls");
        assert_eq!(view.reservations.len(), 2);
        assert!(view.reservations.iter().all(|r| r.hotel == "Résidence Les Tilleuls"));
    }

    #[test]
    fn test_selection_filters_clients_via_conventions() {
        let state = sample_state().select_hotel(Some(1));
        let view = state.view();
        assert_eq!(view.clients.len(), 1);
        assert_eq!(view.clients[0].id, 1);
        assert_eq!(view.conventions.len(), 1);
        assert_eq!(view.conventions[0].hotel_id, 1);
    }

    #[test]
    fn test_unknown_hotel_id_yields_empty_view() {
        let state = sample_state().select_hotel(Some(99));
        let view = state.view();
        assert!(view.hotels.is_empty());
        assert!(view.reservations.is_empty());
        assert!(view.clients.is_empty());
        assert!(view.conventions.is_empty());
    }

    #[test]
    fn test_reselecting_none_restores_everything() {
        let state = sample_state().select_hotel(Some(1)).select_hotel(None);
        assert_eq!(state.view().reservations.len(), 3);
    }

    #[test]
    fn test_view_does_not_mutate_state() {
        let state = sample_state().select_hotel(Some(1));
        let before = state.clone();
        let _ = state.view();
        assert_eq!(state, before);
    }
}
