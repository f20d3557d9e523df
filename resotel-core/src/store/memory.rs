//! In-memory store
//!
//! Backs tests and the offline fallback path. Tables are plain JSON rows;
//! the four stored procedures are reimplemented over them with the exact
//! same predicates the directory uses, so local and remote behavior agree.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::directory::{self, ClientDirectory, SearchCriteria};
use crate::filter::AppState;
use crate::model::{
    Client, ClientCreate, ClientKind, ClientStatus, ClientUpdate, Hotel, HotelStatus,
    PriceConvention, Reservation, ReservationStatus,
};
use crate::store::{ColumnFilter, DataStore, StoreError};

const TABLES: [&str; 4] = ["hotels", "reservations", "clients", "conventions_prix"];

/// JSON-row store held behind a lock, addressable like the remote data API
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        for table in TABLES {
            tables.insert(table.to_string(), Vec::new());
        }
        Self { tables: RwLock::new(tables) }
    }

    /// Store preloaded with the placeholder dataset
    pub fn seeded() -> Self {
        Self::from_state(&seed_state())
    }

    /// Store preloaded from an application state snapshot
    pub fn from_state(state: &AppState) -> Self {
        let mut tables = HashMap::new();
        tables.insert("hotels".to_string(), to_rows(&state.hotels));
        tables.insert("reservations".to_string(), to_rows(&state.reservations));
        tables.insert("clients".to_string(), to_rows(&state.clients));
        tables.insert("conventions_prix".to_string(), to_rows(&state.conventions));
        Self { tables: RwLock::new(tables) }
    }

    fn read_table(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;
        tables
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
    }

    fn write_table(&self, table: &str, rows: Vec<Value>) -> Result<(), StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;
        if !tables.contains_key(table) {
            return Err(StoreError::UnknownTable(table.to_string()));
        }
        tables.insert(table.to_string(), rows);
        Ok(())
    }

    fn clients(&self) -> Result<Vec<Client>, StoreError> {
        self.read_table("clients")?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    fn procedure_error(name: &str, message: impl ToString) -> StoreError {
        StoreError::Procedure { name: name.to_string(), message: message.to_string() }
    }
}

fn to_rows<T: serde::Serialize>(items: &[T]) -> Vec<Value> {
    items.iter().filter_map(|item| serde_json::to_value(item).ok()).collect()
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.as_str().unwrap_or_default().cmp(b.as_str().unwrap_or_default()),
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn query(
        &self,
        table: &str,
        filters: &[ColumnFilter],
        order: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut rows = self.read_table(table)?;
        rows.retain(|row| {
            filters.iter().all(|(column, expected)| row.get(column) == Some(expected))
        });
        if let Some(column) = order {
            rows.sort_by(|a, b| {
                compare_values(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                )
            });
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<Value, StoreError> {
        let mut rows = self.read_table(table)?;
        let next_id = rows
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;
        match &mut row {
            Value::Object(fields) => {
                if fields.get("id").map_or(true, Value::is_null) {
                    fields.insert("id".to_string(), json!(next_id));
                }
            }
            other => {
                return Err(StoreError::Decode(format!("expected a row object, got {}", other)))
            }
        }
        rows.push(row.clone());
        self.write_table(table, rows)?;
        Ok(row)
    }

    async fn call_procedure(&self, name: &str, params: Value) -> Result<Value, StoreError> {
        match name {
            "search_clients" => {
                let criteria: SearchCriteria = serde_json::from_value(params)?;
                let results = directory::search_clients(&self.clients()?, &criteria);
                Ok(serde_json::to_value(results)?)
            }
            "add_new_client" => {
                let create: ClientCreate = serde_json::from_value(params)?;
                let mut dir = ClientDirectory::from_clients(self.clients()?);
                let created = dir
                    .create_client(create)
                    .map_err(|err| Self::procedure_error(name, err))?;
                self.write_table("clients", to_rows(dir.clients()))?;
                Ok(serde_json::to_value(created)?)
            }
            "update_client" => {
                let id = params
                    .get("id")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| Self::procedure_error(name, "missing id parameter"))?;
                let update: ClientUpdate = serde_json::from_value(params)?;
                let mut dir = ClientDirectory::from_clients(self.clients()?);
                dir.update_client(id, &update)
                    .map_err(|err| Self::procedure_error(name, err))?;
                self.write_table("clients", to_rows(dir.clients()))?;
                Ok(Value::Null)
            }
            "get_client_statistics" => {
                let client_id = params
                    .get("client_id")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| Self::procedure_error(name, "missing client_id parameter"))?;
                let client = self
                    .clients()?
                    .into_iter()
                    .find(|c| c.id == client_id)
                    .ok_or_else(|| Self::procedure_error(name, "client not found"))?;

                let label = client.kind.display_label();
                let reservations: Vec<Reservation> = self
                    .read_table("reservations")?
                    .into_iter()
                    .filter_map(|row| serde_json::from_value(row).ok())
                    .filter(|r: &Reservation| r.usager == label)
                    .collect();
                Ok(json!({
                    "nombre_reservations": reservations.len(),
                    "montant_total_reservations":
                        reservations.iter().map(|r| r.montant).sum::<f64>(),
                }))
            }
            other => Err(Self::procedure_error(other, "unknown procedure")),
        }
    }
}

/// Placeholder dataset used when the store is unreachable on initial load.
/// Small but covering every screen: three hotels, a few reservations, the
/// three client forms, and conventions tying clients to hotels.
pub fn seed_state() -> AppState {
    let now = Utc::now();
    let hotels = vec![
        Hotel {
            id: 1,
            nom: "Hôtel du Parc".to_string(),
            ville: Some("Toulouse".to_string()),
            chambres_total: 45,
            chambres_occupees: 38,
            taux_occupation: 84.0,
            statut: HotelStatus::Actif,
        },
        Hotel {
            id: 2,
            nom: "Résidence Les Tilleuls".to_string(),
            ville: Some("Toulouse".to_string()),
            chambres_total: 30,
            chambres_occupees: 12,
            taux_occupation: 40.0,
            statut: HotelStatus::Actif,
        },
        Hotel {
            id: 3,
            nom: "Hôtel de la Gare".to_string(),
            ville: Some("Montauban".to_string()),
            chambres_total: 25,
            chambres_occupees: 0,
            taux_occupation: 0.0,
            statut: HotelStatus::Maintenance,
        },
    ];

    let reservations = vec![
        Reservation {
            id: 1,
            usager: "Jean Dupont".to_string(),
            hotel: "Hôtel du Parc".to_string(),
            statut: ReservationStatus::EnCours,
            montant: 315.0,
        },
        Reservation {
            id: 2,
            usager: "Fatima Benali".to_string(),
            hotel: "Hôtel du Parc".to_string(),
            statut: ReservationStatus::Confirmee,
            montant: 180.0,
        },
        Reservation {
            id: 3,
            usager: "Jean Dupont".to_string(),
            hotel: "Résidence Les Tilleuls".to_string(),
            statut: ReservationStatus::Terminee,
            montant: 240.0,
        },
        Reservation {
            id: 4,
            usager: "Marc Lefèvre".to_string(),
            hotel: "Résidence Les Tilleuls".to_string(),
            statut: ReservationStatus::Annulee,
            montant: 0.0,
        },
    ];

    let clients = vec![
        Client {
            id: 1,
            numero_client: "PAR0001".to_string(),
            kind: ClientKind::Individual {
                nom: "Dupont".to_string(),
                prenom: "Jean".to_string(),
                nombre_enfants: 2,
            },
            email: Some("jean.dupont@example.fr".to_string()),
            telephone: Some("05 61 00 00 01".to_string()),
            adresse: None,
            ville: Some("Toulouse".to_string()),
            code_postal: Some("31000".to_string()),
            pays: "France".to_string(),
            statut: ClientStatus::Actif,
            nombre_reservations: 2,
            montant_total_reservations: 555.0,
            created_at: now,
            updated_at: now,
        },
        Client {
            id: 2,
            numero_client: "ASS0001".to_string(),
            kind: ClientKind::Association {
                raison_sociale: "Secours Logement 31".to_string(),
                numero_agrement: "AG-2023-17".to_string(),
                nombre_adherents: Some(140),
            },
            email: Some("contact@secours-logement31.fr".to_string()),
            telephone: None,
            adresse: None,
            ville: Some("Toulouse".to_string()),
            code_postal: Some("31100".to_string()),
            pays: "France".to_string(),
            statut: ClientStatus::Actif,
            nombre_reservations: 0,
            montant_total_reservations: 0.0,
            created_at: now,
            updated_at: now,
        },
        Client {
            id: 3,
            numero_client: "ENT0001".to_string(),
            kind: ClientKind::Business {
                raison_sociale: "BTP Occitanie".to_string(),
                siret: "81234567800012".to_string(),
                secteur_activite: Some("construction".to_string()),
                nombre_employes: Some(85),
            },
            email: None,
            telephone: Some("05 61 00 00 03".to_string()),
            adresse: None,
            ville: Some("Blagnac".to_string()),
            code_postal: Some("31700".to_string()),
            pays: "France".to_string(),
            statut: ClientStatus::Inactif,
            nombre_reservations: 0,
            montant_total_reservations: 0.0,
            created_at: now,
            updated_at: now,
        },
    ];

    let mut convention_assoc = PriceConvention::draft(2, 1);
    convention_assoc.type_chambre = "adaptee".to_string();
    convention_assoc.prix_standard = 60.0;
    convention_assoc.prix_conventionne = 42.0;
    convention_assoc.reduction = 30;
    let mut convention_btp = PriceConvention::draft(3, 2);
    convention_btp.prix_standard = 55.0;
    convention_btp.prix_conventionne = 49.5;
    convention_btp.reduction = 10;
    let conventions = vec![PriceConvention::draft(1, 1), convention_assoc, convention_btp];

    AppState::new(hotels, reservations, clients, conventions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientTypeId;

    #[tokio::test]
    async fn test_query_unknown_table() {
        let store = MemoryStore::new();
        let err = store.query("factures", &[], None).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownTable(_)));
    }

    #[tokio::test]
    async fn test_query_filter_and_order() {
        let store = MemoryStore::seeded();
        let actifs = store
            .query("hotels", &[("statut".to_string(), json!("ACTIF"))], Some("nom"))
            .await
            .unwrap();
        assert_eq!(actifs.len(), 2);
        assert_eq!(actifs[0]["nom"], "Hôtel du Parc");
        assert_eq!(actifs[1]["nom"], "Résidence Les Tilleuls");
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = MemoryStore::seeded();
        let row = store
            .insert("reservations", json!({ "usager": "Test", "hotel": "Hôtel du Parc",
                "statut": "EN_COURS", "montant": 90.0 }))
            .await
            .unwrap();
        assert_eq!(row["id"], 5);
    }

    #[tokio::test]
    async fn test_search_clients_procedure() {
        let store = MemoryStore::seeded();
        let results = store
            .call_procedure("search_clients", json!({ "term": "dup", "statut": "actif" }))
            .await
            .unwrap();
        let results = results.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["label"], "Jean Dupont");
    }

    #[tokio::test]
    async fn test_add_new_client_procedure() {
        let store = MemoryStore::seeded();
        let created = store
            .call_procedure(
                "add_new_client",
                json!({ "type": "individual", "nom": "Martin", "prenom": "Sophie" }),
            )
            .await
            .unwrap();
        // PAR0001 already exists in the seed dataset
        assert_eq!(created["numero_client"], "PAR0002");

        let rows = store.query("clients", &[], None).await.unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[tokio::test]
    async fn test_add_new_client_validates() {
        let store = MemoryStore::seeded();
        let err = store
            .call_procedure("add_new_client", json!({ "type": "individual", "nom": "", "prenom": "X" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Procedure { .. }));
    }

    #[tokio::test]
    async fn test_update_client_procedure() {
        let store = MemoryStore::seeded();
        store
            .call_procedure("update_client", json!({ "id": 3, "statut": "actif" }))
            .await
            .unwrap();
        let rows = store
            .query("clients", &[("numero_client".to_string(), json!("ENT0001"))], None)
            .await
            .unwrap();
        assert_eq!(rows[0]["statut"], "actif");
    }

    #[tokio::test]
    async fn test_get_client_statistics_procedure() {
        let store = MemoryStore::seeded();
        let stats = store
            .call_procedure("get_client_statistics", json!({ "client_id": 1 }))
            .await
            .unwrap();
        // Jean Dupont holds reservations 1 and 3 in the seed dataset
        assert_eq!(stats["nombre_reservations"], 2);
        assert_eq!(stats["montant_total_reservations"], 555.0);
    }

    #[tokio::test]
    async fn test_unknown_procedure() {
        let store = MemoryStore::new();
        let err = store.call_procedure("generate_invoice", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Procedure { .. }));
    }

    #[test]
    fn test_seed_state_is_coherent() {
        let state = seed_state();
        assert_eq!(state.hotels.len(), 3);
        // Every convention points at an existing hotel and client
        for convention in &state.conventions {
            assert!(state.hotels.iter().any(|h| h.id == convention.hotel_id));
            assert!(state.clients.iter().any(|c| c.id == convention.client_id));
        }
        // Every reservation names a seeded hotel
        for reservation in &state.reservations {
            assert!(state.hotels.iter().any(|h| h.nom == reservation.hotel));
        }
        // Type prefixes line up with the client kinds
        for client in &state.clients {
            assert!(client.numero_client.starts_with(match client.kind.type_id() {
                ClientTypeId::Individual => "PAR",
                ClientTypeId::Business => "ENT",
                ClientTypeId::Association => "ASS",
            }));
        }
    }
}
