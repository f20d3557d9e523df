//! Client directory
//!
//! Owns the in-memory client collection: identifier generation, the search
//! predicate, creation with per-kind validation, and partial updates. The
//! store procedures (`search_clients`, `add_new_client`, `update_client`,
//! `get_client_statistics`) are reached through the async helpers at the
//! bottom; when the remote search is unavailable the same predicate runs
//! over the local collection, so both paths agree.

use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ResotelError, Result};
use crate::model::{
    Client, ClientCreate, ClientId, ClientKind, ClientSearchResult, ClientStatus, ClientTypeId,
    ClientUpdate,
};
use crate::store::DataStore;

/// Next `numero_client` for a type: prefix + zero-padded 4-digit sequence,
/// one past the highest existing sequence for that prefix.
///
/// Deterministic: the same `existing` set always yields the same number.
/// Entries with a foreign prefix or a non-numeric tail are ignored.
pub fn generate_client_number(type_id: ClientTypeId, existing: &[String]) -> String {
    let prefix = type_id.prefix();
    let next = existing
        .iter()
        .filter_map(|numero| numero.strip_prefix(prefix))
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    format!("{}{:04}", prefix, next)
}

/// Multi-criteria client search
///
/// The term is matched case-insensitively as a substring over the name
/// fields, email and `numero_client`; type and status are exact matches
/// when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub type_id: Option<ClientTypeId>,
    #[serde(default)]
    pub statut: Option<ClientStatus>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchCriteria {
    pub fn term(term: impl Into<String>) -> Self {
        Self { term: term.into(), ..Default::default() }
    }

    pub fn with_status(mut self, statut: ClientStatus) -> Self {
        self.statut = Some(statut);
        self
    }

    pub fn with_type(mut self, type_id: ClientTypeId) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// The filter predicate the store procedure implements server-side
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(type_id) = self.type_id {
            if client.kind.type_id() != type_id {
                return false;
            }
        }
        if let Some(statut) = self.statut {
            if client.statut != statut {
                return false;
            }
        }
        if self.term.is_empty() {
            return true;
        }
        let needle = self.term.to_lowercase();
        let mut haystacks: Vec<&str> = vec![&client.numero_client];
        match &client.kind {
            ClientKind::Individual { nom, prenom, .. } => {
                haystacks.push(nom);
                haystacks.push(prenom);
            }
            ClientKind::Business { raison_sociale, .. }
            | ClientKind::Association { raison_sociale, .. } => {
                haystacks.push(raison_sociale);
            }
        }
        if let Some(email) = &client.email {
            haystacks.push(email);
        }
        haystacks.iter().any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Filter `clients` by `criteria`, preserving input order (stable)
pub fn search_clients(clients: &[Client], criteria: &SearchCriteria) -> Vec<ClientSearchResult> {
    let mut results: Vec<ClientSearchResult> = clients
        .iter()
        .filter(|client| criteria.matches(client))
        .map(ClientSearchResult::from)
        .collect();
    if let Some(limit) = criteria.limit {
        results.truncate(limit);
    }
    results
}

/// Outcome of a successful client creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCreated {
    pub client_id: ClientId,
    pub numero_client: String,
}

/// Apply a partial update to a client in place
///
/// Name fields land on the matching variant; `nom`/`prenom` on a business
/// or `raison_sociale` on an individual are silently ignored, the same way
/// the store procedure drops parameters that do not apply.
pub fn apply_update(client: &mut Client, update: &ClientUpdate) {
    match &mut client.kind {
        ClientKind::Individual { nom, prenom, .. } => {
            if let Some(value) = &update.nom {
                *nom = value.clone();
            }
            if let Some(value) = &update.prenom {
                *prenom = value.clone();
            }
        }
        ClientKind::Business { raison_sociale, .. }
        | ClientKind::Association { raison_sociale, .. } => {
            if let Some(value) = &update.raison_sociale {
                *raison_sociale = value.clone();
            }
        }
    }
    if let Some(value) = &update.email {
        client.email = Some(value.clone());
    }
    if let Some(value) = &update.telephone {
        client.telephone = Some(value.clone());
    }
    if let Some(value) = &update.adresse {
        client.adresse = Some(value.clone());
    }
    if let Some(value) = &update.ville {
        client.ville = Some(value.clone());
    }
    if let Some(value) = &update.code_postal {
        client.code_postal = Some(value.clone());
    }
    if let Some(value) = &update.pays {
        client.pays = value.clone();
    }
    if let Some(statut) = update.statut {
        client.statut = statut;
    }
}

/// In-memory client collection with directory operations
#[derive(Debug, Clone)]
pub struct ClientDirectory {
    clients: Vec<Client>,
    next_id: ClientId,
}

impl Default for ClientDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientDirectory {
    pub fn new() -> Self {
        Self { clients: Vec::new(), next_id: 1 }
    }

    /// Rebuild the directory from store rows
    pub fn from_clients(clients: Vec<Client>) -> Self {
        let next_id = clients.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self { clients, next_id }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn search(&self, criteria: &SearchCriteria) -> Vec<ClientSearchResult> {
        search_clients(&self.clients, criteria)
    }

    /// Create a client: validates the per-kind required fields, assigns the
    /// id and the generated `numero_client`, enters `actif` status.
    pub fn create_client(&mut self, create: ClientCreate) -> Result<ClientCreated> {
        create.kind.validate()?;

        let existing: Vec<String> =
            self.clients.iter().map(|client| client.numero_client.clone()).collect();
        let numero_client = generate_client_number(create.kind.type_id(), &existing);
        let id = self.next_id;
        self.next_id += 1;

        let now = Utc::now();
        self.clients.push(Client {
            id,
            numero_client: numero_client.clone(),
            kind: create.kind,
            email: create.email,
            telephone: create.telephone,
            adresse: create.adresse,
            ville: create.ville,
            code_postal: create.code_postal,
            pays: create.pays.unwrap_or_else(|| "France".to_string()),
            statut: ClientStatus::Actif,
            nombre_reservations: 0,
            montant_total_reservations: 0.0,
            created_at: now,
            updated_at: now,
        });

        Ok(ClientCreated { client_id: id, numero_client })
    }

    /// Partial update. The client type and `numero_client` cannot change;
    /// the update payload has no way to express either.
    pub fn update_client(&mut self, id: ClientId, update: &ClientUpdate) -> Result<()> {
        let client = self
            .clients
            .iter_mut()
            .find(|client| client.id == id)
            .ok_or_else(|| ResotelError::NotFound(format!("client {}", id)))?;

        // Validate on a copy so a rejected update leaves the record intact
        let mut updated = client.clone();
        apply_update(&mut updated, update);
        updated.kind.validate()?;
        updated.updated_at = Utc::now();
        *client = updated;
        Ok(())
    }

    /// Soft delete: clients move to `archive`, never disappear
    pub fn archive_client(&mut self, id: ClientId) -> Result<()> {
        self.update_client(id, &ClientUpdate { statut: Some(ClientStatus::Archive), ..Default::default() })
    }
}

/// Remote search through the `search_clients` procedure, reproducing the
/// same predicate locally when the store is unavailable.
pub async fn search_remote(
    store: &dyn DataStore,
    criteria: &SearchCriteria,
    local: &[Client],
) -> Vec<ClientSearchResult> {
    let params = match serde_json::to_value(criteria) {
        Ok(params) => params,
        Err(err) => {
            warn!("unserializable search criteria, filtering locally: {}", err);
            return search_clients(local, criteria);
        }
    };
    match store.call_procedure("search_clients", params).await {
        Ok(value) => match serde_json::from_value(value) {
            Ok(results) => results,
            Err(err) => {
                warn!("search_clients returned an unreadable payload, filtering locally: {}", err);
                search_clients(local, criteria)
            }
        },
        Err(err) => {
            warn!("search_clients unavailable, filtering locally: {}", err);
            search_clients(local, criteria)
        }
    }
}

/// Persist a new client through `add_new_client`. Mutation path: the error
/// is surfaced, not retried.
pub async fn push_client(store: &dyn DataStore, create: &ClientCreate) -> Result<ClientCreated> {
    create.kind.validate()?;
    let value = store.call_procedure("add_new_client", serde_json::to_value(create)?).await?;
    Ok(serde_json::from_value(value)?)
}

/// Persist a partial update through `update_client`
pub async fn push_update(
    store: &dyn DataStore,
    id: ClientId,
    update: &ClientUpdate,
) -> Result<()> {
    let mut params = serde_json::to_value(update)?;
    params["id"] = json!(id);
    store.call_procedure("update_client", params).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ClientStatistics {
    #[serde(default)]
    nombre_reservations: u32,
    #[serde(default)]
    montant_total_reservations: f64,
}

/// Refresh the derived aggregates on a client from `get_client_statistics`
pub async fn refresh_statistics(store: &dyn DataStore, client: &mut Client) -> Result<()> {
    let value =
        store.call_procedure("get_client_statistics", json!({ "client_id": client.id })).await?;
    let stats: ClientStatistics = serde_json::from_value(value)?;
    client.nombre_reservations = stats.nombre_reservations;
    client.montant_total_reservations = stats.montant_total_reservations;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn individual(id: ClientId, numero: &str, nom: &str, prenom: &str) -> Client {
        let now = Utc::now();
        Client {
            id,
            numero_client: numero.to_string(),
            kind: ClientKind::Individual {
                nom: nom.to_string(),
                prenom: prenom.to_string(),
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

    #[test]
    fn test_first_number_of_a_type() {
        assert_eq!(generate_client_number(ClientTypeId::Individual, &[]), "PAR0001");
    }

    #[test]
    fn test_number_skips_other_prefixes() {
        let existing =
            vec!["PAR0001".to_string(), "PAR0003".to_string(), "ENT0009".to_string()];
        assert_eq!(generate_client_number(ClientTypeId::Individual, &existing), "PAR0004");
        assert_eq!(generate_client_number(ClientTypeId::Business, &existing), "ENT0010");
        assert_eq!(generate_client_number(ClientTypeId::Association, &existing), "ASS0001");
    }

    #[test]
    fn test_number_ignores_malformed_entries() {
        let existing = vec!["PARXXXX".to_string(), "PAR0002".to_string()];
        assert_eq!(generate_client_number(ClientTypeId::Individual, &existing), "PAR0003");
    }

    #[test]
    fn test_number_format() {
        for (type_id, prefix) in [
            (ClientTypeId::Individual, "PAR"),
            (ClientTypeId::Business, "ENT"),
            (ClientTypeId::Association, "ASS"),
        ] {
            let numero = generate_client_number(type_id, &[]);
            assert!(numero.starts_with(prefix));
            assert_eq!(numero.len(), 7);
            assert!(numero[3..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_search_term_and_status() {
        let mut inactive = individual(2, "PAR0002", "Dupuis", "Anne");
        inactive.statut = ClientStatus::Inactif;
        let clients = vec![individual(1, "PAR0001", "Dupont", "Jean"), inactive];

        let criteria = SearchCriteria::term("dup").with_status(ClientStatus::Actif);
        let results = search_clients(&clients, &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "Jean Dupont");
    }

    #[test]
    fn test_search_matches_numero_case_insensitive() {
        let clients = vec![individual(1, "PAR0001", "Dupont", "Jean")];
        let results = search_clients(&clients, &SearchCriteria::term("par00"));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_type_filter() {
        let mut clients = vec![individual(1, "PAR0001", "Dupont", "Jean")];
        let mut assoc = individual(2, "ASS0001", "", "");
        assoc.kind = ClientKind::Association {
            raison_sociale: "Dupont Solidarité".to_string(),
            numero_agrement: "AG-1".to_string(),
            nombre_adherents: None,
        };
        clients.push(assoc);

        let criteria = SearchCriteria::term("dupont").with_type(ClientTypeId::Association);
        let results = search_clients(&clients, &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);
    }

    #[test]
    fn test_search_is_stable() {
        let clients = vec![
            individual(3, "PAR0003", "Dupont", "Luc"),
            individual(1, "PAR0001", "Dupont", "Jean"),
        ];
        let results = search_clients(&clients, &SearchCriteria::term("dupont"));
        let ids: Vec<_> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_search_limit() {
        let clients = vec![
            individual(1, "PAR0001", "Dupont", "Jean"),
            individual(2, "PAR0002", "Dupont", "Luc"),
        ];
        let mut criteria = SearchCriteria::term("dupont");
        criteria.limit = Some(1);
        assert_eq!(search_clients(&clients, &criteria).len(), 1);
    }

    #[test]
    fn test_create_assigns_sequential_numbers() {
        let mut directory = ClientDirectory::new();
        let first = directory
            .create_client(ClientCreate {
                kind: ClientKind::Individual {
                    nom: "Dupont".to_string(),
                    prenom: "Jean".to_string(),
                    nombre_enfants: 2,
                },
                email: Some("jean.dupont@example.fr".to_string()),
                telephone: None,
                adresse: None,
                ville: None,
                code_postal: None,
                pays: None,
            })
            .unwrap();
        assert_eq!(first.numero_client, "PAR0001");

        let second = directory
            .create_client(ClientCreate {
                kind: ClientKind::Association {
                    raison_sociale: "Abri 31".to_string(),
                    numero_agrement: "AG-2023-17".to_string(),
                    nombre_adherents: Some(80),
                },
                email: None,
                telephone: None,
                adresse: None,
                ville: None,
                code_postal: None,
                pays: None,
            })
            .unwrap();
        assert_eq!(second.numero_client, "ASS0001");
        assert_ne!(first.client_id, second.client_id);

        let stored = directory.get(first.client_id).unwrap();
        assert_eq!(stored.statut, ClientStatus::Actif);
        assert_eq!(stored.pays, "France");
    }

    #[test]
    fn test_create_rejects_missing_name() {
        let mut directory = ClientDirectory::new();
        let err = directory
            .create_client(ClientCreate {
                kind: ClientKind::Business {
                    raison_sociale: String::new(),
                    siret: "81234567800012".to_string(),
                    secteur_activite: None,
                    nombre_employes: None,
                },
                email: None,
                telephone: None,
                adresse: None,
                ville: None,
                code_postal: None,
                pays: None,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ResotelError::Validation(ValidationError::MissingField("raison_sociale"))
        ));
    }

    #[test]
    fn test_update_unknown_client() {
        let mut directory = ClientDirectory::new();
        let err = directory.update_client(42, &ClientUpdate::default()).unwrap_err();
        assert!(matches!(err, ResotelError::NotFound(_)));
    }

    #[test]
    fn test_update_keeps_numero_and_applies_fields() {
        let mut directory =
            ClientDirectory::from_clients(vec![individual(1, "PAR0001", "Dupont", "Jean")]);
        directory
            .update_client(
                1,
                &ClientUpdate {
                    ville: Some("Toulouse".to_string()),
                    statut: Some(ClientStatus::Prospect),
                    ..Default::default()
                },
            )
            .unwrap();
        let client = directory.get(1).unwrap();
        assert_eq!(client.numero_client, "PAR0001");
        assert_eq!(client.ville.as_deref(), Some("Toulouse"));
        assert_eq!(client.statut, ClientStatus::Prospect);
    }

    #[test]
    fn test_update_rejects_emptied_name() {
        let mut directory =
            ClientDirectory::from_clients(vec![individual(1, "PAR0001", "Dupont", "Jean")]);
        let err = directory
            .update_client(1, &ClientUpdate { nom: Some("  ".to_string()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, ResotelError::Validation(_)));
        // The record is untouched after the rejected update
        assert_eq!(directory.get(1).unwrap().kind.display_label(), "Jean Dupont");
    }

    #[test]
    fn test_archive_is_soft_delete() {
        let mut directory =
            ClientDirectory::from_clients(vec![individual(1, "PAR0001", "Dupont", "Jean")]);
        directory.archive_client(1).unwrap();
        assert_eq!(directory.get(1).unwrap().statut, ClientStatus::Archive);
        assert_eq!(directory.clients().len(), 1);
    }
}
