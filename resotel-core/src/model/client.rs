//! Client records (particuliers, entreprises, associations)
//!
//! A client is polymorphic over its legal form. The variant decides which
//! name fields are primary (`nom`/`prenom` vs `raison_sociale`) and which
//! registration fields are required, so the variant data carries them
//! directly instead of a flat record full of optional columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ClientId;

/// Numeric type discriminant, as stored in the `type_id` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientTypeId {
    Individual = 1,
    Business = 2,
    Association = 3,
}

// On the wire this is the store's integer column, not an enum name
impl Serialize for ClientTypeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_id())
    }
}

impl<'de> Deserialize<'de> for ClientTypeId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = i64::deserialize(deserializer)?;
        ClientTypeId::from_id(id)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown type_id {}", id)))
    }
}

impl ClientTypeId {
    /// Prefix used when generating `numero_client`
    pub fn prefix(self) -> &'static str {
        match self {
            ClientTypeId::Individual => "PAR",
            ClientTypeId::Business => "ENT",
            ClientTypeId::Association => "ASS",
        }
    }

    /// Map the store's integer discriminant back to a type id
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(ClientTypeId::Individual),
            2 => Some(ClientTypeId::Business),
            3 => Some(ClientTypeId::Association),
            _ => None,
        }
    }

    pub fn as_id(self) -> i64 {
        self as i64
    }
}

/// Per-variant client data
///
/// Serialized with an internal `type` tag so rows stay self-describing when
/// they cross the store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientKind {
    /// Particulier
    Individual {
        nom: String,
        prenom: String,
        #[serde(default)]
        nombre_enfants: u32,
    },
    /// Entreprise
    Business {
        raison_sociale: String,
        siret: String,
        #[serde(default)]
        secteur_activite: Option<String>,
        #[serde(default)]
        nombre_employes: Option<u32>,
    },
    /// Association / opérateur social
    Association {
        raison_sociale: String,
        numero_agrement: String,
        #[serde(default)]
        nombre_adherents: Option<u32>,
    },
}

impl ClientKind {
    pub fn type_id(&self) -> ClientTypeId {
        match self {
            ClientKind::Individual { .. } => ClientTypeId::Individual,
            ClientKind::Business { .. } => ClientTypeId::Business,
            ClientKind::Association { .. } => ClientTypeId::Association,
        }
    }

    /// Human-readable label: "Prenom Nom" for individuals, the raison
    /// sociale otherwise.
    pub fn display_label(&self) -> String {
        match self {
            ClientKind::Individual { nom, prenom, .. } => {
                if prenom.is_empty() {
                    nom.clone()
                } else {
                    format!("{} {}", prenom, nom)
                }
            }
            ClientKind::Business { raison_sociale, .. }
            | ClientKind::Association { raison_sociale, .. } => raison_sociale.clone(),
        }
    }

    /// Check the per-variant required fields
    ///
    /// Individuals need a `nom`; businesses need a `raison_sociale` and a
    /// SIRET; associations need a `raison_sociale` and a numero d'agrément.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ClientKind::Individual { nom, .. } => {
                if nom.trim().is_empty() {
                    return Err(ValidationError::MissingField("nom"));
                }
            }
            ClientKind::Business { raison_sociale, siret, .. } => {
                if raison_sociale.trim().is_empty() {
                    return Err(ValidationError::MissingField("raison_sociale"));
                }
                if siret.trim().is_empty() {
                    return Err(ValidationError::MissingField("siret"));
                }
            }
            ClientKind::Association { raison_sociale, numero_agrement, .. } => {
                if raison_sociale.trim().is_empty() {
                    return Err(ValidationError::MissingField("raison_sociale"));
                }
                if numero_agrement.trim().is_empty() {
                    return Err(ValidationError::MissingField("numero_agrement"));
                }
            }
        }
        Ok(())
    }
}

/// Lifecycle status of a client record
///
/// Clients are never hard-deleted; retiring one moves it to `Archive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Actif,
    Inactif,
    Prospect,
    Archive,
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ClientStatus::Actif => "actif",
            ClientStatus::Inactif => "inactif",
            ClientStatus::Prospect => "prospect",
            ClientStatus::Archive => "archive",
        };
        write!(f, "{}", label)
    }
}

/// Full client record as held in memory and in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Generated identifier, e.g. "PAR0001". Immutable once assigned.
    pub numero_client: String,
    #[serde(flatten)]
    pub kind: ClientKind,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub adresse: Option<String>,
    #[serde(default)]
    pub ville: Option<String>,
    #[serde(default)]
    pub code_postal: Option<String>,
    #[serde(default = "default_pays")]
    pub pays: String,
    #[serde(default)]
    pub statut: ClientStatus,
    /// Derived aggregates, refreshed from the store. Never authoritative.
    #[serde(default)]
    pub nombre_reservations: u32,
    #[serde(default)]
    pub montant_total_reservations: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_pays() -> String {
    "France".to_string()
}

/// Payload for creating a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCreate {
    #[serde(flatten)]
    pub kind: ClientKind,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub adresse: Option<String>,
    #[serde(default)]
    pub ville: Option<String>,
    #[serde(default)]
    pub code_postal: Option<String>,
    #[serde(default)]
    pub pays: Option<String>,
}

/// Partial update payload. All fields optional; `type_id` and
/// `numero_client` are deliberately absent (immutable post-creation).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub raison_sociale: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub adresse: Option<String>,
    pub ville: Option<String>,
    pub code_postal: Option<String>,
    pub pays: Option<String>,
    pub statut: Option<ClientStatus>,
}

/// Row shape returned by client search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSearchResult {
    pub id: ClientId,
    pub numero_client: String,
    pub type_id: ClientTypeId,
    pub label: String,
    pub email: Option<String>,
    pub statut: ClientStatus,
}

impl From<&Client> for ClientSearchResult {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            numero_client: client.numero_client.clone(),
            type_id: client.kind.type_id(),
            label: client.kind.display_label(),
            email: client.email.clone(),
            statut: client.statut,
        }
    }
}
