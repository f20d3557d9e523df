//! Price-convention editing session
//!
//! Conventions are edited as a batch of drafts attached to one client, then
//! submitted to the store in one go. Drafts carry a stable synthetic key so
//! removing or filtering never depends on array positions.

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ResotelError, Result, ValidationError};
use crate::model::{ClientId, HotelId, MonthlyRate, PriceConvention, RateBasis};
use crate::model::convention::room_type_rank;
use crate::store::DataStore;

/// Active room-type filter on the convention list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomTypeFilter {
    #[default]
    All,
    Only(String),
}

impl RoomTypeFilter {
    /// Parse the UI label: "tous" (or "all") means no filter
    pub fn from_label(label: &str) -> Self {
        match label {
            "tous" | "all" => RoomTypeFilter::All,
            other => RoomTypeFilter::Only(other.to_string()),
        }
    }
}

/// One editable field of a convention draft
#[derive(Debug, Clone, PartialEq)]
pub enum ConventionField {
    TypeChambre(String),
    PrixStandard(f64),
    PrixConventionne(f64),
    ConditionsSpeciales(Option<String>),
}

/// Filter conventions by room type and order them: the fixed priority list
/// first, then any other type names alphabetically.
pub fn filter_by_room_type(
    conventions: &[PriceConvention],
    filter: &RoomTypeFilter,
) -> Vec<PriceConvention> {
    let mut filtered: Vec<PriceConvention> = conventions
        .iter()
        .filter(|convention| match filter {
            RoomTypeFilter::All => true,
            RoomTypeFilter::Only(type_chambre) => convention.type_chambre == *type_chambre,
        })
        .cloned()
        .collect();
    filtered.sort_by(|a, b| room_type_rank(&a.type_chambre).cmp(&room_type_rank(&b.type_chambre)));
    filtered
}

/// Editing session over one client's convention drafts
#[derive(Debug, Clone)]
pub struct ConventionSession {
    client_id: ClientId,
    drafts: Vec<PriceConvention>,
    filter: RoomTypeFilter,
}

impl ConventionSession {
    pub fn new(client_id: ClientId) -> Self {
        Self { client_id, drafts: Vec::new(), filter: RoomTypeFilter::All }
    }

    /// Resume editing existing conventions
    pub fn from_drafts(client_id: ClientId, drafts: Vec<PriceConvention>) -> Self {
        Self { client_id, drafts, filter: RoomTypeFilter::All }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn drafts(&self) -> &[PriceConvention] {
        &self.drafts
    }

    pub fn filter(&self) -> &RoomTypeFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: RoomTypeFilter) {
        self.filter = filter;
    }

    /// Append a new draft with the default rates, returning its key
    pub fn add(&mut self, hotel_id: HotelId) -> Uuid {
        let draft = PriceConvention::draft(self.client_id, hotel_id);
        let key = draft.key;
        self.drafts.push(draft);
        key
    }

    fn draft_mut(&mut self, key: Uuid) -> Result<&mut PriceConvention> {
        self.drafts
            .iter_mut()
            .find(|draft| draft.key == key)
            .ok_or_else(|| ResotelError::NotFound(format!("convention {}", key)))
    }

    /// Update one field of a draft. Price changes recompute the derived
    /// discount; a room-type change does not.
    pub fn update_field(&mut self, key: Uuid, field: ConventionField) -> Result<()> {
        let draft = self.draft_mut(key)?;
        match field {
            ConventionField::TypeChambre(type_chambre) => {
                draft.type_chambre = type_chambre;
            }
            ConventionField::PrixStandard(prix) => {
                draft.prix_standard = prix;
                draft.recompute_reduction();
            }
            ConventionField::PrixConventionne(prix) => {
                draft.prix_conventionne = prix;
                draft.recompute_reduction();
            }
            ConventionField::ConditionsSpeciales(conditions) => {
                draft.conditions_speciales = conditions;
            }
        }
        Ok(())
    }

    /// Set or overwrite one month's override (months run 1 through 12)
    pub fn set_monthly_rate(
        &mut self,
        key: Uuid,
        month: u8,
        basis: RateBasis,
        value: f64,
    ) -> Result<()> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidValue {
                field: "month",
                reason: format!("{} is outside 1..=12", month),
            }
            .into());
        }
        let draft = self.draft_mut(key)?;
        let rate = draft.tarifs_mensuels.entry(month).or_insert_with(MonthlyRate::default);
        match basis {
            RateBasis::ParPersonne => rate.prix_par_personne = Some(value),
            RateBasis::ParChambre => rate.prix_par_chambre = Some(value),
        }
        Ok(())
    }

    /// Remove a draft by key. If the active room-type filter no longer
    /// matches any remaining draft it resets to "all".
    pub fn remove(&mut self, key: Uuid) -> Result<()> {
        let before = self.drafts.len();
        self.drafts.retain(|draft| draft.key != key);
        if self.drafts.len() == before {
            return Err(ResotelError::NotFound(format!("convention {}", key)));
        }
        if let RoomTypeFilter::Only(type_chambre) = &self.filter {
            if !self.drafts.iter().any(|draft| draft.type_chambre == *type_chambre) {
                self.filter = RoomTypeFilter::All;
            }
        }
        Ok(())
    }

    /// Drafts visible under the active filter, in priority order
    pub fn filtered(&self) -> Vec<PriceConvention> {
        filter_by_room_type(&self.drafts, &self.filter)
    }

    /// Submit the whole batch to the store. Mutation path: errors are
    /// surfaced as-is, nothing is retried.
    pub async fn submit(&self, store: &dyn DataStore) -> Result<()> {
        for draft in &self.drafts {
            store.insert("conventions_prix", serde_json::to_value(draft)?).await?;
        }
        info!(
            "submitted {} convention(s) for client {}",
            self.drafts.len(),
            self.client_id
        );
        Ok(())
    }
}
