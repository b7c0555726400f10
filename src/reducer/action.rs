use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::import::StatusMapping;
use crate::models::{Card, Collection, RarityDefinition, Variant};

/// A rarity rename applied by [`Action::UpdateRarities`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameChange {
    pub old_name: String,
    pub new_name: String,
}

impl NameChange {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}

/// Result of an external card lookup.
///
/// `rarity` only replaces the card's rarity when it is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub external_data: Option<Value>,
    #[serde(default)]
    pub rarity: Option<String>,
}

/// Every state transition the reducer understands.
///
/// Actions naming a collection, card or variant that does not exist leave
/// the state unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the whole state once the initial fetch completes.
    SetInitialData {
        collections: Vec<Collection>,
        selected_collection_id: Option<String>,
    },
    SetCollections(Vec<Collection>),
    SelectCollection(Option<String>),
    /// Append a collection and select it.
    AddCollection(Collection),
    DeleteCollection(String),
    ToggleCollected {
        collection_id: String,
        card_id: String,
    },
    ToggleVariantCollected {
        collection_id: String,
        card_id: String,
        variant_id: String,
    },
    UpdateCardImage {
        collection_id: String,
        card_id: String,
        image_url: Option<String>,
    },
    /// Overwrite a card's enrichment payload, leaving its rarity alone.
    UpdateCardDetails {
        collection_id: String,
        card_id: String,
        details: Option<Value>,
    },
    EnrichCard {
        collection_id: String,
        card_id: String,
        data: Enrichment,
    },
    /// Mark every card (and every variant) of a collection uncollected.
    ResetCollection(String),
    /// Merge collected flags from spreadsheet rows into matching cards.
    UpdateStatusWithMapping {
        collection_id: String,
        rows: Vec<Map<String, Value>>,
        mapping: StatusMapping,
    },
    EditCollectionDetails {
        collection_id: String,
        name: String,
        description: String,
    },
    UpdateRarities {
        collection_id: String,
        new_definitions: Vec<RarityDefinition>,
        name_changes: Vec<NameChange>,
        deleted_names: Vec<String>,
    },
    UpdateVariants {
        collection_id: String,
        new_variants: Vec<Variant>,
    },
    UpdateBinderSlots {
        collection_id: String,
        slots: Vec<Option<String>>,
    },
    AddCard {
        collection_id: String,
        card: Card,
    },
    EditCard {
        collection_id: String,
        old_card_id: String,
        updated_card: Card,
    },
    DeleteCard {
        collection_id: String,
        card_id: String,
    },
    SetLanguageForAllCards {
        collection_id: String,
        language: String,
    },
    /// Replace every collection with the migrated contents of a backup.
    LoadBackup(Vec<Value>),
    TogglePin(String),
    ReorderCollections(Vec<Collection>),
}
