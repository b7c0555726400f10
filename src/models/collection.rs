use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::card::Card;
use super::lenient;
use super::rarity::RarityDefinition;
use super::variant::Variant;

// ---------------------------------------------------------------------------
// CustomFieldDefinition
// ---------------------------------------------------------------------------

/// A user-defined free-text attribute shown on cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldDefinition {
    #[serde(deserialize_with = "lenient::text")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
}

impl CustomFieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// Optional capabilities of a collection.
///
/// `binder_slots` is a sparse list of pockets; `None` is an empty pocket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default, deserialize_with = "lenient::list")]
    pub variants: Vec<Variant>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub custom_fields: Vec<CustomFieldDefinition>,
    #[serde(default, deserialize_with = "lenient::slot_list")]
    pub binder_slots: Vec<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Collection: The root entity
// ---------------------------------------------------------------------------

/// A canonical collection: the output of [`migrate`](crate::migrate) and the
/// unit the reducer operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default, deserialize_with = "lenient::list")]
    pub rarity_definitions: Vec<RarityDefinition>,
    #[serde(default)]
    pub features: Features,
    pub cards: Vec<Card>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Collection {
    /// Create an empty, user-authored collection.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            is_custom: true,
            is_pinned: false,
            rarity_definitions: Vec::new(),
            features: Features::default(),
            cards: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    pub fn with_rarities(mut self, rarities: Vec<RarityDefinition>) -> Self {
        self.rarity_definitions = rarities;
        self
    }

    pub fn with_variants(mut self, variants: Vec<Variant>) -> Self {
        self.features.variants = variants;
        self
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn rarity(&self, name: &str) -> Option<&RarityDefinition> {
        self.rarity_definitions.iter().find(|r| r.name == name)
    }

    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.features.variants.iter().find(|v| v.id == id)
    }

    pub fn variant_ids(&self) -> HashSet<&str> {
        self.features.variants.iter().map(|v| v.id.as_str()).collect()
    }

    /// Ids currently occupying a binder pocket.
    pub fn placed_card_ids(&self) -> HashSet<&str> {
        self.features
            .binder_slots
            .iter()
            .flatten()
            .map(|id| id.as_str())
            .collect()
    }
}
