use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::lenient;
use super::variant::Variant;
use crate::config;

// ---------------------------------------------------------------------------
// Card: One entry of a collection's checklist
// ---------------------------------------------------------------------------

/// A single card tracked by a collection.
///
/// `variant_collected` is keyed by [`Variant::id`]; `custom_fields` by
/// [`CustomFieldDefinition::key`](super::CustomFieldDefinition::key). Keys in
/// `custom_fields` that no longer have a definition are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub collected: bool,
    #[serde(default, deserialize_with = "lenient::flag_map")]
    pub variant_collected: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "lenient::text_map")]
    pub custom_fields: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub custom_image_url: Option<String>,
    #[serde(default)]
    pub external_data: Option<Value>,
    #[serde(default = "default_language", deserialize_with = "lenient::text")]
    pub language: String,
    /// Fields this version does not know about, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_language() -> String {
    config::DEFAULT_LANGUAGE.to_string()
}

impl Card {
    /// Create an uncollected card with no rarity.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity: None,
            description: String::new(),
            collected: false,
            variant_collected: BTreeMap::new(),
            custom_fields: BTreeMap::new(),
            custom_image_url: None,
            external_data: None,
            language: default_language(),
            extra: Map::new(),
        }
    }

    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_collected(mut self, collected: bool) -> Self {
        self.collected = collected;
        self
    }

    /// Whether the given variant has been marked collected on this card.
    pub fn is_variant_collected(&self, variant_id: &str) -> bool {
        self.variant_collected.get(variant_id).copied().unwrap_or(false)
    }

    /// The variants from `variants` that can be tracked on this card.
    pub fn applicable_variants<'v>(&self, variants: &'v [Variant]) -> impl Iterator<Item = &'v Variant> + 'v {
        let rarity = self.rarity.clone();
        variants
            .iter()
            .filter(move |v| v.applies_to_rarity(rarity.as_deref()))
    }
}
