//! Shared test fixtures for the collection core integration tests.
//!
//! Provides a canonical sample collection, a fully legacy-shaped raw
//! document, and helpers for building reducer state around them.

#![allow(dead_code)]

use mycollector_core::models::{Card, Collection, RarityCategory, RarityDefinition, Variant};
use mycollector_core::CollectionsState;
use serde_json::{json, Value};

/// A canonical collection with three rarities, one variant and five cards.
///
/// - rarities: `Common`, `Rare` (Standard) and `Secret Rare` (Special)
/// - variant `holo-v1` applies to `Rare`
/// - cards `001`..`005`; `002` and `003` are Rare, `005` is Secret Rare
pub fn sample_collection() -> Collection {
    Collection::new("set-1", "Set One")
        .with_rarities(vec![
            RarityDefinition::new("Common"),
            RarityDefinition::new("Rare"),
            RarityDefinition::new("Secret Rare").with_category(RarityCategory::Special),
        ])
        .with_variants(vec![Variant::new("holo-v1", "Holo", &["Rare"])])
        .with_cards(vec![
            Card::new("001", "Pikachu").with_rarity("Common").with_collected(true),
            Card::new("002", "Raichu").with_rarity("Rare"),
            Card::new("003", "Zapdos").with_rarity("Rare").with_collected(true),
            Card::new("004", "Magikarp").with_rarity("Common"),
            Card::new("005", "Mew").with_rarity("Secret Rare"),
        ])
}

/// A second, smaller collection.
pub fn other_collection() -> Collection {
    Collection::new("set-2", "Set Two")
        .with_rarities(vec![RarityDefinition::new("Common")])
        .with_cards(vec![Card::new("a1", "Bulbasaur").with_rarity("Common")])
}

/// Loaded state holding the given collections, the first one selected.
pub fn state_with(collections: Vec<Collection>) -> CollectionsState {
    CollectionsState {
        selected_collection_id: collections.first().map(|c| c.id.clone()),
        collections,
        is_loaded: true,
    }
}

/// A document written by the oldest client: every legacy field present.
pub fn legacy_document() -> Value {
    json!({
        "id": "old-set",
        "name": "Old Set",
        "description": "From the first release",
        "language": "ja",
        "defaultCardImageUrlPattern": "https://img.example/{id}.png",
        "features": {
            "hasVariants": { "variantName": "Reverse Holo", "appliesTo": ["Common", "Rare"] },
            "binderSortOrder": ["2", null, "1"],
        },
        "cards": [
            {
                "id": "1",
                "name": "Charmander",
                "rarity": "Common",
                "collected": true,
                "isHoloCollected": true,
                "imageUrl": "https://img.example/1.png",
                "officialImageUrl": "https://img.example/official/1.png",
                "cardTraderData": { "price": 1.5 },
            },
            {
                "id": "2",
                "name": "Charizard",
                "rarity": "Rare",
                "isHoloCollected": false,
                "cardTraderData": null,
                "language": "en",
            },
            {
                "id": "3",
                "name": "Ditto",
            },
        ],
    })
}

/// The raw document from the end-to-end scenario.
pub fn pikachu_document() -> Value {
    json!({
        "id": "set-1",
        "name": "Set One",
        "cards": [{ "id": "001", "name": "Pikachu", "rarity": "Common", "isHoloCollected": true }],
        "features": { "hasVariants": { "variantName": "Holo", "appliesTo": ["Common"] } },
    })
}

/// Keys that must not survive migration, per card and per collection.
pub const LEGACY_CARD_KEYS: [&str; 4] = ["isHoloCollected", "imageUrl", "officialImageUrl", "cardTraderData"];
pub const LEGACY_COLLECTION_KEYS: [&str; 2] = ["language", "defaultCardImageUrlPattern"];
pub const LEGACY_FEATURE_KEYS: [&str; 2] = ["hasVariants", "binderSortOrder"];

pub fn card<'a>(state: &'a CollectionsState, collection_id: &str, card_id: &str) -> &'a Card {
    state
        .collection(collection_id)
        .and_then(|c| c.card(card_id))
        .unwrap_or_else(|| panic!("missing card {collection_id}/{card_id}"))
}
