//! The individual schema upgrade steps.
//!
//! Each step works on the raw JSON document, is idempotent, and reports
//! whether it changed anything.

use serde_json::{json, Map, Value};
use std::collections::HashSet;

use super::Migrator;
use crate::config;
use crate::models::lenient::{is_truthy, loose_text, scalar_text};
use crate::models::{RarityCategory, Variant};
use crate::style;

type Doc = Map<String, Value>;

fn cards_mut(doc: &mut Doc) -> impl Iterator<Item = &mut Doc> {
    doc.get_mut("cards")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flat_map(|cards| cards.iter_mut())
        .filter_map(Value::as_object_mut)
}

/// `features`, created as an empty object when missing or not an object.
fn features_mut(doc: &mut Doc) -> &mut Doc {
    let entry = doc
        .entry("features")
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(map) => map,
        _ => unreachable!("features was just replaced by an object"),
    }
}

fn rarity_definition(name: &str) -> Value {
    json!({
        "name": name,
        "style": style::resolve_style(name),
    })
}

// ---------------------------------------------------------------------------
// 1. Rarity backfill
// ---------------------------------------------------------------------------

/// Derive `rarityDefinitions` from the distinct card rarities, first-seen order.
pub(crate) fn backfill_rarities(doc: &mut Doc, _: &Migrator) -> bool {
    if matches!(doc.get("rarityDefinitions"), Some(Value::Array(_))) {
        return false;
    }
    let mut seen = HashSet::new();
    let mut definitions = Vec::new();
    for card in cards_mut(doc) {
        let Some(rarity) = card.get("rarity") else {
            continue;
        };
        if !is_truthy(rarity) {
            continue;
        }
        if let Some(name) = scalar_text(rarity) {
            if seen.insert(name.clone()) {
                definitions.push(rarity_definition(&name));
            }
        }
    }
    doc.insert("rarityDefinitions".into(), Value::Array(definitions));
    true
}

// ---------------------------------------------------------------------------
// 2. Rarity category backfill
// ---------------------------------------------------------------------------

/// Give every rarity definition a category.
///
/// Missing categories become `Standard`. Values other than the two known
/// categories never counted as standard, so they become `Special`. Bare
/// string entries are expanded into full definitions.
pub(crate) fn backfill_rarity_categories(doc: &mut Doc, _: &Migrator) -> bool {
    let Some(Value::Array(definitions)) = doc.get_mut("rarityDefinitions") else {
        return false;
    };
    let mut changed = false;
    let before = definitions.len();
    definitions.retain(|d| d.is_object() || d.is_string());
    if definitions.len() != before {
        log::warn!("Dropped {} malformed rarity definitions", before - definitions.len());
        changed = true;
    }
    for definition in definitions.iter_mut() {
        if let Some(name) = definition.as_str().map(str::to_string) {
            *definition = rarity_definition(&name);
            changed = true;
        }
        let Some(def) = definition.as_object_mut() else {
            continue;
        };
        let category = match def.get("category") {
            Some(v) if !is_truthy(v) => RarityCategory::Standard,
            None => RarityCategory::Standard,
            Some(Value::String(s)) if s == RarityCategory::Standard.as_str() => continue,
            Some(Value::String(s)) if s == RarityCategory::Special.as_str() => continue,
            Some(_) => RarityCategory::Special,
        };
        def.insert("category".into(), Value::String(category.as_str().into()));
        changed = true;
    }
    changed
}

// ---------------------------------------------------------------------------
// 3. Single variant -> variant list
// ---------------------------------------------------------------------------

/// Convert the legacy `features.hasVariants` object into a [`Variant`] and
/// move each card's `isHoloCollected` flag under the new variant id.
pub(crate) fn migrate_single_variant(doc: &mut Doc, _: &Migrator) -> bool {
    let legacy = match doc.get_mut("features").and_then(Value::as_object_mut) {
        Some(features) => match features.remove("hasVariants") {
            Some(v) => v,
            None => return false,
        },
        None => return false,
    };
    if !is_truthy(&legacy) {
        return true;
    }

    let variant_name = legacy
        .get("variantName")
        .filter(|v| is_truthy(v))
        .and_then(scalar_text);
    let variant_id = Variant::legacy_id(variant_name.as_deref().unwrap_or("variant"));
    let applies_to = match legacy.get("appliesTo") {
        Some(Value::Array(list)) => Value::Array(list.clone()),
        _ => json!(["Common"]),
    };

    let features = features_mut(doc);
    let variants = features
        .entry("variants")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !variants.is_array() {
        *variants = Value::Array(Vec::new());
    }
    if let Value::Array(list) = variants {
        list.push(json!({
            "id": variant_id,
            "name": variant_name.unwrap_or_else(|| "Holo".to_string()),
            "appliesTo": applies_to,
        }));
    }

    for card in cards_mut(doc) {
        let Some(holo) = card.remove("isHoloCollected") else {
            continue;
        };
        let collected = card
            .entry("variantCollected")
            .or_insert_with(|| Value::Object(Map::new()));
        if !collected.is_object() {
            *collected = Value::Object(Map::new());
        }
        if let Value::Object(map) = collected {
            map.insert(variant_id.clone(), Value::Bool(is_truthy(&holo)));
        }
    }
    true
}

// ---------------------------------------------------------------------------
// 4. variantCollected backfill
// ---------------------------------------------------------------------------

pub(crate) fn backfill_variant_collected(doc: &mut Doc, _: &Migrator) -> bool {
    let has_variants = doc
        .get("features")
        .and_then(|f| f.get("variants"))
        .and_then(Value::as_array)
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    if !has_variants {
        return false;
    }
    let mut changed = false;
    for card in cards_mut(doc) {
        if !card.get("variantCollected").map(is_truthy).unwrap_or(false) {
            card.insert("variantCollected".into(), Value::Object(Map::new()));
            changed = true;
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// 5. Custom fields backfill
// ---------------------------------------------------------------------------

pub(crate) fn backfill_custom_fields(doc: &mut Doc, _: &Migrator) -> bool {
    let mut changed = !doc.get("features").map(Value::is_object).unwrap_or(false);
    let features = features_mut(doc);
    if !features.get("customFields").map(is_truthy).unwrap_or(false) {
        features.insert("customFields".into(), Value::Array(Vec::new()));
        changed = true;
    }
    for card in cards_mut(doc) {
        if !card.get("customFields").map(is_truthy).unwrap_or(false) {
            card.insert("customFields".into(), Value::Object(Map::new()));
            changed = true;
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// 6. Image field consolidation
// ---------------------------------------------------------------------------

pub(crate) fn consolidate_image_fields(doc: &mut Doc, _: &Migrator) -> bool {
    let mut changed = false;
    for card in cards_mut(doc) {
        let keep = card.get("customImageUrl").map(is_truthy).unwrap_or(false);
        if !keep && card.get("customImageUrl") != Some(&Value::Null) {
            card.insert("customImageUrl".into(), Value::Null);
            changed = true;
        }
        changed |= card.remove("imageUrl").is_some();
        changed |= card.remove("officialImageUrl").is_some();
    }
    changed
}

// ---------------------------------------------------------------------------
// 7. Default image pattern removal
// ---------------------------------------------------------------------------

pub(crate) fn remove_default_image_pattern(doc: &mut Doc, _: &Migrator) -> bool {
    doc.remove("defaultCardImageUrlPattern").is_some()
}

// ---------------------------------------------------------------------------
// 8. Pin flag backfill
// ---------------------------------------------------------------------------

pub(crate) fn backfill_pin_flag(doc: &mut Doc, _: &Migrator) -> bool {
    let pinned = doc.get("isPinned").map(is_truthy).unwrap_or(false);
    let changed = doc.get("isPinned") != Some(&Value::Bool(pinned));
    doc.insert("isPinned".into(), Value::Bool(pinned));
    changed
}

// ---------------------------------------------------------------------------
// 9. External data consolidation
// ---------------------------------------------------------------------------

/// Rename the enrichment payload from `cardTraderData` to `externalData`.
pub(crate) fn consolidate_external_data(doc: &mut Doc, _: &Migrator) -> bool {
    let mut changed = false;
    for card in cards_mut(doc) {
        if let Some(legacy) = card.remove("cardTraderData") {
            if is_truthy(&legacy) {
                card.insert("externalData".into(), legacy);
            }
            changed = true;
        }
        if !card.contains_key("externalData") {
            card.insert("externalData".into(), Value::Null);
            changed = true;
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// 10. Binder slot rename
// ---------------------------------------------------------------------------

pub(crate) fn rename_binder_slots(doc: &mut Doc, _: &Migrator) -> bool {
    let mut changed = false;
    let features = features_mut(doc);
    if let Some(order) = features.remove("binderSortOrder") {
        if is_truthy(&order) {
            features.insert("binderSlots".into(), order);
        }
        changed = true;
    }
    if !features.get("binderSlots").map(is_truthy).unwrap_or(false) {
        features.insert("binderSlots".into(), Value::Array(Vec::new()));
        changed = true;
    }
    changed
}

// ---------------------------------------------------------------------------
// 11. Per-card language
// ---------------------------------------------------------------------------

/// Push the collection-level `language` down onto every card that lacks one.
pub(crate) fn backfill_card_language(doc: &mut Doc, _: &Migrator) -> bool {
    let legacy = doc.remove("language");
    let mut changed = legacy.is_some();
    let collection_language = legacy
        .filter(|v| is_truthy(v))
        .and_then(|v| scalar_text(&v))
        .unwrap_or_else(|| config::DEFAULT_LANGUAGE.to_string());
    for card in cards_mut(doc) {
        if !card.get("language").map(is_truthy).unwrap_or(false) {
            card.insert("language".into(), Value::String(collection_language.clone()));
            changed = true;
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// 12. isCustom backfill
// ---------------------------------------------------------------------------

/// Deduce `isCustom` when it is not a boolean: catalog ids are not custom.
pub(crate) fn backfill_is_custom(doc: &mut Doc, migrator: &Migrator) -> bool {
    if matches!(doc.get("isCustom"), Some(Value::Bool(_))) {
        return false;
    }
    let id = doc.get("id").and_then(scalar_text).unwrap_or_default();
    let is_custom = !migrator.is_catalog_id(&id);
    doc.insert("isCustom".into(), Value::Bool(is_custom));
    true
}

// ---------------------------------------------------------------------------
// 13. Stale entry pruning
// ---------------------------------------------------------------------------

/// Keep the first rarity definition of each name, and drop `variantCollected`
/// flags whose variant is no longer defined.
pub(crate) fn prune_stale_entries(doc: &mut Doc, _: &Migrator) -> bool {
    let mut changed = false;
    if let Some(Value::Array(definitions)) = doc.get_mut("rarityDefinitions") {
        let before = definitions.len();
        let mut seen = HashSet::new();
        definitions.retain(|d| seen.insert(d.get("name").map(loose_text).unwrap_or_default()));
        if definitions.len() != before {
            log::warn!("Dropped {} duplicate rarity definitions", before - definitions.len());
            changed = true;
        }
    }

    let variant_ids: HashSet<String> = doc
        .get("features")
        .and_then(|f| f.get("variants"))
        .and_then(Value::as_array)
        .map(|variants| {
            variants
                .iter()
                .filter_map(|v| v.get("id"))
                .map(loose_text)
                .collect()
        })
        .unwrap_or_default();
    for card in cards_mut(doc) {
        if let Some(Value::Object(flags)) = card.get_mut("variantCollected") {
            let before = flags.len();
            flags.retain(|variant_id, _| variant_ids.contains(variant_id));
            changed |= flags.len() != before;
        }
    }
    changed
}
