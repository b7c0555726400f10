//! Schema migration engine.
//!
//! Upgrades a raw collection document of any prior shape to the canonical
//! [`Collection`]. The upgrade is an ordered list of named steps folded over
//! the JSON document; every step is idempotent, so migrating an already
//! canonical collection is a no-op.
//!
//! # Example
//!
//! ```rust
//! use mycollector_core::migrate::Migrator;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "id": "set-1",
//!     "name": "Set One",
//!     "cards": [{ "id": "001", "name": "Pikachu", "rarity": "Common" }],
//! });
//! let collection = Migrator::default().migrate(&raw).unwrap().unwrap();
//! assert_eq!(collection.rarity_definitions[0].name, "Common");
//! ```

mod steps;

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::config;
use crate::error::{CollectorError, Result};
use crate::models::lenient::{is_truthy, scalar_text};
use crate::models::Collection;

// ---------------------------------------------------------------------------
// MigrationStep
// ---------------------------------------------------------------------------

/// One named, idempotent transformation of a raw collection document.
///
/// `apply` returns whether the document was changed.
#[derive(Clone, Copy)]
pub struct MigrationStep {
    pub name: &'static str,
    pub apply: fn(&mut Map<String, Value>, &Migrator) -> bool,
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep").field("name", &self.name).finish()
    }
}

/// The upgrade pipeline, in application order.
pub const STEPS: [MigrationStep; 13] = [
    MigrationStep { name: "rarity_backfill", apply: steps::backfill_rarities },
    MigrationStep { name: "rarity_category_backfill", apply: steps::backfill_rarity_categories },
    MigrationStep { name: "single_variant_to_variants", apply: steps::migrate_single_variant },
    MigrationStep { name: "variant_collected_backfill", apply: steps::backfill_variant_collected },
    MigrationStep { name: "custom_fields_backfill", apply: steps::backfill_custom_fields },
    MigrationStep { name: "image_field_consolidation", apply: steps::consolidate_image_fields },
    MigrationStep { name: "default_image_pattern_removal", apply: steps::remove_default_image_pattern },
    MigrationStep { name: "pin_flag_backfill", apply: steps::backfill_pin_flag },
    MigrationStep { name: "external_data_consolidation", apply: steps::consolidate_external_data },
    MigrationStep { name: "binder_slot_rename", apply: steps::rename_binder_slots },
    MigrationStep { name: "card_language_backfill", apply: steps::backfill_card_language },
    MigrationStep { name: "is_custom_backfill", apply: steps::backfill_is_custom },
    MigrationStep { name: "stale_entry_pruning", apply: steps::prune_stale_entries },
];

// ---------------------------------------------------------------------------
// Migrator
// ---------------------------------------------------------------------------

/// Runs [`STEPS`] over raw collection documents.
///
/// Holds the set of catalog collection ids used to deduce `isCustom` on
/// documents that predate the flag.
#[derive(Debug, Clone)]
pub struct Migrator {
    catalog_ids: HashSet<String>,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new(config::default_catalog_ids())
    }
}

impl Migrator {
    pub fn new(catalog_ids: HashSet<String>) -> Self {
        Self { catalog_ids }
    }

    pub fn is_catalog_id(&self, id: &str) -> bool {
        self.catalog_ids.contains(id)
    }

    pub fn catalog_ids(&self) -> &HashSet<String> {
        &self.catalog_ids
    }

    /// Migrate one raw document.
    ///
    /// Returns `Ok(None)` for falsy input (`null`, `false`, `0`, `""`).
    /// Fails with [`CollectorError::MissingCards`] when the document has no
    /// `cards` array, the one requirement that cannot be defaulted.
    pub fn migrate(&self, raw: &Value) -> Result<Option<Collection>> {
        if !is_truthy(raw) {
            return Ok(None);
        }
        let Value::Object(map) = raw else {
            return Err(CollectorError::InvalidArgument(format!(
                "collection must be a JSON object, found {raw}"
            )));
        };
        let mut doc = map.clone();
        self.apply_steps(&mut doc)?;
        let collection: Collection = serde_json::from_value(Value::Object(doc))?;
        Ok(Some(collection))
    }

    /// Run every step over `doc` in place.
    pub fn apply_steps(&self, doc: &mut Map<String, Value>) -> Result<()> {
        let id = doc.get("id").and_then(scalar_text).unwrap_or_default();
        match doc.get("cards") {
            Some(Value::Array(cards)) => {
                if let Some(bad) = cards.iter().find(|c| !c.is_object()) {
                    return Err(CollectorError::InvalidArgument(format!(
                        "collection '{id}' has a card that is not an object: {bad}"
                    )));
                }
            }
            _ => return Err(CollectorError::MissingCards { collection: id }),
        }

        for step in STEPS.iter() {
            if (step.apply)(doc, self) {
                log::debug!("Migration step {} changed collection '{}'", step.name, id);
            }
        }
        Ok(())
    }

    /// Migrate a batch, skipping (and logging) documents that cannot be
    /// migrated and falsy entries.
    pub fn migrate_all(&self, raws: &[Value]) -> Vec<Collection> {
        self.migrate_partitioned(raws).0
    }

    /// Migrate a batch, returning the migrated collections alongside the raw
    /// documents that failed. Falsy entries appear in neither list.
    pub fn migrate_partitioned(&self, raws: &[Value]) -> (Vec<Collection>, Vec<Value>) {
        let mut collections = Vec::with_capacity(raws.len());
        let mut failed = Vec::new();
        for (i, raw) in raws.iter().enumerate() {
            match self.migrate(raw) {
                Ok(Some(collection)) => collections.push(collection),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping collection at index {}: {}", i, e);
                    failed.push(raw.clone());
                }
            }
        }
        (collections, failed)
    }
}

/// Migrate one raw document with the default catalog ids.
pub fn migrate(raw: &Value) -> Result<Option<Collection>> {
    Migrator::default().migrate(raw)
}
