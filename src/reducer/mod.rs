//! Collection state reducer.
//!
//! A pure `(state, action) -> state` transition over the list of collections
//! and the selected-collection pointer. Each action is applied in full to a
//! copy of the previous state, which stays untouched and usable for diffing.
//!
//! Cross-field obligations kept here:
//! - rarity renames propagate to cards and to `Variant::applies_to`;
//! - variant list changes prune stale `variant_collected` keys;
//! - card id changes and deletions propagate to binder slots, deletions
//!   leaving an empty pocket so other placements keep their positions.

mod action;

pub use action::{Action, Enrichment, NameChange};

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::import;
use crate::migrate::Migrator;
use crate::models::{Card, Collection};

// ---------------------------------------------------------------------------
// CollectionsState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsState {
    pub collections: Vec<Collection>,
    pub selected_collection_id: Option<String>,
    /// Set once initial data has been loaded.
    pub is_loaded: bool,
}

impl CollectionsState {
    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn selected_collection(&self) -> Option<&Collection> {
        self.selected_collection_id
            .as_deref()
            .and_then(|id| self.collection(id))
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Applies [`Action`]s. Holds the [`Migrator`] used by [`Action::LoadBackup`].
#[derive(Debug, Clone, Default)]
pub struct Reducer {
    migrator: Migrator,
}

impl Reducer {
    pub fn new(migrator: Migrator) -> Self {
        Self { migrator }
    }

    pub fn migrator(&self) -> &Migrator {
        &self.migrator
    }

    /// Apply one action, returning the next state.
    pub fn reduce(&self, state: &CollectionsState, action: Action) -> CollectionsState {
        match action {
            Action::SetInitialData {
                collections,
                selected_collection_id,
            } => CollectionsState {
                collections,
                selected_collection_id,
                is_loaded: true,
            },

            Action::SetCollections(collections) => CollectionsState {
                collections,
                ..state.clone()
            },

            Action::SelectCollection(id) => CollectionsState {
                selected_collection_id: id,
                ..state.clone()
            },

            Action::AddCollection(collection) => {
                let mut next = state.clone();
                next.selected_collection_id = Some(collection.id.clone());
                next.collections.push(collection);
                next
            }

            Action::DeleteCollection(id) => {
                let mut next = state.clone();
                next.collections.retain(|c| c.id != id);
                if state.selected_collection_id.as_deref() == Some(id.as_str()) {
                    next.selected_collection_id = next.collections.first().map(|c| c.id.clone());
                }
                next
            }

            Action::ToggleCollected {
                collection_id,
                card_id,
            } => with_card(state, &collection_id, &card_id, |card| {
                card.collected = !card.collected;
            }),

            Action::ToggleVariantCollected {
                collection_id,
                card_id,
                variant_id,
            } => with_collection(state, &collection_id, |c| {
                if c.variant(&variant_id).is_none() {
                    log::debug!("Unknown variant '{}' in '{}'; toggle ignored", variant_id, c.id);
                    return;
                }
                for card in c.cards.iter_mut().filter(|card| card.id == card_id) {
                    let flag = card.variant_collected.entry(variant_id.clone()).or_insert(false);
                    *flag = !*flag;
                }
            }),

            Action::UpdateCardImage {
                collection_id,
                card_id,
                image_url,
            } => with_card(state, &collection_id, &card_id, |card| {
                card.custom_image_url = image_url.clone();
            }),

            Action::UpdateCardDetails {
                collection_id,
                card_id,
                details,
            } => with_card(state, &collection_id, &card_id, |card| {
                card.external_data = details.clone();
            }),

            Action::EnrichCard {
                collection_id,
                card_id,
                data,
            } => with_card(state, &collection_id, &card_id, |card| {
                card.external_data = data.external_data.clone();
                if let Some(rarity) = data.rarity.as_ref().filter(|r| !r.is_empty()) {
                    card.rarity = Some(rarity.clone());
                }
            }),

            Action::ResetCollection(collection_id) => with_collection(state, &collection_id, |c| {
                for card in c.cards.iter_mut() {
                    card.collected = false;
                    card.variant_collected.clear();
                }
            }),

            Action::UpdateStatusWithMapping {
                collection_id,
                rows,
                mapping,
            } => {
                let updates = import::index_rows(&rows, &mapping);
                if updates.is_empty() {
                    return state.clone();
                }
                with_collection(state, &collection_id, |c| {
                    let known_variants: HashSet<String> =
                        c.variant_ids().into_iter().map(str::to_string).collect();
                    for card in c.cards.iter_mut() {
                        if let Some(row) = updates.get(card.id.as_str()) {
                            import::apply_status_row(card, row, &mapping, &known_variants);
                        }
                    }
                })
            }

            Action::EditCollectionDetails {
                collection_id,
                name,
                description,
            } => with_collection(state, &collection_id, |c| {
                c.name = name.clone();
                c.description = description.clone();
            }),

            Action::UpdateRarities {
                collection_id,
                new_definitions,
                name_changes,
                deleted_names,
            } => {
                let renames: HashMap<&str, &str> = name_changes
                    .iter()
                    .map(|c| (c.old_name.as_str(), c.new_name.as_str()))
                    .collect();
                let deleted: HashSet<&str> = deleted_names.iter().map(String::as_str).collect();
                with_collection(state, &collection_id, |c| {
                    c.rarity_definitions = new_definitions.clone();
                    for card in c.cards.iter_mut() {
                        let renamed = card.rarity.as_deref().and_then(|r| renames.get(r));
                        if let Some(new_name) = renamed {
                            card.rarity = Some(new_name.to_string());
                        }
                    }
                    // Rename first, then drop deleted names.
                    for variant in c.features.variants.iter_mut() {
                        variant.applies_to = variant
                            .applies_to
                            .iter()
                            .map(|r| renames.get(r.as_str()).map(|n| n.to_string()).unwrap_or_else(|| r.clone()))
                            .filter(|r| !deleted.contains(r.as_str()))
                            .collect();
                    }
                })
            }

            Action::UpdateVariants {
                collection_id,
                new_variants,
            } => with_collection(state, &collection_id, |c| {
                let ids: HashSet<&str> = new_variants.iter().map(|v| v.id.as_str()).collect();
                for card in c.cards.iter_mut() {
                    card.variant_collected.retain(|id, _| ids.contains(id.as_str()));
                }
                c.features.variants = new_variants.clone();
            }),

            Action::UpdateBinderSlots {
                collection_id,
                slots,
            } => with_collection(state, &collection_id, |c| {
                c.features.binder_slots = slots.clone();
            }),

            Action::AddCard {
                collection_id,
                card,
            } => with_collection(state, &collection_id, |c| {
                c.cards.push(card.clone());
            }),

            Action::EditCard {
                collection_id,
                old_card_id,
                updated_card,
            } => with_collection(state, &collection_id, |c| {
                for card in c.cards.iter_mut().filter(|card| card.id == old_card_id) {
                    *card = updated_card.clone();
                }
                if updated_card.id != old_card_id {
                    for slot in c.features.binder_slots.iter_mut() {
                        if slot.as_deref() == Some(old_card_id.as_str()) {
                            *slot = Some(updated_card.id.clone());
                        }
                    }
                }
            }),

            Action::DeleteCard {
                collection_id,
                card_id,
            } => with_collection(state, &collection_id, |c| {
                c.cards.retain(|card| card.id != card_id);
                for slot in c.features.binder_slots.iter_mut() {
                    if slot.as_deref() == Some(card_id.as_str()) {
                        *slot = None;
                    }
                }
            }),

            Action::SetLanguageForAllCards {
                collection_id,
                language,
            } => with_collection(state, &collection_id, |c| {
                for card in c.cards.iter_mut() {
                    card.language = language.clone();
                }
            }),

            Action::LoadBackup(raw_collections) => {
                let collections = self.migrator.migrate_all(&raw_collections);
                log::info!(
                    "Loaded backup: {} of {} collections restored",
                    collections.len(),
                    raw_collections.len()
                );
                CollectionsState {
                    selected_collection_id: collections.first().map(|c| c.id.clone()),
                    collections,
                    is_loaded: state.is_loaded,
                }
            }

            Action::TogglePin(collection_id) => with_collection(state, &collection_id, |c| {
                c.is_pinned = !c.is_pinned;
            }),

            Action::ReorderCollections(collections) => CollectionsState {
                collections,
                ..state.clone()
            },
        }
    }
}

/// Apply one action with a default [`Reducer`].
pub fn reduce(state: &CollectionsState, action: Action) -> CollectionsState {
    Reducer::default().reduce(state, action)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Copy `state` and run `f` on every collection with the given id.
fn with_collection<F>(state: &CollectionsState, collection_id: &str, mut f: F) -> CollectionsState
where
    F: FnMut(&mut Collection),
{
    let mut next = state.clone();
    let mut matched = false;
    for collection in next.collections.iter_mut().filter(|c| c.id == collection_id) {
        f(collection);
        matched = true;
    }
    if !matched {
        log::debug!("No collection '{}'; action ignored", collection_id);
    }
    next
}

/// Copy `state` and run `f` on every matching card of the matching collection.
fn with_card<F>(state: &CollectionsState, collection_id: &str, card_id: &str, mut f: F) -> CollectionsState
where
    F: FnMut(&mut Card),
{
    with_collection(state, collection_id, |c| {
        for card in c.cards.iter_mut().filter(|card| card.id == card_id) {
            f(card);
        }
    })
}
