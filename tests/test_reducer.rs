//! Collection state reducer tests.

mod common;

use mycollector_core::import::StatusMapping;
use mycollector_core::models::{Card, RarityDefinition, Variant};
use mycollector_core::reducer::{reduce, Action, CollectionsState, Enrichment, NameChange};
use serde_json::{json, Map, Value};

fn sample_state() -> CollectionsState {
    common::state_with(vec![common::sample_collection(), common::other_collection()])
}

fn row(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("row must be an object"),
    }
}

fn slots(ids: &[Option<&str>]) -> Vec<Option<String>> {
    ids.iter().map(|id| id.map(str::to_string)).collect()
}

// ---------------------------------------------------------------------------
// Collection list
// ---------------------------------------------------------------------------

#[test]
fn set_initial_data_marks_state_loaded() {
    let state = reduce(
        &CollectionsState::default(),
        Action::SetInitialData {
            collections: vec![common::sample_collection()],
            selected_collection_id: Some("set-1".into()),
        },
    );
    assert!(state.is_loaded);
    assert_eq!(state.selected_collection().unwrap().id, "set-1");
}

#[test]
fn set_collections_keeps_selection() {
    let state = sample_state();
    let next = reduce(&state, Action::SetCollections(vec![common::other_collection()]));
    assert_eq!(next.collections.len(), 1);
    assert_eq!(next.selected_collection_id.as_deref(), Some("set-1"));
    assert!(next.is_loaded);
}

#[test]
fn add_collection_appends_and_selects() {
    let state = common::state_with(vec![common::sample_collection()]);
    let next = reduce(&state, Action::AddCollection(common::other_collection()));
    assert_eq!(next.collections.len(), 2);
    assert_eq!(next.collections[1].id, "set-2");
    assert_eq!(next.selected_collection_id.as_deref(), Some("set-2"));
}

#[test]
fn select_collection_changes_pointer_only() {
    let state = sample_state();
    let next = reduce(&state, Action::SelectCollection(Some("set-2".into())));
    assert_eq!(next.selected_collection_id.as_deref(), Some("set-2"));
    assert_eq!(next.collections, state.collections);

    let cleared = reduce(&next, Action::SelectCollection(None));
    assert!(cleared.selected_collection().is_none());
}

#[test]
fn deleting_selected_collection_selects_first_remaining() {
    let state = sample_state();
    let next = reduce(&state, Action::DeleteCollection("set-1".into()));
    assert_eq!(next.collections.len(), 1);
    assert_eq!(next.selected_collection_id.as_deref(), Some("set-2"));

    let empty = reduce(&next, Action::DeleteCollection("set-2".into()));
    assert!(empty.collections.is_empty());
    assert_eq!(empty.selected_collection_id, None);
}

#[test]
fn deleting_other_collection_keeps_selection() {
    let state = sample_state();
    let next = reduce(&state, Action::DeleteCollection("set-2".into()));
    assert_eq!(next.selected_collection_id.as_deref(), Some("set-1"));
}

#[test]
fn toggle_pin_and_reorder() {
    let state = sample_state();
    let pinned = reduce(&state, Action::TogglePin("set-2".into()));
    assert!(pinned.collection("set-2").unwrap().is_pinned);
    let unpinned = reduce(&pinned, Action::TogglePin("set-2".into()));
    assert!(!unpinned.collection("set-2").unwrap().is_pinned);

    let reordered = reduce(
        &pinned,
        Action::ReorderCollections(vec![pinned.collections[1].clone(), pinned.collections[0].clone()]),
    );
    let ids: Vec<&str> = reordered.collections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["set-2", "set-1"]);
}

#[test]
fn edit_collection_details_replaces_name_and_description_only() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::EditCollectionDetails {
            collection_id: "set-1".into(),
            name: "Base Set".into(),
            description: "1999".into(),
        },
    );
    let c = next.collection("set-1").unwrap();
    assert_eq!(c.name, "Base Set");
    assert_eq!(c.description, "1999");
    assert_eq!(c.cards, state.collection("set-1").unwrap().cards);
}

// ---------------------------------------------------------------------------
// Card edits
// ---------------------------------------------------------------------------

#[test]
fn toggle_collected_flips_one_card() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::ToggleCollected {
            collection_id: "set-1".into(),
            card_id: "002".into(),
        },
    );
    assert!(common::card(&next, "set-1", "002").collected);
    assert!(!common::card(&state, "set-1", "002").collected);
    assert!(common::card(&next, "set-1", "001").collected);
}

#[test]
fn toggle_variant_collected_creates_then_flips_flag() {
    let state = sample_state();
    let action = Action::ToggleVariantCollected {
        collection_id: "set-1".into(),
        card_id: "002".into(),
        variant_id: "holo-v1".into(),
    };
    let once = reduce(&state, action.clone());
    assert!(common::card(&once, "set-1", "002").is_variant_collected("holo-v1"));
    let twice = reduce(&once, action);
    assert_eq!(
        common::card(&twice, "set-1", "002").variant_collected.get("holo-v1"),
        Some(&false)
    );
}

#[test]
fn toggle_of_undefined_variant_is_ignored() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::ToggleVariantCollected {
            collection_id: "set-1".into(),
            card_id: "002".into(),
            variant_id: "gold".into(),
        },
    );
    assert_eq!(next, state);
}

#[test]
fn card_image_and_details() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::UpdateCardImage {
            collection_id: "set-1".into(),
            card_id: "001".into(),
            image_url: Some("https://img.example/pika.png".into()),
        },
    );
    let next = reduce(
        &next,
        Action::UpdateCardDetails {
            collection_id: "set-1".into(),
            card_id: "001".into(),
            details: Some(json!({ "hp": 60 })),
        },
    );
    let card = common::card(&next, "set-1", "001");
    assert_eq!(card.custom_image_url.as_deref(), Some("https://img.example/pika.png"));
    assert_eq!(card.external_data, Some(json!({ "hp": 60 })));
    assert_eq!(card.rarity.as_deref(), Some("Common"));
}

#[test]
fn enrichment_overwrites_rarity_only_when_present() {
    let state = sample_state();
    let enrich = |rarity: Option<&str>| Action::EnrichCard {
        collection_id: "set-1".into(),
        card_id: "004".into(),
        data: Enrichment {
            external_data: Some(json!({ "set": "base" })),
            rarity: rarity.map(str::to_string),
        },
    };

    let blank = reduce(&state, enrich(Some("")));
    assert_eq!(common::card(&blank, "set-1", "004").rarity.as_deref(), Some("Common"));
    let none = reduce(&state, enrich(None));
    assert_eq!(common::card(&none, "set-1", "004").rarity.as_deref(), Some("Common"));

    let rare = reduce(&state, enrich(Some("Rare")));
    let card = common::card(&rare, "set-1", "004");
    assert_eq!(card.rarity.as_deref(), Some("Rare"));
    assert_eq!(card.external_data, Some(json!({ "set": "base" })));
}

#[test]
fn reset_collection_clears_flags_but_not_slots() {
    let mut state = sample_state();
    state.collections[0].cards[1].variant_collected.insert("holo-v1".into(), true);
    state.collections[0].features.binder_slots = slots(&[Some("001"), None]);

    let next = reduce(&state, Action::ResetCollection("set-1".into()));
    let c = next.collection("set-1").unwrap();
    assert!(c.cards.iter().all(|card| !card.collected && card.variant_collected.is_empty()));
    assert_eq!(c.features.binder_slots, slots(&[Some("001"), None]));
    assert_eq!(c.rarity_definitions, state.collections[0].rarity_definitions);
    assert!(next.collection("set-2").is_some());
}

#[test]
fn add_card_does_not_place_it() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::AddCard {
            collection_id: "set-1".into(),
            card: Card::new("006", "Mewtwo").with_rarity("Rare"),
        },
    );
    let c = next.collection("set-1").unwrap();
    assert_eq!(c.cards.len(), 6);
    assert_eq!(c.cards[5].id, "006");
    assert!(c.features.binder_slots.is_empty());
}

#[test]
fn edit_card_replaces_card_and_follows_rename_into_slots() {
    let mut state = sample_state();
    state.collections[0].features.binder_slots = slots(&[Some("003"), None, Some("001")]);

    let next = reduce(
        &state,
        Action::EditCard {
            collection_id: "set-1".into(),
            old_card_id: "003".into(),
            updated_card: Card::new("003a", "Zapdos EX").with_rarity("Secret Rare"),
        },
    );
    let c = next.collection("set-1").unwrap();
    assert!(c.card("003").is_none());
    let edited = c.card("003a").unwrap();
    assert_eq!(edited.name, "Zapdos EX");
    assert!(!edited.collected, "edit is a full replace");
    assert_eq!(c.features.binder_slots, slots(&[Some("003a"), None, Some("001")]));
}

#[test]
fn delete_card_preserves_slot_shape() {
    let mut state = sample_state();
    state.collections[0].features.binder_slots =
        slots(&[Some("001"), Some("002"), Some("003"), None, Some("005")]);

    let next = reduce(
        &state,
        Action::DeleteCard {
            collection_id: "set-1".into(),
            card_id: "003".into(),
        },
    );
    let c = next.collection("set-1").unwrap();
    assert_eq!(c.cards.len(), 4);
    assert_eq!(c.features.binder_slots.len(), 5);
    assert_eq!(c.features.binder_slots[2], None);
    assert_eq!(c.features.binder_slots[4].as_deref(), Some("005"));
}

#[test]
fn set_language_for_all_cards() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::SetLanguageForAllCards {
            collection_id: "set-1".into(),
            language: "de".into(),
        },
    );
    assert!(next.collection("set-1").unwrap().cards.iter().all(|c| c.language == "de"));
    assert!(next.collection("set-2").unwrap().cards.iter().all(|c| c.language == "en"));
}

#[test]
fn update_binder_slots_stores_slots_verbatim() {
    let state = sample_state();
    let stored = slots(&[Some("ghost"), Some("001"), Some("001")]);
    let next = reduce(
        &state,
        Action::UpdateBinderSlots {
            collection_id: "set-1".into(),
            slots: stored.clone(),
        },
    );
    assert_eq!(next.collection("set-1").unwrap().features.binder_slots, stored);
}

// ---------------------------------------------------------------------------
// Rarities and variants
// ---------------------------------------------------------------------------

fn renamed_rarities() -> Vec<RarityDefinition> {
    vec![
        RarityDefinition::new("Common"),
        RarityDefinition::new("Ultra Rare"),
        RarityDefinition::new("Secret Rare"),
    ]
}

#[test]
fn rarity_rename_propagates_to_cards_and_variants() {
    let mut state = sample_state();
    state.collections[0].cards[0].rarity = Some("Rare".into());

    let next = reduce(
        &state,
        Action::UpdateRarities {
            collection_id: "set-1".into(),
            new_definitions: renamed_rarities(),
            name_changes: vec![NameChange::new("Rare", "Ultra Rare")],
            deleted_names: vec![],
        },
    );
    let c = next.collection("set-1").unwrap();
    let ultra: Vec<&str> = c
        .cards
        .iter()
        .filter(|card| card.rarity.as_deref() == Some("Ultra Rare"))
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(ultra, ["001", "002", "003"]);
    assert!(c.cards.iter().all(|card| card.rarity.as_deref() != Some("Rare")));
    assert_eq!(c.features.variants[0].applies_to, ["Ultra Rare"]);
    assert_eq!(c.rarity_definitions, renamed_rarities());
}

#[test]
fn rarity_deletion_does_not_cascade_to_cards() {
    let mut state = sample_state();
    state.collections[0].features.variants = vec![Variant::new("holo-v1", "Holo", &["Rare", "Secret Rare"])];

    let next = reduce(
        &state,
        Action::UpdateRarities {
            collection_id: "set-1".into(),
            new_definitions: vec![RarityDefinition::new("Common"), RarityDefinition::new("Rare")],
            name_changes: vec![],
            deleted_names: vec!["Secret Rare".into()],
        },
    );
    let c = next.collection("set-1").unwrap();
    assert_eq!(c.cards.len(), 5);
    assert_eq!(c.card("005").unwrap().rarity.as_deref(), Some("Secret Rare"));
    assert_eq!(c.features.variants[0].applies_to, ["Rare"]);
}

#[test]
fn rename_is_applied_before_delete_filter() {
    let state = sample_state();

    // Deleting by the old name does not remove the renamed entry.
    let by_old = reduce(
        &state,
        Action::UpdateRarities {
            collection_id: "set-1".into(),
            new_definitions: renamed_rarities(),
            name_changes: vec![NameChange::new("Rare", "Ultra Rare")],
            deleted_names: vec!["Rare".into()],
        },
    );
    assert_eq!(by_old.collection("set-1").unwrap().features.variants[0].applies_to, ["Ultra Rare"]);

    // Deleting by the new name removes it.
    let by_new = reduce(
        &state,
        Action::UpdateRarities {
            collection_id: "set-1".into(),
            new_definitions: renamed_rarities(),
            name_changes: vec![NameChange::new("Rare", "Ultra Rare")],
            deleted_names: vec!["Ultra Rare".into()],
        },
    );
    let c = by_new.collection("set-1").unwrap();
    assert!(c.features.variants[0].applies_to.is_empty());
    assert_eq!(c.card("002").unwrap().rarity.as_deref(), Some("Ultra Rare"));
}

#[test]
fn variant_update_prunes_stale_flags() {
    let mut state = sample_state();
    state.collections[0].features.variants = vec![
        Variant::new("v1", "Holo", &["Rare"]),
        Variant::new("v2", "Reverse", &["Rare"]),
    ];
    let card = &mut state.collections[0].cards[1];
    card.variant_collected.insert("v1".into(), true);
    card.variant_collected.insert("v2".into(), false);

    let next = reduce(
        &state,
        Action::UpdateVariants {
            collection_id: "set-1".into(),
            new_variants: vec![Variant::new("v1", "Holo", &["Rare"])],
        },
    );
    let card = common::card(&next, "set-1", "002");
    assert_eq!(card.variant_collected.len(), 1);
    assert_eq!(card.variant_collected.get("v1"), Some(&true));
    assert_eq!(next.collection("set-1").unwrap().features.variants.len(), 1);
}

// ---------------------------------------------------------------------------
// Bulk status import
// ---------------------------------------------------------------------------

#[test]
fn bulk_status_is_a_partial_merge() {
    let mut state = sample_state();
    state.collections[0].features.variants = vec![
        Variant::new("v1", "Holo", &["Rare"]),
        Variant::new("v2", "Reverse", &["Rare"]),
    ];
    state.collections[0].cards[1].variant_collected.insert("v1".into(), true);

    let next = reduce(
        &state,
        Action::UpdateStatusWithMapping {
            collection_id: "set-1".into(),
            rows: vec![row(json!({ "Card #": " 002 ", "Reverse?": "X" }))],
            mapping: StatusMapping::new("Card #").with_variant("v2", "Reverse?"),
        },
    );
    let card = common::card(&next, "set-1", "002");
    assert_eq!(card.variant_collected.get("v1"), Some(&true));
    assert_eq!(card.variant_collected.get("v2"), Some(&true));
    assert!(!card.collected, "collected column was not mapped");
}

#[test]
fn bulk_status_parses_collected_column() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::UpdateStatusWithMapping {
            collection_id: "set-1".into(),
            rows: vec![
                row(json!({ "ID": "001", "Owned": "no" })),
                row(json!({ "ID": "002", "Owned": "Yes" })),
                row(json!({ "ID": "004", "Owned": 1 })),
                row(json!({ "ID": "005" })),
                row(json!({ "ID": "999", "Owned": "true" })),
            ],
            mapping: StatusMapping::new("ID").with_collected("Owned"),
        },
    );
    assert!(!common::card(&next, "set-1", "001").collected);
    assert!(common::card(&next, "set-1", "002").collected);
    assert!(common::card(&next, "set-1", "003").collected, "no row, untouched");
    assert!(common::card(&next, "set-1", "004").collected);
    assert!(!common::card(&next, "set-1", "005").collected, "column absent, untouched");
}

#[test]
fn bulk_status_matches_numeric_ids() {
    let mut state = sample_state();
    state.collections[0].cards[0].id = "7".into();
    let next = reduce(
        &state,
        Action::UpdateStatusWithMapping {
            collection_id: "set-1".into(),
            rows: vec![row(json!({ "ID": 7, "Owned": true }))],
            mapping: StatusMapping::new("ID").with_collected("Owned"),
        },
    );
    assert!(common::card(&next, "set-1", "7").collected);
}

#[test]
fn bulk_status_without_matches_is_a_no_op() {
    let state = sample_state();
    let unmapped = reduce(
        &state,
        Action::UpdateStatusWithMapping {
            collection_id: "set-1".into(),
            rows: vec![row(json!({ "ID": "001", "Owned": "no" }))],
            mapping: StatusMapping::default(),
        },
    );
    assert_eq!(unmapped, state);

    let blank_ids = reduce(
        &state,
        Action::UpdateStatusWithMapping {
            collection_id: "set-1".into(),
            rows: vec![row(json!({ "ID": "  ", "Owned": "no" })), row(json!({ "Owned": "no" }))],
            mapping: StatusMapping::new("ID").with_collected("Owned"),
        },
    );
    assert_eq!(blank_ids, state);
}

#[test]
fn bulk_status_ignores_undefined_variants() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::UpdateStatusWithMapping {
            collection_id: "set-1".into(),
            rows: vec![row(json!({ "ID": "002", "Gold": "x", "Holo": "x" }))],
            mapping: StatusMapping::new("ID")
                .with_variant("gold-v1", "Gold")
                .with_variant("holo-v1", "Holo"),
        },
    );
    let card = common::card(&next, "set-1", "002");
    assert!(card.is_variant_collected("holo-v1"));
    assert!(!card.variant_collected.contains_key("gold-v1"));
}

// ---------------------------------------------------------------------------
// Backup restore
// ---------------------------------------------------------------------------

#[test]
fn load_backup_migrates_and_replaces_everything() {
    let state = sample_state();
    let next = reduce(
        &state,
        Action::LoadBackup(vec![common::legacy_document(), Value::Null, common::pikachu_document()]),
    );
    let ids: Vec<&str> = next.collections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["old-set", "set-1"]);
    assert_eq!(next.selected_collection_id.as_deref(), Some("old-set"));
    assert_eq!(next.collection("set-1").unwrap().cards.len(), 1);
    assert!(next.is_loaded);
}

#[test]
fn empty_backup_clears_selection() {
    let next = reduce(&sample_state(), Action::LoadBackup(vec![]));
    assert!(next.collections.is_empty());
    assert_eq!(next.selected_collection_id, None);
}

// ---------------------------------------------------------------------------
// Missing targets
// ---------------------------------------------------------------------------

#[test]
fn actions_on_unknown_targets_are_no_ops() {
    let state = sample_state();
    let actions = vec![
        Action::ToggleCollected {
            collection_id: "nope".into(),
            card_id: "001".into(),
        },
        Action::ToggleCollected {
            collection_id: "set-1".into(),
            card_id: "nope".into(),
        },
        Action::DeleteCard {
            collection_id: "set-1".into(),
            card_id: "nope".into(),
        },
        Action::TogglePin("nope".into()),
        Action::ResetCollection("nope".into()),
        Action::DeleteCollection("nope".into()),
        Action::EditCard {
            collection_id: "set-1".into(),
            old_card_id: "nope".into(),
            updated_card: Card::new("x", "X"),
        },
    ];
    for action in actions {
        assert_eq!(reduce(&state, action.clone()), state, "{action:?}");
    }
}

#[test]
fn prior_state_is_left_untouched() {
    let state = sample_state();
    let snapshot = state.clone();
    let _ = reduce(
        &state,
        Action::DeleteCard {
            collection_id: "set-1".into(),
            card_id: "001".into(),
        },
    );
    let _ = reduce(&state, Action::ResetCollection("set-1".into()));
    assert_eq!(state, snapshot);
}
