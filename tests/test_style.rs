//! Rarity style resolution.

use mycollector_core::config;
use mycollector_core::models::{RarityCategory, RarityDefinition};
use mycollector_core::style::{name_hash, palette_index, resolve_style};

// ---------------------------------------------------------------------------
// Fixed tiers
// ---------------------------------------------------------------------------

#[test]
fn empty_and_common_are_neutral() {
    assert_eq!(resolve_style(""), config::neutral_style());
    assert_eq!(resolve_style("Common"), config::neutral_style());
    assert_eq!(resolve_style("COMMON"), config::neutral_style());
}

#[test]
fn uncommon_and_rare_use_reserved_slots() {
    let palette = config::style_palette();
    assert_eq!(resolve_style("Uncommon"), palette[1]);
    assert_eq!(resolve_style("rare"), palette[0]);
    assert_eq!(resolve_style("RARE"), palette[0]);
}

// ---------------------------------------------------------------------------
// Hash
// ---------------------------------------------------------------------------

#[test]
fn hash_matches_reference_values() {
    assert_eq!(name_hash(""), 0);
    assert_eq!(name_hash("a"), 97);
    assert_eq!(name_hash("Holo"), 2_255_082);
    assert_eq!(name_hash("Secret Rare"), -426_919_918);
    assert_eq!(name_hash("Mythic"), -1_975_217_574);
}

#[test]
fn hash_walks_utf16_code_units() {
    // U+1F409 is the surrogate pair D83D DC09.
    assert_eq!(name_hash("\u{1F409}"), 0xD83D * 31 + 0xDC09);
    assert_eq!(palette_index("\u{1F409}", 8), 4);
}

#[test]
fn hashed_names_pick_stable_palette_entries() {
    let palette = config::style_palette();
    assert_eq!(palette_index("Secret Rare", palette.len()), 6);
    assert_eq!(palette_index("Legendary", palette.len()), 5);
    assert_eq!(palette_index("Ultra Rare", palette.len()), 2);
    assert_eq!(resolve_style("Secret Rare"), palette[6]);
    assert_eq!(resolve_style("Secret Rare"), resolve_style("Secret Rare"));
}

#[test]
fn hashing_is_case_sensitive() {
    assert_ne!(name_hash("Legendary"), name_hash("legendary"));
}

#[test]
fn palette_index_handles_i32_min() {
    // Absolute value is taken in 64 bits, so no overflow panic.
    assert!(palette_index("polygenelubricants", 8) < 8);
    assert_eq!(name_hash("polygenelubricants"), i32::MIN);
    assert_eq!(palette_index("polygenelubricants", 8), 0);
}

// ---------------------------------------------------------------------------
// RarityDefinition
// ---------------------------------------------------------------------------

#[test]
fn new_definition_is_standard_with_resolved_style() {
    let def = RarityDefinition::new("Secret Rare");
    assert_eq!(def.category, RarityCategory::Standard);
    assert_eq!(def.style, Some(resolve_style("Secret Rare")));
}

#[test]
fn missing_style_falls_back() {
    let mut def = RarityDefinition::new("Promo");
    def.style = None;
    assert_eq!(def.style_or_fallback(), config::fallback_style());
}
