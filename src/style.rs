//! Deterministic style assignment for rarity names.
//!
//! Names without an explicit style are mapped onto a fixed eight-entry
//! palette by a 31-multiplier string hash over UTF-16 code units, wrapped to a
//! signed 32-bit integer. The hash must stay bit-for-bit stable: previously
//! persisted collections were styled with it.

use crate::config;
use crate::models::RarityStyle;

/// Palette slot reserved for `"rare"`.
const RARE_INDEX: usize = 0;
/// Palette slot reserved for `"uncommon"`.
const UNCOMMON_INDEX: usize = 1;

/// Resolve the style for a rarity name.
///
/// Empty and `common` (any case) get the neutral style; `uncommon` and `rare`
/// get fixed palette entries; everything else is hashed.
pub fn resolve_style(rarity_name: &str) -> RarityStyle {
    let lower = rarity_name.to_lowercase();
    if rarity_name.is_empty() || lower == "common" {
        return config::neutral_style();
    }
    let palette = config::style_palette();
    let index = match lower.as_str() {
        "uncommon" => UNCOMMON_INDEX,
        "rare" => RARE_INDEX,
        _ => palette_index(rarity_name, palette.len()),
    };
    palette[index].clone()
}

/// `hash = hash * 31 + code_unit`, wrapping at 32 bits.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Palette slot for a name: `|hash| mod len`.
///
/// The absolute value is taken in 64 bits so `i32::MIN` does not overflow.
pub fn palette_index(name: &str, palette_len: usize) -> usize {
    let hash = i64::from(name_hash(name)).abs();
    (hash % palette_len as i64) as usize
}
