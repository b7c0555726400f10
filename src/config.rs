use std::collections::HashSet;
use std::path::PathBuf;

use crate::models::RarityStyle;

/// Language assigned to cards that carry none.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Pocket counts offered for binder pages.
pub const POCKETS_PER_PAGE_SMALL: usize = 9;
pub const POCKETS_PER_PAGE_LARGE: usize = 12;

/// Placement never grows a binder past this many pockets.
pub const MAX_BINDER_POCKETS: usize = 10_000;

/// File extensions used by the JSON file store.
pub const STORE_FILE_EXTENSION: &str = "json";
pub const STORE_FILE_EXTENSION_GZ: &str = "json.gz";

/// Name of the DuckDB table holding one document per user.
pub const DUCKDB_TABLE: &str = "user_collections";

/// Ids of collections that ship with the catalog.
///
/// Legacy documents without an `isCustom` flag are treated as user-authored
/// unless their id is in this set.
pub fn default_catalog_ids() -> HashSet<String> {
    HashSet::from(["pixel-pals-v1".to_string(), "cosmic-creatures-v1".to_string()])
}

/// Neutral style used for empty or `common` rarities.
pub fn neutral_style() -> RarityStyle {
    RarityStyle::new(
        "bg-slate-200 dark:bg-slate-600",
        "text-slate-800 dark:text-slate-100",
        "ring-slate-500",
    )
}

/// Style shown for a rarity definition that has no style at all.
pub fn fallback_style() -> RarityStyle {
    RarityStyle::new(
        "bg-gray-200 dark:bg-gray-600",
        "text-gray-800 dark:text-gray-100",
        "ring-gray-500",
    )
}

/// The eight-entry palette hashed rarity names are mapped onto.
pub fn style_palette() -> [RarityStyle; 8] {
    [
        RarityStyle::new("bg-sky-200 dark:bg-sky-800", "text-sky-800 dark:text-sky-100", "ring-sky-500"),
        RarityStyle::new(
            "bg-emerald-200 dark:bg-emerald-800",
            "text-emerald-800 dark:text-emerald-100",
            "ring-emerald-500",
        ),
        RarityStyle::new("bg-amber-200 dark:bg-amber-800", "text-amber-800 dark:text-amber-100", "ring-amber-500"),
        RarityStyle::new(
            "bg-indigo-200 dark:bg-indigo-800",
            "text-indigo-800 dark:text-indigo-100",
            "ring-indigo-500",
        ),
        RarityStyle::new("bg-rose-200 dark:bg-rose-800", "text-rose-800 dark:text-rose-100", "ring-rose-500"),
        RarityStyle::new("bg-pink-200 dark:bg-pink-800", "text-pink-800 dark:text-pink-100", "ring-pink-500"),
        RarityStyle::new("bg-teal-200 dark:bg-teal-800", "text-teal-800 dark:text-teal-100", "ring-teal-500"),
        RarityStyle::new(
            "bg-purple-200 dark:bg-purple-800",
            "text-purple-800 dark:text-purple-100",
            "ring-purple-500",
        ),
    ]
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("mycollector")
    } else {
        PathBuf::from(".mycollector-data")
    }
}
