//! Spreadsheet-derived inputs.
//!
//! Parsing workbooks and guessing columns happens elsewhere; this module takes
//! already-parsed rows (header -> cell) and turns them into status updates or
//! into a brand-new custom collection.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CollectorError, Result};
use crate::migrate::Migrator;
use crate::models::lenient::{is_truthy, scalar_text};
use crate::models::{Card, Collection, CustomFieldDefinition};

/// One parsed spreadsheet row, keyed by column header.
pub type Row = Map<String, Value>;

// ---------------------------------------------------------------------------
// StatusMapping
// ---------------------------------------------------------------------------

/// Which spreadsheet columns feed a bulk status update.
///
/// `variants` maps a variant id to the header holding its flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMapping {
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub collected: Option<String>,
    #[serde(default)]
    pub variants: BTreeMap<String, String>,
}

impl StatusMapping {
    pub fn new(card_id_header: impl Into<String>) -> Self {
        Self {
            card_id: Some(card_id_header.into()),
            ..Self::default()
        }
    }

    pub fn with_collected(mut self, header: impl Into<String>) -> Self {
        self.collected = Some(header.into());
        self
    }

    pub fn with_variant(mut self, variant_id: impl Into<String>, header: impl Into<String>) -> Self {
        self.variants.insert(variant_id.into(), header.into());
        self
    }
}

/// Permissive spreadsheet boolean.
///
/// Strings are trimmed and compared case-insensitively against `true`, `x`,
/// `yes` and `1`. Besides strings only `true` and the number `1` count.
pub fn parse_bool(value: &Value) -> bool {
    match value {
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "x" | "yes" | "1"),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// The trimmed card id held by `row` under `header`, if any.
pub fn row_card_id(row: &Row, header: &str) -> Option<String> {
    let value = row.get(header).filter(|v| is_truthy(v))?;
    let id = scalar_text(value)?.trim().to_string();
    (!id.is_empty()).then_some(id)
}

/// Index rows by their mapped card id. Later rows win on duplicate ids.
pub fn index_rows<'r>(rows: &'r [Row], mapping: &StatusMapping) -> HashMap<String, &'r Row> {
    let Some(header) = mapping.card_id.as_deref().filter(|h| !h.is_empty()) else {
        return HashMap::new();
    };
    rows.iter()
        .filter_map(|row| row_card_id(row, header).map(|id| (id, row)))
        .collect()
}

/// Merge one row into a card.
///
/// Only columns present in the row are applied. Variant flags are written
/// for ids in `known_variants` only, other entries are left as they were.
pub(crate) fn apply_status_row(card: &mut Card, row: &Row, mapping: &StatusMapping, known_variants: &HashSet<String>) {
    if let Some(value) = mapping
        .collected
        .as_deref()
        .filter(|h| !h.is_empty())
        .and_then(|h| row.get(h))
    {
        card.collected = parse_bool(value);
    }
    for (variant_id, header) in &mapping.variants {
        if header.is_empty() || !known_variants.contains(variant_id) {
            continue;
        }
        if let Some(value) = row.get(header) {
            card.variant_collected.insert(variant_id.clone(), parse_bool(value));
        }
    }
}

// ---------------------------------------------------------------------------
// New custom collections
// ---------------------------------------------------------------------------

/// Lowercase `title`, turn each run of characters outside `[a-z0-9]` into a
/// single `-`, and strip leading and trailing dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Build a user-authored collection from imported cards.
///
/// The id is the slugified title suffixed with the current unix time in
/// milliseconds. The result goes through `migrator` like any other input.
pub fn new_custom_collection(
    migrator: &Migrator,
    title: &str,
    cards: Vec<Card>,
    custom_field_definitions: Vec<CustomFieldDefinition>,
    description: &str,
) -> Result<Collection> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CollectorError::InvalidArgument(
            "collection title must not be empty".into(),
        ));
    }
    let raw = json!({
        "id": format!("{}-{}", slugify(title), unix_millis()),
        "name": title,
        "description": description,
        "cards": cards,
        "isCustom": true,
        "features": {
            "variants": [],
            "customFields": custom_field_definitions,
        },
    });
    migrator
        .migrate(&raw)?
        .ok_or_else(|| CollectorError::InvalidArgument("collection document was empty".into()))
}
