use serde::{Deserialize, Serialize};

use super::lenient;

/// A collectible finish tracked independently of a card's base status.
///
/// Only cards whose rarity is listed in `applies_to` can carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub applies_to: Vec<String>,
}

impl Variant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, applies_to: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            applies_to: applies_to.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Id given to a variant converted from the single-variant format:
    /// the lowercased name with whitespace runs collapsed to `-`, plus `-v1`.
    pub fn legacy_id(name: &str) -> String {
        let mut slug = String::with_capacity(name.len() + 3);
        let mut in_space = false;
        for c in name.to_lowercase().chars() {
            if c.is_whitespace() {
                if !in_space {
                    slug.push('-');
                }
                in_space = true;
            } else {
                slug.push(c);
                in_space = false;
            }
        }
        slug.push_str("-v1");
        slug
    }

    pub fn applies_to_rarity(&self, rarity: Option<&str>) -> bool {
        match rarity {
            Some(r) => self.applies_to.iter().any(|a| a == r),
            None => false,
        }
    }
}
