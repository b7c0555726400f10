//! Completion tracking per set mode.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Collection, RarityCategory};

/// Which items count towards completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetMode {
    /// Cards whose rarity is in the `Standard` category.
    #[default]
    Standard,
    /// Every card.
    Complete,
    /// Every card plus every variant applicable to it.
    Master,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Progress {
    pub collected: usize,
    pub total: usize,
    /// 0 to 100; 0 when there is nothing to collect.
    pub percentage: f64,
}

impl Progress {
    fn new(collected: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            collected as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            collected,
            total,
            percentage,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.collected == self.total
    }
}

/// An uncollected card, or an uncollected variant of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingItem {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// The card's rarity, `N/A` when it has none.
    #[serde(rename = "Rarity")]
    pub rarity: String,
    /// `Standard` for the card itself, otherwise the variant name.
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Description")]
    pub description: String,
}

fn standard_rarities(collection: &Collection) -> HashSet<&str> {
    collection
        .rarity_definitions
        .iter()
        .filter(|r| r.category == RarityCategory::Standard)
        .map(|r| r.name.as_str())
        .collect()
}

pub fn progress(collection: &Collection, mode: SetMode) -> Progress {
    let cards = &collection.cards;
    match mode {
        SetMode::Standard => {
            let standard = standard_rarities(collection);
            let counted = cards
                .iter()
                .filter(|c| c.rarity.as_deref().is_some_and(|r| standard.contains(r)));
            let (collected, total) = counted.fold((0, 0), |(collected, total), c| {
                (collected + usize::from(c.collected), total + 1)
            });
            Progress::new(collected, total)
        }
        SetMode::Complete => Progress::new(cards.iter().filter(|c| c.collected).count(), cards.len()),
        SetMode::Master => {
            let variants = &collection.features.variants;
            let mut collected = cards.iter().filter(|c| c.collected).count();
            let mut total = cards.len();
            for card in cards {
                for variant in card.applicable_variants(variants) {
                    total += 1;
                    if card.is_variant_collected(&variant.id) {
                        collected += 1;
                    }
                }
            }
            Progress::new(collected, total)
        }
    }
}

/// Everything still to collect under `mode`, in card order.
pub fn missing_items(collection: &Collection, mode: SetMode) -> Vec<MissingItem> {
    let standard = standard_rarities(collection);
    let mut missing = Vec::new();
    for card in &collection.cards {
        let item = |kind: &str| MissingItem {
            id: card.id.clone(),
            name: card.name.clone(),
            rarity: card.rarity.clone().filter(|r| !r.is_empty()).unwrap_or_else(|| "N/A".into()),
            kind: kind.to_string(),
            description: card.description.clone(),
        };
        let counted = match mode {
            SetMode::Standard => card.rarity.as_deref().is_some_and(|r| standard.contains(r)),
            SetMode::Complete | SetMode::Master => true,
        };
        if counted && !card.collected {
            missing.push(item("Standard"));
        }
        if mode == SetMode::Master {
            for variant in card.applicable_variants(&collection.features.variants) {
                if !card.is_variant_collected(&variant.id) {
                    missing.push(item(&variant.name));
                }
            }
        }
    }
    missing
}
