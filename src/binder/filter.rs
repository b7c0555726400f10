use serde::{Deserialize, Serialize};

use super::sort::{sort_cards, SortDirection, SortKey};
use crate::models::{Card, Collection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectedFilter {
    #[default]
    All,
    Collected,
    Uncollected,
}

/// List-view filter over a collection's cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFilter {
    /// Case-insensitive substring of name, description or id.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub collected: CollectedFilter,
    #[serde(default)]
    pub rarity: Option<String>,
}

impl CardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn collected(mut self, filter: CollectedFilter) -> Self {
        self.collected = filter;
        self
    }

    pub fn rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    pub fn matches(&self, card: &Card) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = term.is_empty()
            || card.name.to_lowercase().contains(&term)
            || card.description.to_lowercase().contains(&term)
            || card.id.to_lowercase().contains(&term);
        let matches_collected = match self.collected {
            CollectedFilter::All => true,
            CollectedFilter::Collected => card.collected,
            CollectedFilter::Uncollected => !card.collected,
        };
        let matches_rarity = match self.rarity.as_deref().filter(|r| !r.is_empty()) {
            Some(rarity) => card.rarity.as_deref() == Some(rarity),
            None => true,
        };
        matches_search && matches_collected && matches_rarity
    }
}

/// The cards of `collection` passing `filter`, sorted by `key`.
pub fn filter_cards<'c>(
    collection: &'c Collection,
    filter: &CardFilter,
    key: &SortKey,
    direction: SortDirection,
) -> Vec<&'c Card> {
    let mut cards: Vec<&Card> = collection.cards.iter().filter(|c| filter.matches(c)).collect();
    sort_cards(&mut cards, collection, key, direction);
    cards
}
