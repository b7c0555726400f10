//! Binder layout: a paginated grid of pockets over a collection's cards.
//!
//! In [`BinderMode::Standard`] the grid shows every card sorted by a key and
//! ignores `binder_slots`. In [`BinderMode::Custom`] it shows exactly the
//! stored slots, repaired on read so unknown or duplicated ids show as empty
//! pockets.

mod filter;
pub mod placement;
mod sort;

pub use filter::{filter_cards, CardFilter, CollectedFilter};
pub use placement::{
    clear_all, move_card, place_into_empty, remove_card, remove_from_slot, repair_slots, unplaced_cards,
    PlacementRejection, Slots,
};
pub use sort::{leading_number, natural_cmp, sort_cards, text_cmp, SortDirection, SortKey};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::{Card, Collection};

// ---------------------------------------------------------------------------
// BinderLayout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinderMode {
    Standard { key: SortKey, direction: SortDirection },
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinderLayout {
    pub pockets_per_page: usize,
    pub mode: BinderMode,
}

impl Default for BinderLayout {
    fn default() -> Self {
        Self::standard(config::POCKETS_PER_PAGE_SMALL, SortKey::Id, SortDirection::Asc)
    }
}

impl BinderLayout {
    pub fn standard(pockets_per_page: usize, key: SortKey, direction: SortDirection) -> Self {
        Self {
            pockets_per_page,
            mode: BinderMode::Standard { key, direction },
        }
    }

    pub fn custom(pockets_per_page: usize) -> Self {
        Self {
            pockets_per_page,
            mode: BinderMode::Custom,
        }
    }

    fn page_size(&self) -> usize {
        self.pockets_per_page.max(1)
    }
}

// ---------------------------------------------------------------------------
// BinderView
// ---------------------------------------------------------------------------

/// One page of pockets.
#[derive(Debug, Clone, PartialEq)]
pub struct BinderPage<'a> {
    /// 1-based page number actually shown.
    pub number: usize,
    pub total_pages: usize,
    pub pockets: Vec<Option<&'a Card>>,
}

/// Read-only binder over a borrowed collection.
pub struct BinderView<'a> {
    collection: &'a Collection,
    layout: BinderLayout,
}

impl<'a> BinderView<'a> {
    pub fn new(collection: &'a Collection, layout: BinderLayout) -> Self {
        Self { collection, layout }
    }

    pub fn layout(&self) -> &BinderLayout {
        &self.layout
    }

    /// Every pocket across all pages, in order.
    pub fn pockets(&self) -> Vec<Option<&'a Card>> {
        let collection = self.collection;
        match &self.layout.mode {
            BinderMode::Standard { key, direction } => {
                let mut cards: Vec<&Card> = collection.cards.iter().collect();
                sort_cards(&mut cards, collection, key, *direction);
                cards.into_iter().map(Some).collect()
            }
            BinderMode::Custom => repair_slots(&collection.features.binder_slots, &collection.cards)
                .iter()
                .map(|slot| slot.as_deref().and_then(|id| collection.card(id)))
                .collect(),
        }
    }

    pub fn total_pages(&self) -> usize {
        let pockets = match self.layout.mode {
            BinderMode::Standard { .. } => self.collection.cards.len(),
            BinderMode::Custom => self.collection.features.binder_slots.len(),
        };
        pockets.div_ceil(self.layout.page_size()).max(1)
    }

    /// Page `number` (1-based). Out-of-range numbers fall back to page 1.
    pub fn page(&self, number: usize) -> BinderPage<'a> {
        let total_pages = self.total_pages();
        let number = if number == 0 || number > total_pages { 1 } else { number };
        let size = self.layout.page_size();
        let pockets = self
            .pockets()
            .into_iter()
            .skip((number - 1) * size)
            .take(size)
            .collect();
        BinderPage {
            number,
            total_pages,
            pockets,
        }
    }

    /// Cards with no pocket. Empty outside custom mode.
    pub fn unplaced_cards(&self) -> Vec<&'a Card> {
        match self.layout.mode {
            BinderMode::Standard { .. } => Vec::new(),
            BinderMode::Custom => unplaced_cards(&self.collection.features.binder_slots, &self.collection.cards),
        }
    }
}
