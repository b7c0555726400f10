//! Binder slot operations.
//!
//! Slots are a sparse list of card ids; `None` is an empty pocket. Every
//! operation returns a new list and leaves its input alone. Slot lists only
//! grow: padding with empty pockets happens when a target lies past the end,
//! and removals empty a pocket instead of shifting the rest.

use std::collections::HashSet;
use thiserror::Error;

use crate::config;
use crate::models::Card;

pub type Slots = Vec<Option<String>>;

/// Why a placement was refused. Callers surface this to the user; the slots
/// are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementRejection {
    #[error("binder slot {index} is already occupied")]
    SlotOccupied { index: usize },
    #[error("card '{card_id}' is already placed in the binder")]
    AlreadyPlaced { card_id: String },
    #[error("binder slot {index} is out of range")]
    OutOfRange { index: usize },
}

/// Targets inside the current list are always fine; growing is capped at
/// [`config::MAX_BINDER_POCKETS`].
fn check_target(slots: &[Option<String>], target: usize) -> Result<(), PlacementRejection> {
    if target < slots.len() || target < config::MAX_BINDER_POCKETS {
        Ok(())
    } else {
        Err(PlacementRejection::OutOfRange { index: target })
    }
}

fn padded(slots: &[Option<String>], len: usize) -> Slots {
    let mut next = slots.to_vec();
    if next.len() < len {
        next.resize(len, None);
    }
    next
}

fn position(slots: &[Option<String>], card_id: &str) -> Option<usize> {
    slots.iter().position(|s| s.as_deref() == Some(card_id))
}

/// Put an unplaced card into the empty pocket at `target`.
pub fn place_into_empty(slots: &[Option<String>], target: usize, card_id: &str) -> Result<Slots, PlacementRejection> {
    if position(slots, card_id).is_some() {
        return Err(PlacementRejection::AlreadyPlaced {
            card_id: card_id.to_string(),
        });
    }
    if matches!(slots.get(target), Some(Some(_))) {
        return Err(PlacementRejection::SlotOccupied { index: target });
    }
    check_target(slots, target)?;
    let mut next = padded(slots, target + 1);
    next[target] = Some(card_id.to_string());
    Ok(next)
}

/// Drop `card_id` onto the pocket at `target`.
///
/// A card already in the binder trades places with whatever is at `target`,
/// an empty pocket included. A card not yet in the binder takes the pocket,
/// sending any previous occupant back to the unplaced list.
pub fn move_card(slots: &[Option<String>], card_id: &str, target: usize) -> Result<Slots, PlacementRejection> {
    let source = position(slots, card_id);
    if source == Some(target) {
        return Ok(slots.to_vec());
    }
    check_target(slots, target)?;
    let mut next = padded(slots, source.unwrap_or(0).max(target) + 1);
    match source {
        Some(source) => next.swap(source, target),
        None => next[target] = Some(card_id.to_string()),
    }
    Ok(next)
}

/// Empty the pocket at `index`. Out-of-range indexes are ignored.
pub fn remove_from_slot(slots: &[Option<String>], index: usize) -> Slots {
    let mut next = slots.to_vec();
    if let Some(slot) = next.get_mut(index) {
        *slot = None;
    }
    next
}

/// Empty the pocket holding `card_id`, if any.
pub fn remove_card(slots: &[Option<String>], card_id: &str) -> Slots {
    match position(slots, card_id) {
        Some(index) => remove_from_slot(slots, index),
        None => slots.to_vec(),
    }
}

pub fn clear_all() -> Slots {
    Vec::new()
}

/// Empty every pocket whose id is not a card of the collection or was
/// already seen in an earlier pocket. Length is kept.
pub fn repair_slots(slots: &[Option<String>], cards: &[Card]) -> Slots {
    let known: HashSet<&str> = cards.iter().map(|c| c.id.as_str()).collect();
    let mut seen = HashSet::new();
    slots
        .iter()
        .map(|slot| match slot.as_deref() {
            Some(id) if known.contains(id) && seen.insert(id) => Some(id.to_string()),
            _ => None,
        })
        .collect()
}

/// Cards not held by any pocket, in natural id order.
pub fn unplaced_cards<'c>(slots: &[Option<String>], cards: &'c [Card]) -> Vec<&'c Card> {
    let placed: HashSet<&str> = slots.iter().flatten().map(String::as_str).collect();
    let mut unplaced: Vec<&Card> = cards.iter().filter(|c| !placed.contains(c.id.as_str())).collect();
    unplaced.sort_by(|a, b| super::sort::natural_cmp(&a.id, &b.id));
    unplaced
}
