//! Card ordering for list views and standard binder mode.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Card, Collection};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Name,
    Rarity,
    /// A key of `Card::custom_fields`.
    CustomField(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort `cards` in place.
///
/// Cards with no value for the key go last in either direction. Rarities
/// follow the collection's definition order, with undefined rarities after
/// defined ones. Ids compare with [`natural_cmp`]; other text compares
/// numerically when both sides parse as numbers and case-insensitively
/// otherwise.
pub fn sort_cards(cards: &mut [&Card], collection: &Collection, key: &SortKey, direction: SortDirection) {
    let rarity_order: HashMap<&str, usize> = collection
        .rarity_definitions
        .iter()
        .enumerate()
        .map(|(i, r)| (r.name.as_str(), i))
        .collect();

    cards.sort_by(|a, b| {
        let (va, vb) = (sort_value(a, key), sort_value(b, key));
        let (va, vb) = match (va, vb) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(va), Some(vb)) => (va, vb),
        };
        let ordering = match key {
            SortKey::Rarity => rarity_order
                .get(va)
                .unwrap_or(&usize::MAX)
                .cmp(rarity_order.get(vb).unwrap_or(&usize::MAX)),
            SortKey::Id => natural_cmp(va, vb),
            _ => match (leading_number(va), leading_number(vb)) {
                (Some(na), Some(nb)) => na.partial_cmp(&nb).unwrap_or(Ordering::Equal),
                _ => text_cmp(va, vb),
            },
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn sort_value<'c>(card: &'c Card, key: &SortKey) -> Option<&'c str> {
    let value = match key {
        SortKey::Id => Some(card.id.as_str()),
        SortKey::Name => Some(card.name.as_str()),
        SortKey::Rarity => card.rarity.as_deref(),
        SortKey::CustomField(k) => card.custom_fields.get(k).map(String::as_str),
    };
    value.filter(|v| !v.is_empty())
}

/// Case-insensitive comparison.
pub fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Case-insensitive comparison that orders digit runs by numeric value, so
/// `"9"` sorts before `"10"` and `"card-2"` before `"card-10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let (mut ai, mut bi) = (a.chars().peekable(), b.chars().peekable());
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let da = take_digits(&mut ai);
                let db = take_digits(&mut bi);
                let ordering = compare_digit_runs(&da, &db);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// The number at the start of `text`, ignoring thousands separators.
///
/// Mirrors how spreadsheet-ish values like `"1,200 pts"` or `"3.5"` are read:
/// leading whitespace is skipped and anything after the number is ignored.
pub fn leading_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let s = cleaned.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}
