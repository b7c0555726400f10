use serde::{Deserialize, Serialize};

use super::lenient;
use crate::config;
use crate::style;

// ---------------------------------------------------------------------------
// RarityStyle
// ---------------------------------------------------------------------------

/// Opaque presentation tokens attached to a rarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RarityStyle {
    pub base: String,
    pub text: String,
    pub active_ring: String,
}

impl RarityStyle {
    pub fn new(base: &str, text: &str, active_ring: &str) -> Self {
        Self {
            base: base.to_string(),
            text: text.to_string(),
            active_ring: active_ring.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RarityCategory
// ---------------------------------------------------------------------------

/// Whether a rarity counts towards the standard set or is a chase tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RarityCategory {
    #[default]
    Standard,
    Special,
}

impl RarityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RarityCategory::Standard => "Standard",
            RarityCategory::Special => "Special",
        }
    }
}

// ---------------------------------------------------------------------------
// RarityDefinition
// ---------------------------------------------------------------------------

/// A named rarity tier. Names are unique within a collection and the position
/// in [`Collection::rarity_definitions`](super::Collection::rarity_definitions)
/// is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RarityDefinition {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default)]
    pub category: RarityCategory,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub style: Option<RarityStyle>,
}

impl RarityDefinition {
    /// Create a `Standard` rarity with its style derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let style = style::resolve_style(&name);
        Self {
            name,
            category: RarityCategory::Standard,
            style: Some(style),
        }
    }

    pub fn with_category(mut self, category: RarityCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_style(mut self, style: RarityStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// The stored style, or the generic fallback when none was ever assigned.
    pub fn style_or_fallback(&self) -> RarityStyle {
        self.style.clone().unwrap_or_else(config::fallback_style)
    }
}
