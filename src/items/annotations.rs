//! User annotations attached to items: tags, wishlist verdicts, loadouts,
//! and the stores items live in

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::item::ItemId;

/// User-assigned item tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagValue {
    Favorite,
    Keep,
    Infuse,
    Junk,
    Archive,
}

/// Sort position of items without a tag
pub const UNTAGGED_SORT_ORDER: u32 = 1000;

impl TagValue {
    pub const ALL: [TagValue; 5] = [
        TagValue::Favorite,
        TagValue::Keep,
        TagValue::Infuse,
        TagValue::Junk,
        TagValue::Archive,
    ];

    /// Name used by `tag:` search filters
    pub fn name(&self) -> &'static str {
        match self {
            TagValue::Favorite => "favorite",
            TagValue::Keep => "keep",
            TagValue::Infuse => "infuse",
            TagValue::Junk => "junk",
            TagValue::Archive => "archive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Get numeric value for sorting (lower = appears first)
    pub fn sort_order(&self) -> u32 {
        match self {
            TagValue::Favorite => 0,
            TagValue::Keep => 1,
            TagValue::Infuse => 2,
            TagValue::Junk => 3,
            TagValue::Archive => 4,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            TagValue::Favorite => '♥',
            TagValue::Keep => '✔',
            TagValue::Infuse => '⚡',
            TagValue::Junk => '✘',
            TagValue::Archive => '▣',
        }
    }

    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            TagValue::Favorite => (255, 100, 140),
            TagValue::Keep => (100, 255, 100),
            TagValue::Infuse => (255, 220, 80),
            TagValue::Junk => (200, 80, 80),
            TagValue::Archive => (150, 150, 150),
        }
    }
}

/// Sort order of a tag name, untagged (or unknown) last
pub fn tag_sort_order(tag: &str) -> u32 {
    TagValue::from_name(tag)
        .map(|t| t.sort_order())
        .unwrap_or(UNTAGGED_SORT_ORDER)
}

/// Wishlist verdict for an item's roll
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishListRoll {
    /// The roll matched a trash-list entry
    #[serde(default)]
    pub is_undesirable: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A named set of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub id: String,
    pub name: String,
    /// Lives in the game rather than in the organizer
    #[serde(default)]
    pub in_game: bool,
}

impl Loadout {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), in_game: false }
    }
}

/// Loadouts referencing each item
pub type LoadoutsByItem = HashMap<ItemId, Vec<Loadout>>;

/// A character or the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub class_name: String,
    #[serde(default = "default_store_glyph")]
    pub glyph: char,
}

fn default_store_glyph() -> char {
    '▪'
}

impl Store {
    pub fn new(id: impl Into<String>, class_name: impl Into<String>, glyph: char) -> Self {
        Self { id: id.into(), class_name: class_name.into(), glyph }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_sort_order() {
        assert_eq!(tag_sort_order("favorite"), 0);
        assert_eq!(tag_sort_order("archive"), 4);
        assert_eq!(tag_sort_order(""), UNTAGGED_SORT_ORDER);
        assert_eq!(tag_sort_order("nonsense"), UNTAGGED_SORT_ORDER);
    }

    #[test]
    fn test_tag_names_round_trip() {
        for tag in TagValue::ALL {
            assert_eq!(TagValue::from_name(tag.name()), Some(tag));
        }
    }
}
