//! Display strings
//!
//! Column headers and labels are looked up by key so they can be overridden
//! (or translated) from the config file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Built-in English strings
const DEFAULT_STRINGS: &[(&str, &str)] = &[
    ("Organizer.Columns.Icon", "Icon"),
    ("Organizer.Columns.Name", "Name"),
    ("Organizer.Columns.Power", "Power"),
    ("Organizer.Columns.Damage", "Damage"),
    ("Organizer.Columns.Energy", "Energy"),
    ("Organizer.Columns.Locked", "Locked"),
    ("Organizer.Columns.Tag", "Tag"),
    ("Organizer.Columns.New", "New"),
    ("Organizer.Columns.Crafted", "Crafted"),
    ("Organizer.Columns.Recency", "Recency"),
    ("Organizer.Columns.WishList", "Wish List"),
    ("Organizer.Columns.Tier", "Tier"),
    ("Organizer.Columns.ModSlot", "Mod Slot"),
    ("Organizer.Columns.PercentComplete", "% Complete"),
    ("Organizer.Columns.Archetype", "Archetype"),
    ("Organizer.Columns.Breaker", "Breaker"),
    ("Organizer.Columns.Intrinsics", "Intrinsics"),
    ("Organizer.Columns.Perks", "Perks"),
    ("Organizer.Columns.OtherPerks", "Other Perks"),
    ("Organizer.Columns.PerksMods", "Perks & Mods"),
    ("Organizer.Columns.Traits", "Traits"),
    ("Organizer.Columns.OriginTraits", "Origin Trait"),
    ("Organizer.Columns.Shaders", "Cosmetics"),
    ("Organizer.Columns.Stats", "Stats"),
    ("Organizer.Columns.BaseStats", "Base Stats"),
    ("Organizer.Columns.StatQuality", "Stat Quality"),
    ("Organizer.Columns.StatQualityStat", "{stat} Quality"),
    ("Organizer.Columns.Quality", "Quality"),
    ("Organizer.Columns.MasterworkTier", "Masterwork Tier"),
    ("Organizer.Columns.MasterworkStat", "Masterwork Stat"),
    ("Organizer.Columns.Level", "Level"),
    ("Organizer.Columns.Harmonizable", "Harmonizable"),
    ("Organizer.Columns.KillTracker", "Kill Tracker"),
    ("Organizer.Columns.Source", "Source"),
    ("Organizer.Columns.Year", "Year"),
    ("Organizer.Columns.Season", "Season"),
    ("Organizer.Columns.Event", "Event"),
    ("Organizer.Columns.Location", "Location"),
    ("Organizer.Columns.Loadouts", "Loadouts"),
    ("Organizer.Columns.Notes", "Notes"),
    ("Organizer.Columns.WishListNotes", "Wish List Notes"),
    ("Organizer.Stats.RPM", "RPM"),
    ("Organizer.Stats.Reload", "Reload"),
    ("Organizer.Stats.Aim", "Aim"),
    ("Organizer.Stats.Recoil", "Recoil"),
    ("Organizer.Stats.Power", "Power"),
    ("Organizer.Stats.Airborne", "Airborne"),
];

/// String table keyed by dotted keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strings {
    strings: HashMap<String, String>,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            strings: DEFAULT_STRINGS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Strings {
    /// Built-in strings with the given overrides applied
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut strings = Self::default();
        for (key, value) in overrides {
            strings.strings.insert(key.clone(), value.clone());
        }
        strings
    }

    /// Look up a string, falling back to the key itself
    pub fn t(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(value) => value.clone(),
            None => {
                log::debug!("Missing string for key {}", key);
                key.to_string()
            }
        }
    }

    /// Look up a string and substitute `{name}` placeholders
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.t(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}
