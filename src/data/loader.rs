//! Vault file loader
//!
//! A vault file is a snapshot of a player's items plus everything the
//! organizer annotates them with. RON and JSON are both accepted; the file
//! extension decides which.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::i18n::Strings;
use crate::items::{
    Item, ItemId, ItemsType, Loadout, LoadoutsByItem, SchemaVersion, StatHash, StatInfo, Store,
    TagValue, WishListRoll,
};
use crate::organizer::{ColumnInputs, CustomStatDef, PlugSelectedFn};

use super::error::DataError;

/// Vault file format version
pub const VAULT_VERSION: u32 = 1;

fn vault_version() -> u32 {
    VAULT_VERSION
}

/// A loadout as stored in a vault file, with the items it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLoadout {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub in_game: bool,
    #[serde(default)]
    pub items: Vec<ItemId>,
}

impl SavedLoadout {
    pub fn new(loadout: Loadout, items: Vec<ItemId>) -> Self {
        Self { id: loadout.id, name: loadout.name, in_game: loadout.in_game, items }
    }

    pub fn loadout(&self) -> Loadout {
        Loadout { id: self.id.clone(), name: self.name.clone(), in_game: self.in_game }
    }
}

/// Everything the organizer shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultData {
    #[serde(default = "vault_version")]
    pub version: u32,
    pub items: Vec<Item>,
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub tags: HashMap<ItemId, TagValue>,
    #[serde(default)]
    pub notes: HashMap<ItemId, String>,
    /// Wishlist verdicts; an empty map means no wishlist is loaded
    #[serde(default)]
    pub wish_list: HashMap<ItemId, WishListRoll>,
    #[serde(default)]
    pub loadouts: Vec<SavedLoadout>,
    #[serde(default)]
    pub new_items: HashSet<ItemId>,
    #[serde(default)]
    pub stat_infos: BTreeMap<StatHash, StatInfo>,
    #[serde(default)]
    pub custom_stats: Vec<CustomStatDef>,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl VaultData {
    /// Load a vault file, RON unless the extension says JSON
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path)?;
        let vault: VaultData = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            ron::from_str(&content)?
        };

        if vault.version != VAULT_VERSION {
            return Err(DataError::VersionMismatch {
                expected: VAULT_VERSION,
                found: vault.version,
            });
        }

        log::info!("Loaded {} items from {:?}", vault.items.len(), path);
        Ok(vault)
    }

    /// Write the vault in the format its extension names
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?
        };
        fs::write(path, content)?;

        log::info!("Vault saved to {:?}", path);
        Ok(())
    }

    /// Items shown in one table
    pub fn items_of(&self, items_type: ItemsType, version: SchemaVersion) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| i.items_type == items_type && i.version() == version)
            .collect()
    }

    /// Loadouts referencing each item
    pub fn loadouts_by_item(&self) -> LoadoutsByItem {
        let mut by_item = LoadoutsByItem::new();
        for saved in &self.loadouts {
            let loadout = saved.loadout();
            for id in &saved.items {
                by_item.entry(*id).or_default().push(loadout.clone());
            }
        }
        by_item
    }

    /// Stats that some shown item carries, with their display info.
    ///
    /// Stats without display info get no column.
    pub fn stat_infos_for(&self, items: &[&Item]) -> BTreeMap<StatHash, StatInfo> {
        let hashes: BTreeSet<StatHash> = items
            .iter()
            .flat_map(|item| item.stats.iter().map(|s| s.stat_hash))
            .collect();

        hashes
            .into_iter()
            .filter_map(|hash| match self.stat_infos.get(&hash) {
                Some(info) => Some((hash, info.clone())),
                None => {
                    log::debug!("No display info for stat {}", hash);
                    None
                }
            })
            .collect()
    }

    /// Column builder inputs for one table over this vault
    pub fn column_inputs(
        &self,
        items_type: ItemsType,
        version: SchemaVersion,
        strings: Rc<Strings>,
        on_plug_selected: Option<PlugSelectedFn>,
    ) -> ColumnInputs {
        let tags = Rc::new(self.tags.clone());
        let notes = Rc::new(self.notes.clone());
        let wish_list = Rc::new(self.wish_list.clone());
        let items = self.items_of(items_type, version);

        let mut inputs = ColumnInputs::new(items_type, version);
        inputs.stat_infos = self.stat_infos_for(&items);
        inputs.get_tag = Rc::new(move |item: &Item| tags.get(&item.id).copied());
        inputs.get_notes = Rc::new(move |item: &Item| notes.get(&item.id).cloned());
        inputs.has_wish_list = !self.wish_list.is_empty();
        inputs.wish_list = Rc::new(move |item: &Item| wish_list.get(&item.id).cloned());
        inputs.custom_stat_defs = self.custom_stats.clone();
        inputs.loadouts_by_item = Rc::new(self.loadouts_by_item());
        inputs.new_items = Rc::new(self.new_items.clone());
        inputs.stores = Rc::new(self.stores.clone());
        inputs.on_plug_selected = on_plug_selected;
        inputs.strings = strings;
        inputs
    }
}

/// Load the vault at `path`, falling back to a generated sample vault
pub fn load_vault_or_sample(path: Option<&Path>, seed: u64) -> VaultData {
    let Some(path) = path else {
        log::info!("No vault file configured, using sample vault");
        return super::sample::sample_vault(seed);
    };

    if !path.exists() {
        log::warn!("Vault file {:?} not found, using sample vault", path);
        return super::sample::sample_vault(seed);
    }

    VaultData::load(path).unwrap_or_else(|e| {
        log::warn!("Failed to load vault {:?}: {}. Using sample vault.", path, e);
        super::sample::sample_vault(seed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{stats, ItemStat};

    fn vault() -> VaultData {
        let mut fatebringer = Item::new(1, "Fatebringer", ItemsType::Weapon);
        fatebringer.stats = vec![ItemStat::new(stats::IMPACT, 84, 80), ItemStat::new(999, 1, 1)];
        let thorn = Item::new_legacy(2, "Thorn", ItemsType::Weapon);
        let helm = Item::new(3, "Helm", ItemsType::Armor);

        let mut raid = Loadout::new("l1", "Raid");
        raid.in_game = true;

        let mut vault = VaultData {
            version: VAULT_VERSION,
            items: vec![fatebringer, thorn, helm],
            loadouts: vec![
                SavedLoadout::new(raid, vec![1, 3]),
                SavedLoadout::new(Loadout::new("l2", "Trials"), vec![1]),
            ],
            ..VaultData::default()
        };
        vault.tags.insert(1, TagValue::Favorite);
        vault.notes.insert(1, "pvp".to_string());
        vault.stat_infos.insert(stats::IMPACT, StatInfo::new("Impact"));
        vault.stat_infos.insert(stats::RANGE, StatInfo::new("Range"));
        vault
    }

    #[test]
    fn test_items_of() {
        let vault = vault();
        let names: Vec<&str> = vault
            .items_of(ItemsType::Weapon, SchemaVersion::V2)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Fatebringer"]);
        assert_eq!(vault.items_of(ItemsType::Weapon, SchemaVersion::V1).len(), 1);
        assert!(vault.items_of(ItemsType::Ghost, SchemaVersion::V2).is_empty());
    }

    #[test]
    fn test_loadouts_by_item() {
        let by_item = vault().loadouts_by_item();
        assert_eq!(by_item[&1].len(), 2);
        assert_eq!(by_item[&3][0].name, "Raid");
        assert!(!by_item.contains_key(&2));
    }

    #[test]
    fn test_stat_infos_only_for_present_stats() {
        let vault = vault();
        let items = vault.items_of(ItemsType::Weapon, SchemaVersion::V2);
        let infos = vault.stat_infos_for(&items);
        // Range is known but no item has it; 999 is on an item but unknown
        assert_eq!(infos.keys().copied().collect::<Vec<_>>(), vec![stats::IMPACT]);
    }

    #[test]
    fn test_column_inputs_wire_annotations() {
        let vault = vault();
        let inputs = vault.column_inputs(
            ItemsType::Weapon,
            SchemaVersion::V2,
            Rc::new(Strings::default()),
            None,
        );
        let item = &vault.items[0];
        assert_eq!((inputs.get_tag)(item), Some(TagValue::Favorite));
        assert_eq!((inputs.get_notes)(item).as_deref(), Some("pvp"));
        assert!(!inputs.has_wish_list);
        assert!(inputs.stat_infos.contains_key(&stats::IMPACT));
    }

    #[test]
    fn test_round_trip_ron_and_json() {
        let dir = std::env::temp_dir().join(format!("vault-organizer-test-{}", std::process::id()));
        let vault = vault();

        for name in ["vault.ron", "vault.json"] {
            let path = dir.join(name);
            vault.save(&path).unwrap();
            let loaded = VaultData::load(&path).unwrap();
            assert_eq!(loaded, vault, "{}", name);
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_version_mismatch() {
        let dir = std::env::temp_dir().join(format!("vault-organizer-version-{}", std::process::id()));
        let path = dir.join("old.json");
        let mut vault = vault();
        vault.version = 99;
        vault.save(&path).unwrap();

        match VaultData::load(&path) {
            Err(DataError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, VAULT_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_vault_falls_back_to_sample() {
        let vault = load_vault_or_sample(Some(Path::new("/nonexistent/vault.ron")), 7);
        assert!(!vault.items.is_empty());
    }
}
