//! Sample vault generation
//!
//! Builds a plausible vault from a seed so the organizer has something to
//! show without a vault file. The same seed always gives the same vault.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::items::stats::{self, StatHash};
use crate::items::{
    BreakerType, CraftedInfo, DamageType, GameEvent, Item, ItemDetails, ItemId, ItemStat,
    ItemsType, KillTracker, KillTrackerKind, LegacyDetails, Loadout, MasterworkInfo, ModSlot,
    ModernDetails, Plug, PlugCategory, QualityRange, Socket, SocketKind, StatInfo, StatQuality,
    Store, TagValue, TalentGrid, TalentNode, Tier, WishListRoll,
};
use crate::organizer::CustomStatDef;

use super::loader::{SavedLoadout, VaultData, VAULT_VERSION};

/// Hash of the generated "Total" custom armor stat
pub const TOTAL_STAT: StatHash = 1001;

const WEAPON_NAMES: &[&str] = &[
    "Fatebringer", "Vision of Confluence", "Austringer", "Gnawing Hunger", "Mindbender's Ambition",
    "Fixed Odds", "Palindrome", "Igneous Hammer", "Funnelweb", "Calus Mini-Tool",
];
const EXOTIC_WEAPON_NAMES: &[&str] = &["Ace of Spades", "Gjallarhorn", "Riskrunner", "Outbreak Perfected"];
const ARMOR_NAMES: &[&str] = &[
    "Iron Forerunner Helm", "Deep Explorer Grasps", "Reverie Dawn Cloak", "Tusked Allegiance Plate",
    "Bond of the Great Hunt", "Substitutional Alloy Greaves",
];
const EXOTIC_ARMOR_NAMES: &[&str] = &["Ophidian Aspect", "Lucky Pants", "Heart of Inmost Light"];
const GHOST_NAMES: &[&str] = &["Predator Shell", "Lambda Shell", "Sunbreak Shell"];
const LEGACY_WEAPON_NAMES: &[&str] = &["Thorn", "Vex Mythoclast", "Red Death", "Fatebringer (Year 1)"];
const LEGACY_ARMOR_NAMES: &[&str] = &["Helm of Saint-14", "Crest of Alpha Lupi", "Obsidian Mind"];

const FRAMES: &[&str] = &["Aggressive Frame", "Adaptive Frame", "Precision Frame", "Rapid-Fire Frame"];
const BARRELS: &[&str] = &["Hammer-Forged Rifling", "Smallbore", "Corkscrew Rifling", "Arrowhead Brake"];
const MAGAZINES: &[&str] = &["Accurized Rounds", "Tactical Mag", "Flared Magwell", "Appended Mag"];
const LEFT_TRAITS: &[&str] = &["Outlaw", "Rapid Hit", "Perpetual Motion", "Threat Detector"];
const RIGHT_TRAITS: &[&str] = &["Kill Clip", "Explosive Payload", "Firefly", "Rampage", "Frenzy"];
const ORIGINS: &[&str] = &["Souldrinker", "Veist Stinger", "Nadir Focus", "Suros Synergy"];
const SHADERS: &[&str] = &["Gloom", "Superblack", "Bumblebee", "Midnight Talons"];
const ARMOR_INTRINSICS: &[&str] = &["Cobra Totem", "Trapper's Ambush", "Inmost Light"];
const MOD_SLOTS: &[(&str, &str)] = &[
    ("deepstonecrypt", "Deep Stone Crypt"),
    ("vaultofglass", "Vault of Glass"),
    ("kingsfall", "King's Fall"),
    ("artifice", "Artifice"),
];
const SOURCES: &[&str] = &["raid", "trials", "ironbanner", "nightfall", "dungeon", "vanguard"];
const WISH_LIST_NOTES: &[&str] = &["PvE god roll", "PvP: range + stability", "Add-clear workhorse"];

const WEAPON_STATS: &[StatHash] = &[
    stats::RPM, stats::IMPACT, stats::RANGE, stats::STABILITY, stats::HANDLING,
    stats::RELOAD_SPEED, stats::AIM_ASSISTANCE, stats::RECOIL_DIRECTION, stats::MAGAZINE,
];
const ARMOR_STATS: &[StatHash] = &[
    stats::MOBILITY, stats::RESILIENCE, stats::RECOVERY, stats::DISCIPLINE, stats::INTELLECT,
    stats::STRENGTH,
];

/// Display names of the stats the sample vault rolls
fn sample_stat_infos() -> Vec<(StatHash, StatInfo)> {
    vec![
        (stats::RPM, StatInfo::new("Rounds Per Minute")),
        (stats::IMPACT, StatInfo::new("Impact")),
        (stats::RANGE, StatInfo::new("Range")),
        (stats::STABILITY, StatInfo::new("Stability")),
        (stats::HANDLING, StatInfo::new("Handling")),
        (stats::RELOAD_SPEED, StatInfo::new("Reload Speed")),
        (stats::AIM_ASSISTANCE, StatInfo::new("Aim Assistance")),
        (stats::RECOIL_DIRECTION, StatInfo::new("Recoil Direction")),
        (stats::MAGAZINE, StatInfo::new("Magazine")),
        (stats::MOBILITY, StatInfo::new("Mobility")),
        (stats::RESILIENCE, StatInfo::new("Resilience")),
        (stats::RECOVERY, StatInfo::new("Recovery")),
        (stats::DISCIPLINE, StatInfo::new("Discipline")),
        (stats::INTELLECT, StatInfo::new("Intellect")),
        (stats::STRENGTH, StatInfo::new("Strength")),
        (stats::DEFENSE, StatInfo::new("Defense")),
        (TOTAL_STAT, StatInfo::new("Total")),
    ]
}

/// Stable plug hash derived from the plug name
fn plug_hash(name: &str) -> u32 {
    name.bytes()
        .fold(2_166_136_261u32, |h, b| (h ^ b as u32).wrapping_mul(16_777_619))
}

fn plug(name: &str, category: PlugCategory) -> Plug {
    Plug::new(plug_hash(name), name, category)
}

fn pick<'a>(rng: &mut impl Rng, names: &[&'a str]) -> &'a str {
    names.choose(rng).copied().unwrap_or_default()
}

/// Several distinct names from a table
fn pick_several<'a>(rng: &mut impl Rng, names: &[&'a str], count: usize) -> Vec<&'a str> {
    names.choose_multiple(rng, count).copied().collect()
}

/// Roll a tier; exotics are rare
fn roll_tier(rng: &mut impl Rng) -> Tier {
    match rng.gen_range(0..100) {
        0..=4 => Tier::Exotic,
        5..=69 => Tier::Legendary,
        70..=89 => Tier::Rare,
        90..=96 => Tier::Common,
        _ => Tier::Basic,
    }
}

fn roll_element(rng: &mut impl Rng) -> DamageType {
    *[
        DamageType::Kinetic,
        DamageType::Arc,
        DamageType::Solar,
        DamageType::Void,
        DamageType::Stasis,
        DamageType::Strand,
    ]
    .choose(rng)
    .unwrap_or(&DamageType::Kinetic)
}

struct Generator {
    rng: StdRng,
    next_id: ItemId,
    owners: Vec<String>,
}

impl Generator {
    fn next_id(&mut self) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn base_item(&mut self, name: &str, items_type: ItemsType, tier: Tier) -> Item {
        let id = self.next_id();
        let mut item = Item::new(id, name, items_type);
        item.tier = tier;
        item.icon = format!("icons/{}.png", plug_hash(name));
        item.power = if items_type == ItemsType::Ghost { 0 } else { self.rng.gen_range(1750..=1810) };
        item.locked = self.rng.gen_bool(0.4);
        item.owner = self.owners.choose(&mut self.rng).cloned().unwrap_or_else(|| "vault".to_string());
        item.year = Some(self.rng.gen_range(1..=7));
        item
    }

    fn weapon_stats(&mut self) -> Vec<ItemStat> {
        WEAPON_STATS
            .iter()
            .map(|&hash| {
                let base = match hash {
                    stats::RPM => *[140, 150, 180, 340, 450, 600, 900].choose(&mut self.rng).unwrap_or(&140),
                    stats::MAGAZINE => self.rng.gen_range(4..=60),
                    _ => self.rng.gen_range(20..=90),
                };
                let bonus = if hash == stats::RPM { 0 } else { self.rng.gen_range(0..=10) };
                ItemStat::new(hash, base + bonus, base)
            })
            .collect()
    }

    fn armor_stats(&mut self) -> Vec<ItemStat> {
        let mut rolled: Vec<ItemStat> = ARMOR_STATS
            .iter()
            .map(|&hash| {
                let base = self.rng.gen_range(2..=30);
                ItemStat::new(hash, base + 2, base)
            })
            .collect();
        rolled.push(ItemStat::new(stats::DEFENSE, 10, 10));
        rolled
    }

    fn weapon_sockets(&mut self, exotic: bool) -> Vec<Socket> {
        let mut sockets = Vec::new();
        let frame = if exotic { "Exotic Intrinsic" } else { pick(&mut self.rng, FRAMES) };
        let frame_category = if exotic { PlugCategory::Intrinsic } else { PlugCategory::Frame };
        sockets.push(Socket::single(0, plug(frame, frame_category)));

        let columns: [(&[&str], PlugCategory); 4] = [
            (BARRELS, PlugCategory::Barrel),
            (MAGAZINES, PlugCategory::Magazine),
            (LEFT_TRAITS, PlugCategory::Trait),
            (RIGHT_TRAITS, PlugCategory::Trait),
        ];
        for (i, (names, category)) in columns.into_iter().enumerate() {
            let count = if exotic { 1 } else { self.rng.gen_range(1..=3) };
            let mut options: Vec<Plug> = pick_several(&mut self.rng, names, count)
                .into_iter()
                .map(|name| plug(name, category))
                .collect();
            if category == PlugCategory::Trait {
                if let Some(first) = options.first_mut() {
                    first.enhanced = self.rng.gen_bool(0.2);
                }
            }
            let mut socket = Socket::perk(i as u32 + 1, options);
            if socket.plug_options.len() > 1 {
                socket.plugged = Some(self.rng.gen_range(0..socket.plug_options.len()));
            }
            sockets.push(socket);
        }

        if !exotic && self.rng.gen_bool(0.6) {
            sockets.push(Socket::single(5, plug(pick(&mut self.rng, ORIGINS), PlugCategory::OriginTrait)));
        }
        sockets.push(Socket::single(6, plug(pick(&mut self.rng, SHADERS), PlugCategory::Shader)));
        sockets.push(
            Socket::single(7, plug("Masterwork", PlugCategory::Mod)).with_kind(SocketKind::Masterwork),
        );
        sockets.push(
            Socket::single(8, plug("Kill Tracker", PlugCategory::Other)).with_kind(SocketKind::KillTracker),
        );
        sockets
    }

    fn weapon(&mut self) -> Item {
        let tier = roll_tier(&mut self.rng);
        let exotic = tier == Tier::Exotic;
        let name = if exotic {
            pick(&mut self.rng, EXOTIC_WEAPON_NAMES)
        } else {
            pick(&mut self.rng, WEAPON_NAMES)
        };

        let mut item = self.base_item(name, ItemsType::Weapon, tier);
        item.element = Some(roll_element(&mut self.rng));
        item.stats = self.weapon_stats();
        item.sockets = self.weapon_sockets(exotic);

        let crafted = (!exotic && self.rng.gen_bool(0.3)).then(|| CraftedInfo {
            crafted_date: self.rng.gen_range(1_640_000_000..1_720_000_000),
            level: self.rng.gen_range(1..=30),
        });
        let masterwork = self.rng.gen_bool(0.7).then(|| MasterworkInfo {
            tier: self.rng.gen_range(1..=10),
            stat_names: vec![pick(&mut self.rng, &["Range", "Stability", "Handling", "Reload Speed"]).to_string()],
        });
        let kill_tracker = self.rng.gen_bool(0.8).then(|| KillTracker {
            kind: *[KillTrackerKind::PvE, KillTrackerKind::PvP, KillTrackerKind::Gambit]
                .choose(&mut self.rng)
                .unwrap_or(&KillTrackerKind::PvE),
            count: self.rng.gen_range(0..5000),
        });
        let breaker = exotic
            .then(|| {
                [BreakerType::ShieldPiercing, BreakerType::Disruption, BreakerType::Stagger]
                    .choose(&mut self.rng)
                    .copied()
            })
            .flatten();
        let event = self.rng.gen_bool(0.1).then(|| {
            *[GameEvent::Dawning, GameEvent::Solstice, GameEvent::FestivalOfTheLost]
                .choose(&mut self.rng)
                .unwrap_or(&GameEvent::Dawning)
        });

        item.details = ItemDetails::Modern(ModernDetails {
            crafted,
            masterwork,
            breaker,
            harmonizable: crafted.is_none() && self.rng.gen_bool(0.15),
            source: Some(pick(&mut self.rng, SOURCES).to_string()),
            season: Some(self.rng.gen_range(1..=24)),
            event,
            kill_tracker,
            ..ModernDetails::default()
        });
        item
    }

    fn armor(&mut self) -> Item {
        let tier = roll_tier(&mut self.rng);
        let exotic = tier == Tier::Exotic;
        let name = if exotic {
            pick(&mut self.rng, EXOTIC_ARMOR_NAMES)
        } else {
            pick(&mut self.rng, ARMOR_NAMES)
        };

        let mut item = self.base_item(name, ItemsType::Armor, tier);
        item.stats = self.armor_stats();

        let mut sockets = Vec::new();
        if exotic {
            sockets.push(Socket::single(0, plug(pick(&mut self.rng, ARMOR_INTRINSICS), PlugCategory::ArmorIntrinsic)));
        }
        let mods = pick_several(&mut self.rng, &["Harmonic Siphon", "Firepower", "Recuperation"], 2);
        for (i, name) in mods.into_iter().enumerate() {
            sockets.push(Socket::single(i as u32 + 1, plug(name, PlugCategory::Mod)));
        }
        sockets.push(Socket::single(4, plug(pick(&mut self.rng, SHADERS), PlugCategory::Shader)));
        item.sockets = sockets;

        let mod_slots = if self.rng.gen_bool(0.3) {
            let (tag, name) = *MOD_SLOTS.choose(&mut self.rng).unwrap_or(&MOD_SLOTS[0]);
            vec![ModSlot { slot_tag: tag.to_string(), name: name.to_string() }]
        } else {
            Vec::new()
        };

        item.details = ItemDetails::Modern(ModernDetails {
            energy_capacity: Some(self.rng.gen_range(1..=10)),
            masterwork: Some(MasterworkInfo { tier: self.rng.gen_range(0..=10), stat_names: Vec::new() }),
            source: Some(pick(&mut self.rng, SOURCES).to_string()),
            season: Some(self.rng.gen_range(1..=24)),
            mod_slots,
            ..ModernDetails::default()
        });
        item
    }

    fn ghost(&mut self) -> Item {
        let name = pick(&mut self.rng, GHOST_NAMES);
        let mut item = self.base_item(name, ItemsType::Ghost, Tier::Legendary);
        item.sockets = vec![
            Socket::single(0, plug("Wombo Detector", PlugCategory::Mod)),
            Socket::single(1, plug(pick(&mut self.rng, SHADERS), PlugCategory::Shader)),
        ];
        item.details = ItemDetails::Modern(ModernDetails {
            energy_capacity: Some(self.rng.gen_range(6..=10)),
            season: Some(self.rng.gen_range(1..=24)),
            ..ModernDetails::default()
        });
        item
    }

    fn talent_grid(&mut self) -> TalentGrid {
        let mut nodes = vec![TalentNode {
            hash: plug_hash("Upgrade Damage"),
            name: "Upgrade Damage".to_string(),
            description: String::new(),
            icon: String::new(),
            column: 0,
            unlocked: true,
            xp: 0,
            xp_required: 0,
            exclusive_in_column: false,
        }];
        for (column, names) in [LEFT_TRAITS, RIGHT_TRAITS].into_iter().enumerate() {
            for name in pick_several(&mut self.rng, names, 2) {
                let xp_required = 1000;
                let unlocked = self.rng.gen_bool(0.6);
                nodes.push(TalentNode {
                    hash: plug_hash(name),
                    name: name.to_string(),
                    description: String::new(),
                    icon: String::new(),
                    column: column as u32 + 1,
                    unlocked,
                    xp: if unlocked { xp_required } else { self.rng.gen_range(0..xp_required) },
                    xp_required,
                    exclusive_in_column: true,
                });
            }
        }
        TalentGrid { nodes }
    }

    fn legacy_weapon(&mut self) -> Item {
        let name = pick(&mut self.rng, LEGACY_WEAPON_NAMES);
        let id = self.next_id();
        let mut item = Item::new_legacy(id, name, ItemsType::Weapon);
        item.tier = Tier::Exotic;
        item.power = self.rng.gen_range(300..=365);
        item.element = Some(roll_element(&mut self.rng));
        item.year = Some(1);
        item.stats = self.weapon_stats();
        item.details = ItemDetails::Legacy(LegacyDetails {
            percent_complete: self.rng.gen_range(0.0..=1.0),
            talent_grid: Some(self.talent_grid()),
            ..LegacyDetails::default()
        });
        item
    }

    fn legacy_armor(&mut self) -> Item {
        let name = pick(&mut self.rng, LEGACY_ARMOR_NAMES);
        let id = self.next_id();
        let mut item = Item::new_legacy(id, name, ItemsType::Armor);
        item.tier = Tier::Legendary;
        item.power = self.rng.gen_range(300..=335);
        item.year = Some(1);
        item.stats = self.armor_stats();

        let stat_quality: Vec<StatQuality> = [stats::INTELLECT, stats::DISCIPLINE, stats::STRENGTH]
            .into_iter()
            .map(|stat_hash| {
                let split = self.rng.gen_range(40..=70);
                let scaled_min = self.rng.gen_range(split / 2..=split);
                StatQuality {
                    stat_hash,
                    scaled_min,
                    split,
                    quality_min: (100 * scaled_min) / split,
                }
            })
            .collect();
        let min = stat_quality.iter().map(|q| q.quality_min).min().unwrap_or(0);

        item.details = ItemDetails::Legacy(LegacyDetails {
            percent_complete: self.rng.gen_range(0.0..=1.0),
            quality: Some(QualityRange { min, max: (min + 4).min(100) }),
            stat_quality,
            talent_grid: Some(self.talent_grid()),
        });
        item
    }
}

/// Generate a demo vault from a seed
pub fn sample_vault(seed: u64) -> VaultData {
    let stores = vec![
        Store::new("vault", "Vault", '▣'),
        Store::new("char-titan", "Titan", '⛨'),
        Store::new("char-hunter", "Hunter", '⚔'),
        Store::new("char-warlock", "Warlock", '✦'),
    ];
    let mut generator = Generator {
        rng: StdRng::seed_from_u64(seed),
        next_id: 1,
        owners: stores.iter().map(|s| s.id.clone()).collect(),
    };

    let mut items = Vec::new();
    for _ in 0..40 {
        items.push(generator.weapon());
    }
    for _ in 0..30 {
        items.push(generator.armor());
    }
    for _ in 0..6 {
        items.push(generator.ghost());
    }
    for _ in 0..8 {
        items.push(generator.legacy_weapon());
    }
    for _ in 0..8 {
        items.push(generator.legacy_armor());
    }

    let mut vault = VaultData {
        version: VAULT_VERSION,
        stores,
        stat_infos: sample_stat_infos().into_iter().collect(),
        custom_stats: vec![ARMOR_STATS
            .iter()
            .fold(CustomStatDef::new(TOTAL_STAT, "Total", "total"), |def, &hash| def.weight(hash, 1.0))],
        ..VaultData::default()
    };

    let rng = &mut generator.rng;
    for item in &items {
        if rng.gen_bool(0.35) {
            if let Some(tag) = TagValue::ALL.choose(rng) {
                vault.tags.insert(item.id, *tag);
            }
        }
        if rng.gen_bool(0.1) {
            vault.notes.insert(item.id, pick(rng, WISH_LIST_NOTES).to_lowercase());
        }
        if item.items_type == ItemsType::Weapon && rng.gen_bool(0.4) {
            vault.wish_list.insert(
                item.id,
                WishListRoll {
                    is_undesirable: rng.gen_bool(0.3),
                    notes: rng.gen_bool(0.7).then(|| pick(rng, WISH_LIST_NOTES).to_string()),
                },
            );
        }
        if rng.gen_bool(0.1) {
            vault.new_items.insert(item.id);
        }
    }

    let loadout_names = [("l-raid", "Raid", false), ("l-trials", "Trials", true), ("l-gm", "Grandmasters", false)];
    for (id, name, in_game) in loadout_names {
        let members: Vec<ItemId> = items
            .choose_multiple(rng, 6)
            .map(|item| item.id)
            .collect();
        let mut loadout = Loadout::new(id, name);
        loadout.in_game = in_game;
        vault.loadouts.push(SavedLoadout::new(loadout, members));
    }

    vault.items = items;
    log::info!("Generated sample vault with {} items (seed {})", vault.items.len(), seed);
    vault
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::SchemaVersion;

    #[test]
    fn test_same_seed_same_vault() {
        assert_eq!(sample_vault(7), sample_vault(7));
    }

    #[test]
    fn test_every_table_has_items() {
        let vault = sample_vault(42);
        for (items_type, version) in [
            (ItemsType::Weapon, SchemaVersion::V2),
            (ItemsType::Armor, SchemaVersion::V2),
            (ItemsType::Ghost, SchemaVersion::V2),
            (ItemsType::Weapon, SchemaVersion::V1),
            (ItemsType::Armor, SchemaVersion::V1),
        ] {
            assert!(!vault.items_of(items_type, version).is_empty(), "{:?} {:?}", items_type, version);
        }
    }

    #[test]
    fn test_unique_ids() {
        let vault = sample_vault(3);
        let ids: std::collections::HashSet<ItemId> = vault.items.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), vault.items.len());
    }

    #[test]
    fn test_plug_hash_is_stable() {
        assert_eq!(plug_hash("Outlaw"), plug_hash("Outlaw"));
        assert_ne!(plug_hash("Outlaw"), plug_hash("Rapid Hit"));
    }
}
