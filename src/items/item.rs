//! Item definitions
//!
//! The read-only item snapshots shown in the organizer. Items come in two
//! schema generations; everything generation-specific lives in `ItemDetails`.

use serde::{Deserialize, Serialize};

use super::sockets::Socket;
use super::stats::StatHash;

/// Unique item instance ID
pub type ItemId = u64;

/// The kind of items a table is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemsType {
    #[default]
    Weapon,
    Armor,
    Ghost,
}

impl ItemsType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemsType::Weapon => "Weapons",
            ItemsType::Armor => "Armor",
            ItemsType::Ghost => "Ghosts",
        }
    }
}

/// Game data schema generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    V1,
    #[default]
    V2,
}

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    Basic,
    #[default]
    Common,
    Rare,
    Legendary,
    Exotic,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic",
            Tier::Common => "Common",
            Tier::Rare => "Rare",
            Tier::Legendary => "Legendary",
            Tier::Exotic => "Exotic",
        }
    }

    /// Name used by `is:` search filters
    pub fn filter_name(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Common => "common",
            Tier::Rare => "rare",
            Tier::Legendary => "legendary",
            Tier::Exotic => "exotic",
        }
    }

    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Tier::Basic => (200, 200, 200),
            Tier::Common => (100, 255, 100),
            Tier::Rare => (100, 150, 255),
            Tier::Legendary => (200, 100, 255),
            Tier::Exotic => (255, 220, 50),
        }
    }
}

/// Damage element of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Kinetic,
    Arc,
    Solar,
    Void,
    Stasis,
    Strand,
}

impl DamageType {
    pub fn name(&self) -> &'static str {
        match self {
            DamageType::Kinetic => "Kinetic",
            DamageType::Arc => "Arc",
            DamageType::Solar => "Solar",
            DamageType::Void => "Void",
            DamageType::Stasis => "Stasis",
            DamageType::Strand => "Strand",
        }
    }

    /// Short name used by `is:` search filters
    pub fn short_name(&self) -> &'static str {
        match self {
            DamageType::Kinetic => "kinetic",
            DamageType::Arc => "arc",
            DamageType::Solar => "solar",
            DamageType::Void => "void",
            DamageType::Stasis => "stasis",
            DamageType::Strand => "strand",
        }
    }

    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            DamageType::Kinetic => (220, 220, 220),
            DamageType::Arc => (120, 200, 255),
            DamageType::Solar => (255, 140, 40),
            DamageType::Void => (180, 100, 220),
            DamageType::Stasis => (80, 120, 255),
            DamageType::Strand => (60, 220, 120),
        }
    }
}

/// Champion breaker intrinsic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakerType {
    ShieldPiercing,
    Disruption,
    Stagger,
}

impl BreakerType {
    pub fn name(&self) -> &'static str {
        match self {
            BreakerType::ShieldPiercing => "Shield-Piercing",
            BreakerType::Disruption => "Disruption",
            BreakerType::Stagger => "Stagger",
        }
    }

    /// Name used by `breaker:` search filters
    pub fn filter_name(&self) -> &'static str {
        match self {
            BreakerType::ShieldPiercing => "anti-barrier",
            BreakerType::Disruption => "overload",
            BreakerType::Stagger => "unstoppable",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            BreakerType::ShieldPiercing => '◎',
            BreakerType::Disruption => '⚡',
            BreakerType::Stagger => '◆',
        }
    }
}

/// Seasonal events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    Dawning,
    CrimsonDays,
    Solstice,
    FestivalOfTheLost,
    Revelry,
    GuardianGames,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Dawning => "The Dawning",
            GameEvent::CrimsonDays => "Crimson Days",
            GameEvent::Solstice => "Solstice",
            GameEvent::FestivalOfTheLost => "Festival of the Lost",
            GameEvent::Revelry => "The Revelry",
            GameEvent::GuardianGames => "Guardian Games",
        }
    }

    /// Name used by `event:` search filters
    pub fn short_name(&self) -> &'static str {
        match self {
            GameEvent::Dawning => "dawning",
            GameEvent::CrimsonDays => "crimsondays",
            GameEvent::Solstice => "solstice",
            GameEvent::FestivalOfTheLost => "fotl",
            GameEvent::Revelry => "revelry",
            GameEvent::GuardianGames => "games",
        }
    }
}

/// A stat value on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStat {
    pub stat_hash: StatHash,
    /// Value including mods and masterwork
    pub value: i32,
    /// Value from the item's own roll
    pub base: i32,
}

impl ItemStat {
    pub fn new(stat_hash: StatHash, value: i32, base: i32) -> Self {
        Self { stat_hash, value, base }
    }
}

/// A min/max quality range (percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualityRange {
    pub min: u32,
    pub max: u32,
}

/// Per-stat roll quality of a first-generation armor piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatQuality {
    pub stat_hash: StatHash,
    /// Lowest scaled value at max light
    pub scaled_min: u32,
    /// Stat split, the best possible value for this stat
    pub split: u32,
    /// Quality percentage of the scaled minimum
    pub quality_min: u32,
}

/// A node of a first-generation talent grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentNode {
    pub hash: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub column: u32,
    pub unlocked: bool,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub xp_required: u32,
    #[serde(default)]
    pub exclusive_in_column: bool,
}

impl TalentNode {
    /// Progress toward unlocking, 0.0 - 1.0
    pub fn progress(&self) -> f32 {
        if self.xp_required == 0 {
            return 1.0;
        }
        self.xp as f32 / self.xp_required as f32
    }

    pub fn in_progress(&self) -> bool {
        !self.unlocked || self.xp < self.xp_required
    }
}

/// First-generation talent grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentGrid {
    pub nodes: Vec<TalentNode>,
}

/// Fields only first-generation items have
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyDetails {
    /// Fraction of the item's progression completed, 0.0 - 1.0
    #[serde(default)]
    pub percent_complete: f32,
    /// Overall armor roll quality
    #[serde(default)]
    pub quality: Option<QualityRange>,
    #[serde(default)]
    pub stat_quality: Vec<StatQuality>,
    #[serde(default)]
    pub talent_grid: Option<TalentGrid>,
}

/// Crafting record of a shaped weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftedInfo {
    /// Unix timestamp (seconds)
    pub crafted_date: i64,
    pub level: u32,
}

/// Masterwork state of an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterworkInfo {
    pub tier: u32,
    /// Names of the stats the masterwork boosts
    #[serde(default)]
    pub stat_names: Vec<String>,
}

impl MasterworkInfo {
    pub fn stat_names_label(&self) -> String {
        self.stat_names.join(", ")
    }
}

/// Which activity a kill tracker counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillTrackerKind {
    PvE,
    PvP,
    Gambit,
}

impl KillTrackerKind {
    pub fn glyph(&self) -> char {
        match self {
            KillTrackerKind::PvE => '☠',
            KillTrackerKind::PvP => '⚔',
            KillTrackerKind::Gambit => '♦',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillTracker {
    pub kind: KillTrackerKind,
    pub count: u32,
}

/// A specialty mod slot on armor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModSlot {
    /// Tag used by `modslot:` search filters
    pub slot_tag: String,
    pub name: String,
}

/// Fields only second-generation items have
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModernDetails {
    #[serde(default)]
    pub energy_capacity: Option<u32>,
    #[serde(default)]
    pub crafted: Option<CraftedInfo>,
    #[serde(default)]
    pub masterwork: Option<MasterworkInfo>,
    #[serde(default)]
    pub breaker: Option<BreakerType>,
    #[serde(default)]
    pub harmonizable: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub event: Option<GameEvent>,
    #[serde(default)]
    pub mod_slots: Vec<ModSlot>,
    #[serde(default)]
    pub kill_tracker: Option<KillTracker>,
}

/// Generation-specific item data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemDetails {
    Legacy(LegacyDetails),
    Modern(ModernDetails),
}

impl Default for ItemDetails {
    fn default() -> Self {
        ItemDetails::Modern(ModernDetails::default())
    }
}

/// The main Item struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique instance ID
    pub id: ItemId,
    pub name: String,
    /// Icon asset path
    #[serde(default)]
    pub icon: String,
    pub items_type: ItemsType,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub locked: bool,
    /// ID of the store (character or vault) holding this item
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub element: Option<DamageType>,
    #[serde(default)]
    pub stats: Vec<ItemStat>,
    #[serde(default)]
    pub sockets: Vec<Socket>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub details: ItemDetails,
}

impl Item {
    /// Create a bare second-generation item
    pub fn new(id: ItemId, name: impl Into<String>, items_type: ItemsType) -> Self {
        Self {
            id,
            name: name.into(),
            icon: String::new(),
            items_type,
            tier: Tier::Common,
            power: 0,
            locked: false,
            owner: String::from("vault"),
            element: None,
            stats: Vec::new(),
            sockets: Vec::new(),
            year: None,
            details: ItemDetails::Modern(ModernDetails::default()),
        }
    }

    /// Create a bare first-generation item
    pub fn new_legacy(id: ItemId, name: impl Into<String>, items_type: ItemsType) -> Self {
        Self {
            details: ItemDetails::Legacy(LegacyDetails::default()),
            ..Self::new(id, name, items_type)
        }
    }

    pub fn version(&self) -> SchemaVersion {
        match self.details {
            ItemDetails::Legacy(_) => SchemaVersion::V1,
            ItemDetails::Modern(_) => SchemaVersion::V2,
        }
    }

    pub fn legacy(&self) -> Option<&LegacyDetails> {
        match &self.details {
            ItemDetails::Legacy(details) => Some(details),
            ItemDetails::Modern(_) => None,
        }
    }

    pub fn modern(&self) -> Option<&ModernDetails> {
        match &self.details {
            ItemDetails::Modern(details) => Some(details),
            ItemDetails::Legacy(_) => None,
        }
    }

    pub fn is_armor(&self) -> bool {
        self.items_type == ItemsType::Armor
    }

    /// Find a stat by hash
    pub fn stat(&self, stat_hash: StatHash) -> Option<&ItemStat> {
        self.stats.iter().find(|s| s.stat_hash == stat_hash)
    }

    pub fn energy_capacity(&self) -> Option<u32> {
        self.modern().and_then(|d| d.energy_capacity)
    }

    pub fn crafted(&self) -> Option<&CraftedInfo> {
        self.modern().and_then(|d| d.crafted.as_ref())
    }

    pub fn masterwork(&self) -> Option<&MasterworkInfo> {
        self.modern().and_then(|d| d.masterwork.as_ref())
    }

    pub fn breaker(&self) -> Option<BreakerType> {
        self.modern().and_then(|d| d.breaker)
    }

    pub fn is_harmonizable(&self) -> bool {
        self.modern().map(|d| d.harmonizable).unwrap_or(false)
    }

    pub fn source(&self) -> Option<&str> {
        self.modern().and_then(|d| d.source.as_deref())
    }

    pub fn season(&self) -> Option<u32> {
        self.modern().and_then(|d| d.season)
    }

    pub fn event(&self) -> Option<GameEvent> {
        self.modern().and_then(|d| d.event)
    }

    pub fn mod_slots(&self) -> &[ModSlot] {
        self.modern().map(|d| d.mod_slots.as_slice()).unwrap_or(&[])
    }

    pub fn kill_tracker(&self) -> Option<&KillTracker> {
        self.modern().and_then(|d| d.kill_tracker.as_ref())
    }

    pub fn percent_complete(&self) -> Option<f32> {
        self.legacy().map(|d| d.percent_complete)
    }

    pub fn quality(&self) -> Option<QualityRange> {
        self.legacy().and_then(|d| d.quality)
    }

    pub fn stat_quality(&self, stat_hash: StatHash) -> Option<&StatQuality> {
        self.legacy()
            .and_then(|d| d.stat_quality.iter().find(|q| q.stat_hash == stat_hash))
    }

    pub fn talent_grid(&self) -> Option<&TalentGrid> {
        self.legacy().and_then(|d| d.talent_grid.as_ref())
    }
}
