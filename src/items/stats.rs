//! Stat identifiers and stat display helpers

use serde::{Deserialize, Serialize};

/// Stable numeric identifier of a stat
pub type StatHash = u32;

pub const RPM: StatHash = 4284893193;
pub const CHARGE_TIME: StatHash = 2961396640;
pub const DRAW_TIME: StatHash = 447667954;
pub const BLAST_RADIUS: StatHash = 3614673599;
pub const VELOCITY: StatHash = 2523465841;
pub const SWING_SPEED: StatHash = 2837207746;
pub const IMPACT: StatHash = 4043523819;
pub const RANGE: StatHash = 1240592695;
pub const GUARD_EFFICIENCY: StatHash = 2762071195;
pub const GUARD_RESISTANCE: StatHash = 209426660;
pub const ACCURACY: StatHash = 1591432999;
pub const STABILITY: StatHash = 155624089;
pub const HANDLING: StatHash = 943549884;
pub const CHARGE_RATE: StatHash = 3022301683;
pub const GUARD_ENDURANCE: StatHash = 3736848092;
pub const RELOAD_SPEED: StatHash = 4188031367;
pub const AIM_ASSISTANCE: StatHash = 1345609583;
pub const AIRBORNE_EFFECTIVENESS: StatHash = 2714457168;
pub const ZOOM: StatHash = 3555269338;
pub const RECOIL_DIRECTION: StatHash = 2715839340;
pub const MAGAZINE: StatHash = 3871231066;
pub const INVENTORY_SIZE: StatHash = 1931675084;
pub const AMMO_CAPACITY: StatHash = 925767036;
pub const ATTACK: StatHash = 1480404414;
pub const DEFENSE: StatHash = 3897883278;
pub const MOBILITY: StatHash = 2996146975;
pub const RESILIENCE: StatHash = 392767087;
pub const RECOVERY: StatHash = 1943323491;
pub const DISCIPLINE: StatHash = 1735777505;
pub const INTELLECT: StatHash = 144602215;
pub const STRENGTH: StatHash = 4244567218;

/// Canonical display order of stats
const STAT_ORDER: &[StatHash] = &[
    RPM,
    CHARGE_TIME,
    DRAW_TIME,
    BLAST_RADIUS,
    VELOCITY,
    SWING_SPEED,
    IMPACT,
    RANGE,
    GUARD_EFFICIENCY,
    GUARD_RESISTANCE,
    ACCURACY,
    STABILITY,
    HANDLING,
    CHARGE_RATE,
    GUARD_ENDURANCE,
    RELOAD_SPEED,
    AIM_ASSISTANCE,
    AIRBORNE_EFFECTIVENESS,
    ZOOM,
    RECOIL_DIRECTION,
    MAGAZINE,
    INVENTORY_SIZE,
    AMMO_CAPACITY,
    MOBILITY,
    RESILIENCE,
    RECOVERY,
    DISCIPLINE,
    INTELLECT,
    STRENGTH,
];

/// Display metadata for a stat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatInfo {
    pub name: String,
    /// Icon glyph, shown in place of the name when present
    #[serde(default)]
    pub icon: Option<String>,
    /// Lower values are better (sorts ascending by default)
    #[serde(default)]
    pub lower_better: bool,
}

impl StatInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), icon: None, lower_better: false }
    }
}

/// Sort key placing stats in canonical display order.
///
/// Stats outside the known list come after every known stat.
pub fn stat_sort_order(stat_hash: StatHash) -> (usize, StatHash) {
    let index = STAT_ORDER
        .iter()
        .position(|&h| h == stat_hash)
        .unwrap_or(STAT_ORDER.len());
    (index, stat_hash)
}

/// Name of a stat in `stat:` / `basestat:` search filters
pub fn stat_filter_name(stat_hash: StatHash) -> Option<&'static str> {
    let name = match stat_hash {
        RPM => "rof",
        CHARGE_TIME => "chargetime",
        DRAW_TIME => "drawtime",
        BLAST_RADIUS => "blastradius",
        VELOCITY => "velocity",
        SWING_SPEED => "swingspeed",
        IMPACT => "impact",
        RANGE => "range",
        GUARD_EFFICIENCY => "guardefficiency",
        GUARD_RESISTANCE => "guardresistance",
        ACCURACY => "accuracy",
        STABILITY => "stability",
        HANDLING => "handling",
        CHARGE_RATE => "chargerate",
        GUARD_ENDURANCE => "guardendurance",
        RELOAD_SPEED => "reload",
        AIM_ASSISTANCE => "aimassist",
        AIRBORNE_EFFECTIVENESS => "airborne",
        ZOOM => "zoom",
        RECOIL_DIRECTION => "recoil",
        MAGAZINE => "magazine",
        INVENTORY_SIZE => "inventorysize",
        AMMO_CAPACITY => "ammocapacity",
        MOBILITY => "mobility",
        RESILIENCE => "resilience",
        RECOVERY => "recovery",
        DISCIPLINE => "discipline",
        INTELLECT => "intellect",
        STRENGTH => "strength",
        _ => return None,
    };
    Some(name)
}

/// String key of a short header label, for stats whose names are long
pub fn stat_label_key(stat_hash: StatHash) -> Option<&'static str> {
    match stat_hash {
        RPM => Some("Organizer.Stats.RPM"),
        RELOAD_SPEED => Some("Organizer.Stats.Reload"),
        AIM_ASSISTANCE => Some("Organizer.Stats.Aim"),
        RECOIL_DIRECTION => Some("Organizer.Stats.Recoil"),
        ATTACK | DEFENSE => Some("Organizer.Stats.Power"),
        AIRBORNE_EFFECTIVENESS => Some("Organizer.Stats.Airborne"),
        _ => None,
    }
}

/// Angular deviation of the recoil direction stat.
///
/// 100 kicks straight up, 0 is the most erratic; the curve is a sine wave
/// that widens as the value drops.
pub fn recoil_direction(value: i32) -> f64 {
    let value = value as f64;
    ((value + 5.0) * ((2.0 * std::f64::consts::PI) / 20.0)).sin() * (100.0 - value)
}

/// Sortable recoil score: less deviation is better, ties broken by raw value
pub fn recoil_value(value: i32) -> f64 {
    let deviation = recoil_direction(value).abs();
    100.0 - deviation + value as f64 / 100_000.0
}
