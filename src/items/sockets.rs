//! Sockets and plugs
//!
//! A socket is a slot on an item that holds one of several plugs. Perk
//! sockets present their plug options as player-facing choices.

use serde::{Deserialize, Serialize};

use super::item::Item;

/// Broad plug categories used to sort sockets into perk families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlugCategory {
    /// Weapon archetype frame
    Frame,
    /// Weapon intrinsic (exotic perks, catalysts)
    Intrinsic,
    OriginTrait,
    Barrel,
    Magazine,
    Trait,
    Shader,
    Memento,
    /// Weapon or armor ornament ("skin")
    Ornament,
    Mod,
    /// Exotic armor intrinsic perk
    ArmorIntrinsic,
    #[default]
    Other,
}

impl PlugCategory {
    pub fn is_cosmetic(&self) -> bool {
        matches!(self, PlugCategory::Shader | PlugCategory::Memento | PlugCategory::Ornament)
    }

    pub fn is_intrinsic(&self) -> bool {
        matches!(self, PlugCategory::Intrinsic | PlugCategory::ArmorIntrinsic)
    }
}

/// Socket role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SocketKind {
    #[default]
    Standard,
    Masterwork,
    KillTracker,
    Artifice,
}

/// A plug that can sit in a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plug {
    pub hash: u32,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: PlugCategory,
    /// Enhanced version of a regular perk
    #[serde(default)]
    pub enhanced: bool,
}

impl Plug {
    pub fn new(hash: u32, name: impl Into<String>, category: PlugCategory) -> Self {
        Self {
            hash,
            name: name.into(),
            icon: String::new(),
            category,
            enhanced: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socket {
    pub socket_index: u32,
    #[serde(default)]
    pub kind: SocketKind,
    pub plug_options: Vec<Plug>,
    /// Index into `plug_options` of the plugged option
    #[serde(default)]
    pub plugged: Option<usize>,
    #[serde(default)]
    pub is_perk: bool,
    #[serde(default = "default_visible")]
    pub visible_in_game: bool,
}

fn default_visible() -> bool {
    true
}

impl Socket {
    /// A socket with a single, plugged option
    pub fn single(socket_index: u32, plug: Plug) -> Self {
        Self {
            socket_index,
            kind: SocketKind::Standard,
            plug_options: vec![plug],
            plugged: Some(0),
            is_perk: false,
            visible_in_game: true,
        }
    }

    /// A perk column with several options, the first one plugged
    pub fn perk(socket_index: u32, plug_options: Vec<Plug>) -> Self {
        let plugged = if plug_options.is_empty() { None } else { Some(0) };
        Self {
            socket_index,
            kind: SocketKind::Standard,
            plug_options,
            plugged,
            is_perk: true,
            visible_in_game: true,
        }
    }

    pub fn with_kind(mut self, kind: SocketKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn plugged(&self) -> Option<&Plug> {
        self.plugged.and_then(|i| self.plug_options.get(i))
    }

    fn plugged_category(&self) -> Option<PlugCategory> {
        self.plugged().map(|p| p.category)
    }

    pub fn is_empty(&self) -> bool {
        self.plugged().is_none()
    }

    /// Player gets to choose between several options here
    pub fn is_selectable(&self) -> bool {
        self.is_perk && self.plug_options.len() > 1
    }

    fn contains_intrinsic_plug(&self) -> bool {
        self.plugged_category().is_some_and(|c| c.is_intrinsic())
    }
}

/// Perk families shown in separate columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketFilter {
    /// Everything not covered by a dedicated column
    All,
    Traits,
    Origin,
    Shaders,
}

/// Sockets of an item belonging to a perk family, in socket order
pub fn sockets_for(item: &Item, filter: SocketFilter) -> Vec<&Socket> {
    item.sockets
        .iter()
        // Empty sockets are never shown
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let category = s.plugged_category();
            match filter {
                SocketFilter::Traits => {
                    matches!(category, Some(PlugCategory::Frame | PlugCategory::Intrinsic))
                }
                SocketFilter::Origin => category == Some(PlugCategory::OriginTrait),
                SocketFilter::Shaders => category.is_some_and(|c| c.is_cosmetic()),
                SocketFilter::All => !category.is_some_and(|c| {
                    c.is_cosmetic()
                        || c.is_intrinsic()
                        || matches!(c, PlugCategory::OriginTrait | PlugCategory::Frame)
                }),
            }
        })
        // Kill trackers and weapon masterworks have their own columns
        .filter(|s| !matches!(s.kind, SocketKind::KillTracker | SocketKind::Masterwork))
        // Extra intrinsics on exotic class items are shown as intrinsics
        .filter(|s| !(item.is_armor() && s.is_perk && s.visible_in_game && s.contains_intrinsic_plug()))
        .collect()
}

/// Intrinsic perk sockets of an armor piece
pub fn intrinsic_sockets(item: &Item) -> Vec<&Socket> {
    let is_intrinsic = |s: &&Socket| s.plugged_category() == Some(PlugCategory::ArmorIntrinsic);

    // The main intrinsic is the first non-perk one
    let main = item.sockets.iter().filter(is_intrinsic).find(|s| !s.is_perk);
    let extras: Vec<&Socket> = item
        .sockets
        .iter()
        .filter(is_intrinsic)
        .filter(|s| s.is_perk && s.visible_in_game)
        .collect();

    match main {
        // Artifice armor already shows up in the mod slot column
        Some(socket) if socket.kind != SocketKind::Artifice => {
            let mut sockets = vec![socket];
            sockets.extend(extras);
            sockets
        }
        _ => extras,
    }
}

/// The socket holding a weapon's archetype frame
pub fn archetype_socket(item: &Item) -> Option<&Socket> {
    item.sockets
        .iter()
        .find(|s| s.plugged_category() == Some(PlugCategory::Frame))
}

/// Comma-joined names of every plug option in the sockets, `None` when there
/// are no sockets
pub fn perk_string(sockets: &[&Socket]) -> Option<String> {
    if sockets.is_empty() {
        return None;
    }

    let names: Vec<&str> = sockets
        .iter()
        .flat_map(|s| s.plug_options.iter().map(|p| p.name.as_str()))
        .filter(|name| !name.is_empty())
        .collect();
    Some(names.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemsType;

    fn plug(hash: u32, name: &str, category: PlugCategory) -> Plug {
        Plug::new(hash, name, category)
    }

    fn weapon() -> Item {
        let mut item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        item.sockets = vec![
            Socket::single(0, plug(10, "Aggressive Frame", PlugCategory::Frame)),
            Socket::perk(1, vec![
                plug(20, "Hammer-Forged Rifling", PlugCategory::Barrel),
                plug(21, "Smallbore", PlugCategory::Barrel),
            ]),
            Socket::perk(2, vec![plug(30, "Explosive Payload", PlugCategory::Trait)]),
            Socket::single(3, plug(40, "Souldrinker", PlugCategory::OriginTrait)),
            Socket::single(4, plug(50, "Gilded Shader", PlugCategory::Shader)),
            Socket::single(5, plug(60, "Kills", PlugCategory::Other)).with_kind(SocketKind::KillTracker),
            Socket::single(6, plug(70, "Tier 10: Range", PlugCategory::Other)).with_kind(SocketKind::Masterwork),
        ];
        item
    }

    #[test]
    fn test_socket_families() {
        let item = weapon();

        let all: Vec<u32> = sockets_for(&item, SocketFilter::All).iter().map(|s| s.socket_index).collect();
        assert_eq!(all, vec![1, 2]);

        let traits: Vec<u32> = sockets_for(&item, SocketFilter::Traits).iter().map(|s| s.socket_index).collect();
        assert_eq!(traits, vec![0]);

        let origin: Vec<u32> = sockets_for(&item, SocketFilter::Origin).iter().map(|s| s.socket_index).collect();
        assert_eq!(origin, vec![3]);

        let shaders: Vec<u32> = sockets_for(&item, SocketFilter::Shaders).iter().map(|s| s.socket_index).collect();
        assert_eq!(shaders, vec![4]);
    }

    #[test]
    fn test_perk_string() {
        let item = weapon();
        let all = sockets_for(&item, SocketFilter::All);
        assert_eq!(
            perk_string(&all).as_deref(),
            Some("Hammer-Forged Rifling,Smallbore,Explosive Payload")
        );
        assert_eq!(perk_string(&[]), None);
    }

    #[test]
    fn test_archetype_socket() {
        let item = weapon();
        let socket = archetype_socket(&item).and_then(|s| s.plugged());
        assert_eq!(socket.map(|p| p.name.as_str()), Some("Aggressive Frame"));
    }

    #[test]
    fn test_intrinsic_sockets_skip_artifice() {
        let mut armor = Item::new(2, "Artifice Helm", ItemsType::Armor);
        armor.sockets = vec![
            Socket::single(0, plug(1, "Artifice Armor", PlugCategory::ArmorIntrinsic)).with_kind(SocketKind::Artifice),
        ];
        assert!(intrinsic_sockets(&armor).is_empty());

        armor.sockets = vec![
            Socket::single(0, plug(2, "Sun Warrior", PlugCategory::ArmorIntrinsic)),
            Socket::perk(1, vec![plug(3, "Spirit of the Star-Eater", PlugCategory::ArmorIntrinsic)]),
        ];
        let names: Vec<&str> = intrinsic_sockets(&armor)
            .iter()
            .filter_map(|s| s.plugged())
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Sun Warrior", "Spirit of the Star-Eater"]);

        // Extra intrinsics are not repeated in the general perks column
        assert!(sockets_for(&armor, SocketFilter::All).is_empty());
    }
}
