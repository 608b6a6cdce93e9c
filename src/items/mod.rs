//! Item system
//!
//! The item snapshots the organizer tabulates, and the annotations users
//! attach to them.

pub mod item;
pub mod sockets;
pub mod stats;
pub mod annotations;

pub use item::{
    Item, ItemId, ItemsType, SchemaVersion, Tier, DamageType, BreakerType, GameEvent,
    ItemStat, ItemDetails, LegacyDetails, ModernDetails, QualityRange, StatQuality,
    TalentGrid, TalentNode, CraftedInfo, MasterworkInfo, KillTracker, KillTrackerKind, ModSlot,
};
pub use sockets::{Socket, SocketKind, Plug, PlugCategory, SocketFilter};
pub use stats::{StatHash, StatInfo};
pub use annotations::{TagValue, WishListRoll, Loadout, LoadoutsByItem, Store};
