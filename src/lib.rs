//! Vault Organizer - sortable, filterable item tables for a game vault
//!
//! Builds the column model of an item table (weapons, armor, ghosts across
//! two schema generations) and drives a terminal front end over it.

pub mod items;
pub mod organizer;
pub mod search;
pub mod i18n;
pub mod data;
pub mod ui;

// Re-export commonly used types
pub use items::{Item, ItemsType, SchemaVersion};
pub use organizer::{build_columns, ColumnDef, ColumnInputs};
pub use data::{OrganizerConfig, VaultData};
