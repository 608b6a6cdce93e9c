//! Data loading
//!
//! Vault files, the organizer's own settings, and a generated sample vault
//! for when there is no vault file.

pub mod error;
pub mod loader;
pub mod config;
pub mod sample;

pub use error::DataError;
pub use loader::{load_vault_or_sample, SavedLoadout, VaultData, VAULT_VERSION};
pub use config::{config_path, OrganizerConfig};
pub use sample::sample_vault;
