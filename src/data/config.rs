//! Organizer settings
//!
//! Stored as RON in the platform config directory. A missing or broken file
//! never stops the organizer; it starts with defaults instead.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::items::{ItemsType, SchemaVersion};
use crate::organizer::{ColumnVisibility, SortState};

use super::error::DataError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    /// Table shown at startup
    pub items_type: ItemsType,
    pub version: SchemaVersion,
    /// Selection IDs of hidden columns and column groups
    pub hidden_columns: Vec<String>,
    pub sort: SortState,
    /// Vault file to open; a sample vault is generated when unset
    pub vault_path: Option<PathBuf>,
    /// Seed for the sample vault
    pub sample_seed: u64,
    /// Replacement UI strings, by key
    pub strings: HashMap<String, String>,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            items_type: ItemsType::Weapon,
            version: SchemaVersion::V2,
            hidden_columns: vec!["baseStats".to_string()],
            sort: SortState::default(),
            vault_path: None,
            sample_seed: 42,
            strings: HashMap::new(),
        }
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "vault-organizer", "VaultOrganizer") {
        proj_dirs.config_dir().join("organizer.ron")
    } else {
        PathBuf::from("./organizer.ron")
    }
}

impl OrganizerConfig {
    /// Load the config file, or defaults when it is missing or unreadable
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load config {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path)?;
        let config = ron::from_str(&content)?;
        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<(), DataError> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DataError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, content)?;
        log::info!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn visibility(&self) -> ColumnVisibility {
        ColumnVisibility::from_hidden(self.hidden_columns.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::SortDirection;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: OrganizerConfig =
            ron::from_str("(items_type: Armor, hidden_columns: [\"stats\"])").unwrap();
        assert_eq!(config.items_type, ItemsType::Armor);
        assert_eq!(config.version, SchemaVersion::V2);
        assert_eq!(config.hidden_columns, vec!["stats"]);
        assert_eq!(config.sort, SortState::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("vault-organizer-config-{}", std::process::id()));
        let path = dir.join("organizer.ron");

        let mut config = OrganizerConfig::default();
        config.sort = SortState::new("power", SortDirection::Desc);
        config.strings.insert("Organizer.Columns.Name".into(), "Nom".into());
        config.save_to(&path).unwrap();

        assert_eq!(OrganizerConfig::load_from(&path).unwrap(), config);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_broken_config_is_an_error() {
        let dir = std::env::temp_dir().join(format!("vault-organizer-broken-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("organizer.ron");
        fs::write(&path, "(items_type: Spaceship)").unwrap();

        assert!(matches!(OrganizerConfig::load_from(&path), Err(DataError::Ron(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
