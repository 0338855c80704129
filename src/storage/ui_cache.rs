use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::extras::ExtraType;
use crate::gear::WeaponSelection;
use crate::utils::paths::get_ui_cache_path;

/// Main screen state restored on the next start.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiCache {
    /// Extra type highlighted when the app was closed
    #[serde(default)]
    pub selected_extra_type: Option<ExtraType>,
    #[serde(default)]
    pub weapons: WeaponSelection,
}

impl UiCache {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_ui_cache_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cache: UiCache = serde_json::from_str(&content)?;
        Ok(cache)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_ui_cache_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache() {
        let cache = UiCache::default();
        assert!(cache.selected_extra_type.is_none());
        assert!(cache.weapons.profession.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_cache.json");
        let cache = UiCache {
            selected_extra_type: Some(ExtraType::Relics),
            weapons: WeaponSelection {
                profession: Some("warrior".to_string()),
                main_hand: Some("Axe".to_string()),
                off_hand: Some("Shield".to_string()),
            },
        };

        cache.save_to(&path).unwrap();
        assert_eq!(UiCache::load_from(&path).unwrap(), cache);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = UiCache::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(loaded, UiCache::default());
    }

    #[test]
    fn test_tolerates_missing_fields() {
        let cache: UiCache = serde_json::from_str("{}").unwrap();
        assert_eq!(cache, UiCache::default());
    }
}
