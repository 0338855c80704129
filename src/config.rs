use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shortcuts::ShortcutsConfig;
use crate::utils::paths::get_config_path;

/// Where extras selections are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Catalog JSON to use instead of the bundled one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub translations_path: Option<PathBuf>,

    #[serde(default)]
    pub store: StoreKind,

    #[serde(default)]
    pub shortcuts: ShortcutsConfig,
}

fn default_theme() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            catalog_path: None,
            translations_path: None,
            store: StoreKind::default(),
            shortcuts: ShortcutsConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {path:?}"))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("Invalid config at {path:?}"))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }
}
