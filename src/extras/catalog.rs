//! Extras catalog: the read-only game data the picker works on.
//!
//! The catalog ships per extra type an ordered list of groups, each holding
//! item ids, plus an id -> metadata map. Resolving ids against the metadata
//! map yields the flat `ItemRecord` list the grouper consumes.

use super::types::{ExtraType, ItemId, ItemMeta, ItemRecord};
use crate::gear::weapons::ProfessionWeapons;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierGroup {
    pub label: String,
    pub items: Vec<ItemId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraCatalog {
    #[serde(default)]
    pub groups: Vec<ModifierGroup>,
    #[serde(default)]
    pub items: BTreeMap<ItemId, ItemMeta>,
}

impl ExtraCatalog {
    /// Flatten groups into records. Ids without metadata are dropped.
    pub fn records(&self) -> Vec<ItemRecord> {
        self.groups
            .iter()
            .flat_map(|group| group.items.iter())
            .filter_map(|id| match self.items.get(id) {
                Some(meta) => Some(ItemRecord::from_meta(id.clone(), meta)),
                None => {
                    warn!(item = %id, "Catalog references item without metadata, skipping");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub extras: BTreeMap<ExtraType, ExtraCatalog>,
    #[serde(default)]
    pub professions: BTreeMap<String, ProfessionWeapons>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    file: CatalogFile,
    fingerprints: HashMap<ExtraType, String>,
}

impl Catalog {
    pub fn from_file(file: CatalogFile) -> Result<Self> {
        let mut fingerprints = HashMap::new();
        for ty in ExtraType::ALL {
            let extra = file.extras.get(&ty).cloned().unwrap_or_default();
            fingerprints.insert(ty, fingerprint(ty, &extra)?);
        }
        Ok(Self { file, fingerprints })
    }

    pub fn parse(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).context("Failed to parse extras catalog")?;
        Self::from_file(file)
    }

    /// Catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog at {path:?}"))?;
        let catalog = Self::parse(&content)?;
        debug!(path = %path.display(), version = %catalog.version(), "Loaded catalog");
        Ok(catalog)
    }

    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    pub fn version(&self) -> &str {
        &self.file.version
    }

    pub fn extra(&self, ty: ExtraType) -> Option<&ExtraCatalog> {
        self.file.extras.get(&ty)
    }

    pub fn records(&self, ty: ExtraType) -> Vec<ItemRecord> {
        self.extra(ty).map(ExtraCatalog::records).unwrap_or_default()
    }

    /// Content key for the given type, stable across reloads of identical data.
    pub fn fingerprint(&self, ty: ExtraType) -> &str {
        self.fingerprints.get(&ty).map(String::as_str).unwrap_or("")
    }

    pub fn professions(&self) -> &BTreeMap<String, ProfessionWeapons> {
        &self.file.professions
    }
}

fn fingerprint(ty: ExtraType, extra: &ExtraCatalog) -> Result<String> {
    let body = serde_json::to_vec(extra).context("Failed to serialize catalog for hashing")?;
    let mut hasher = Sha256::new();
    hasher.update(ty.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(&body);
    Ok(hex::encode(hasher.finalize()))
}
