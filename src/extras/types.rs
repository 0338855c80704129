use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category under which a selection set is tracked.
/// Selections for different types never interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraType {
    Sigil1,
    Sigil2,
    Runes,
    Relics,
    Nourishment,
    Enhancement,
}

impl ExtraType {
    pub const ALL: [ExtraType; 6] = [
        ExtraType::Sigil1,
        ExtraType::Sigil2,
        ExtraType::Runes,
        ExtraType::Relics,
        ExtraType::Nourishment,
        ExtraType::Enhancement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExtraType::Sigil1 => "sigil1",
            ExtraType::Sigil2 => "sigil2",
            ExtraType::Runes => "runes",
            ExtraType::Relics => "relics",
            ExtraType::Nourishment => "nourishment",
            ExtraType::Enhancement => "enhancement",
        }
    }

    /// Human readable title used in modal headers
    pub fn title(self) -> &'static str {
        match self {
            ExtraType::Sigil1 => "Sigil 1",
            ExtraType::Sigil2 => "Sigil 2",
            ExtraType::Runes => "Runes",
            ExtraType::Relics => "Relics",
            ExtraType::Nourishment => "Nourishment",
            ExtraType::Enhancement => "Enhancement",
        }
    }
}

impl fmt::Display for ExtraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtraType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sigil1" => Ok(ExtraType::Sigil1),
            "sigil2" => Ok(ExtraType::Sigil2),
            "runes" | "rune" => Ok(ExtraType::Runes),
            "relics" | "relic" => Ok(ExtraType::Relics),
            "nourishment" | "food" => Ok(ExtraType::Nourishment),
            "enhancement" | "utility" => Ok(ExtraType::Enhancement),
            _ => Err(format!("Invalid extra type: {}", s)),
        }
    }
}

/// Opaque catalog identifier, unique within one extra type's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Display metadata for one catalog id, as shipped by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMeta {
    pub gw2id: u32,
    pub section: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_text: Option<String>,
}

/// A catalog entry joined with its metadata. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub gw2id: u32,
    pub section: String,
    pub text: String,
    pub sub_text: Option<String>,
}

impl ItemRecord {
    pub fn from_meta(id: ItemId, meta: &ItemMeta) -> Self {
        Self {
            id,
            gw2id: meta.gw2id,
            section: meta.section.clone(),
            text: meta.text.clone(),
            sub_text: meta.sub_text.clone(),
        }
    }

    /// Label shown in lists: the "Superior " prefix carries no information.
    pub fn display_text(&self) -> &str {
        self.text.strip_prefix("Superior ").unwrap_or(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_type_roundtrip_str() {
        for ty in ExtraType::ALL {
            assert_eq!(ty.as_str().parse::<ExtraType>(), Ok(ty));
        }
    }

    #[test]
    fn test_extra_type_aliases() {
        assert_eq!("Food".parse::<ExtraType>(), Ok(ExtraType::Nourishment));
        assert_eq!(" rune ".parse::<ExtraType>(), Ok(ExtraType::Runes));
        assert!("armor".parse::<ExtraType>().is_err());
    }

    #[test]
    fn test_extra_type_serde_lowercase() {
        let json = serde_json::to_string(&ExtraType::Sigil2).unwrap();
        assert_eq!(json, "\"sigil2\"");
    }

    #[test]
    fn test_meta_camel_case() {
        let meta: ItemMeta = serde_json::from_str(
            r#"{"gw2id": 24615, "section": "power", "text": "Superior Sigil of Force", "subText": "5% damage"}"#,
        )
        .unwrap();
        assert_eq!(meta.sub_text.as_deref(), Some("5% damage"));
    }

    #[test]
    fn test_display_text_strips_superior() {
        let record = ItemRecord {
            id: ItemId::new("force"),
            gw2id: 24615,
            section: "power".to_string(),
            text: "Superior Sigil of Force".to_string(),
            sub_text: None,
        };
        assert_eq!(record.display_text(), "Sigil of Force");
    }
}
