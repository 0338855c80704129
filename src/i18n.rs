//! Display labels for section keys and sub texts.
//!
//! Translations come from an optional TOML file of the form
//!
//! ```toml
//! [extraSection]
//! power = "Power"
//!
//! [extraSubText]
//! "on crit" = "On critical hit"
//! ```
//!
//! Anything not listed falls back to a humanized version of the context.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const SECTION_KEY: &str = "extraSection";
pub const SUB_TEXT_KEY: &str = "extraSubText";

pub trait Translate {
    fn translate(&self, key: &str, context: &str) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct Translations {
    tables: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    pub fn parse(content: &str) -> Result<Self> {
        let tables: HashMap<String, HashMap<String, String>> =
            toml::from_str(content).context("Failed to parse translations")?;
        Ok(Self { tables })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read translations at {path:?}"))?;
        Self::parse(&content)
    }
}

impl Translate for Translations {
    fn translate(&self, key: &str, context: &str) -> String {
        self.tables
            .get(key)
            .and_then(|table| table.get(context))
            .cloned()
            .unwrap_or_else(|| humanize(context))
    }
}

/// "power-dps" -> "Power Dps", "on crit" -> "On Crit"
pub fn humanize(context: &str) -> String {
    context
        .split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
