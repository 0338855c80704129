use super::group::{GroupedCatalog, Section};
use super::types::ItemRecord;

/// Search text typed into the modal, lowercased once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    lowered: String,
}

impl SearchQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lowered = raw.to_lowercase();
        Self { raw, lowered }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Display text matches case-insensitively, the gw2 id matches verbatim.
    pub fn matches(&self, item: &ItemRecord) -> bool {
        self.is_empty()
            || item.text.to_lowercase().contains(&self.lowered)
            || item.gw2id.to_string().contains(&self.raw)
    }
}

impl From<&str> for SearchQuery {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Narrow every section to the items matching `query`.
/// Sections left without items stay in the result; hiding them is up to the caller.
pub fn filter(grouped: &GroupedCatalog, query: &SearchQuery) -> GroupedCatalog {
    if query.is_empty() {
        return grouped.clone();
    }

    let sections = grouped
        .sections()
        .iter()
        .map(|section| Section {
            name: section.name.clone(),
            items: section
                .items
                .iter()
                .filter(|item| query.matches(item))
                .cloned()
                .collect(),
        })
        .collect();

    GroupedCatalog::from_sections(sections)
}
