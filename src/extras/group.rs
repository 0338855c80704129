use super::catalog::Catalog;
use super::types::{ExtraType, ItemId, ItemRecord};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub items: Vec<ItemRecord>,
}

/// Items partitioned by their `section` key.
///
/// Sections keep first-seen order, items keep input order. The filter reuses
/// this type for its output, where a section may hold zero items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCatalog {
    sections: Vec<Section>,
}

impl GroupedCatalog {
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Sections holding at least one item.
    pub fn non_empty_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.items.is_empty())
    }

    /// All items in section-then-item order.
    pub fn items(&self) -> impl Iterator<Item = &ItemRecord> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items().any(|item| &item.id == id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemRecord> {
        self.items().find(|item| &item.id == id)
    }
}

/// Partition `items` by section.
///
/// When an id occurs more than once the last occurrence wins and the earlier
/// ones are left out, so the result never holds more items than there are
/// distinct ids.
pub fn group(items: &[ItemRecord]) -> GroupedCatalog {
    let last_index: HashMap<&ItemId, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (&item.id, i))
        .collect();

    let mut sections: Vec<Section> = Vec::new();
    let mut section_index: HashMap<&str, usize> = HashMap::new();

    for (i, item) in items.iter().enumerate() {
        if last_index.get(&item.id) != Some(&i) {
            continue;
        }
        let idx = *section_index.entry(item.section.as_str()).or_insert_with(|| {
            sections.push(Section {
                name: item.section.clone(),
                items: Vec::new(),
            });
            sections.len() - 1
        });
        sections[idx].items.push(item.clone());
    }

    GroupedCatalog { sections }
}

/// Memoizes `group` per extra type, keyed on the catalog's content fingerprint.
#[derive(Debug, Default)]
pub struct GroupCache {
    entries: HashMap<ExtraType, (String, Rc<GroupedCatalog>)>,
    computations: usize,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_group(&mut self, catalog: &Catalog, ty: ExtraType) -> Rc<GroupedCatalog> {
        let key = catalog.fingerprint(ty);
        if let Some((cached_key, grouped)) = self.entries.get(&ty)
            && cached_key == key
        {
            return Rc::clone(grouped);
        }

        let grouped = Rc::new(group(&catalog.records(ty)));
        self.computations += 1;
        debug!(extra_type = %ty, items = grouped.item_count(), "Grouped catalog");
        self.entries
            .insert(ty, (key.to_string(), Rc::clone(&grouped)));
        grouped
    }

    /// Number of times grouping actually ran.
    pub fn computations(&self) -> usize {
        self.computations
    }
}
