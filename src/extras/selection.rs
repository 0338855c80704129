//! Selection state: which catalog items are chosen for each extra type.
//!
//! The store owns the selections and outlives any modal. `SelectionBridge`
//! is the only writer: it reads a snapshot, derives the new set and hands
//! the whole set back to the store in a single write.

use super::group::GroupedCatalog;
use super::types::{ExtraType, ItemId};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

pub trait ExtrasStore {
    fn read(&self, ty: ExtraType) -> Result<Vec<ItemId>>;

    /// Replace the whole selection for `ty`. Must be applied atomically.
    fn write(&mut self, ty: ExtraType, ids: &[ItemId]) -> Result<()>;
}

impl<T: ExtrasStore + ?Sized> ExtrasStore for Box<T> {
    fn read(&self, ty: ExtraType) -> Result<Vec<ItemId>> {
        (**self).read(ty)
    }

    fn write(&mut self, ty: ExtraType, ids: &[ItemId]) -> Result<()> {
        (**self).write(ty, ids)
    }
}

/// Process-local store, used when persistence is disabled.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    selections: HashMap<ExtraType, Vec<ItemId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtrasStore for MemoryStore {
    fn read(&self, ty: ExtraType) -> Result<Vec<ItemId>> {
        Ok(self.selections.get(&ty).cloned().unwrap_or_default())
    }

    fn write(&mut self, ty: ExtraType, ids: &[ItemId]) -> Result<()> {
        self.selections.insert(ty, ids.to_vec());
        Ok(())
    }
}

pub struct SelectionBridge<S> {
    store: S,
}

impl<S: ExtrasStore> SelectionBridge<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_selection(&self, ty: ExtraType) -> Result<Vec<ItemId>> {
        self.store.read(ty)
    }

    /// Include `id` exactly once when `present`, otherwise remove every occurrence.
    /// Returns the selection that was written.
    pub fn toggle(&mut self, ty: ExtraType, id: &ItemId, present: bool) -> Result<Vec<ItemId>> {
        let mut ids: Vec<ItemId> = self
            .store
            .read(ty)?
            .into_iter()
            .filter(|current| current != id)
            .collect();
        if present {
            ids.push(id.clone());
        }
        debug!(extra_type = %ty, item = %id, present, "Toggling extra");
        self.write(ty, ids)
    }

    /// Overwrite the selection as given, duplicates included.
    pub fn replace(&mut self, ty: ExtraType, ids: Vec<ItemId>) -> Result<Vec<ItemId>> {
        self.write(ty, ids)
    }

    /// Overwrite the selection, keeping only the first occurrence of each id.
    pub fn replace_deduped(&mut self, ty: ExtraType, ids: Vec<ItemId>) -> Result<Vec<ItemId>> {
        self.write(ty, dedup_ids(ids))
    }

    /// Drop selected ids that the catalog no longer offers.
    /// Returns how many ids were removed; nothing is written when none were.
    pub fn retain_known(&mut self, ty: ExtraType, grouped: &GroupedCatalog) -> Result<usize> {
        let current = self.store.read(ty)?;
        let before = current.len();
        let kept: Vec<ItemId> = current
            .into_iter()
            .filter(|id| grouped.contains(id))
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            warn!(extra_type = %ty, removed, "Pruning selected extras missing from catalog");
            self.write(ty, kept)?;
        }
        Ok(removed)
    }

    fn write(&mut self, ty: ExtraType, ids: Vec<ItemId>) -> Result<Vec<ItemId>> {
        if let Err(e) = self.store.write(ty, &ids) {
            warn!(extra_type = %ty, "Failed to store selection: {e:#}");
            return Err(e);
        }
        Ok(ids)
    }
}

/// Keep the first occurrence of every id, preserving order.
pub fn dedup_ids(ids: Vec<ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
