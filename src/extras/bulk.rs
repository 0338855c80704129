//! Bulk actions over the visible (filtered) part of the catalog.
//!
//! These only derive the next selection. Writing it is the bridge's job.

use super::group::GroupedCatalog;
use super::types::ItemId;
use std::collections::HashSet;

/// Every id in `filtered`, in section-then-item order.
pub fn visible_ids(filtered: &GroupedCatalog) -> Vec<ItemId> {
    filtered.items().map(|item| item.id.clone()).collect()
}

/// `current` followed by every visible id. Ids already selected are repeated;
/// deduplicate at the write boundary when that matters.
pub fn select_all_visible(filtered: &GroupedCatalog, current: &[ItemId]) -> Vec<ItemId> {
    let mut ids = current.to_vec();
    ids.extend(visible_ids(filtered));
    ids
}

/// `current` without any visible id, remaining order preserved.
pub fn unselect_all_visible(filtered: &GroupedCatalog, current: &[ItemId]) -> Vec<ItemId> {
    let visible: HashSet<ItemId> = visible_ids(filtered).into_iter().collect();
    current
        .iter()
        .filter(|id| !visible.contains(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extras::filter::{filter, SearchQuery};
    use crate::extras::group::group;
    use crate::extras::group::tests::record;
    use pretty_assertions::assert_eq;

    fn ids(list: &[&str]) -> Vec<ItemId> {
        list.iter().map(|s| ItemId::new(*s)).collect()
    }

    fn scenario() -> GroupedCatalog {
        group(&[
            record("A", "sigil", "Superior Sigil of Force", 24615),
            record("B", "rune", "Superior Rune of Strength", 24714),
            record("C", "food", "Bowl of Sharpening Stone", 12485),
        ])
    }

    #[test]
    fn test_select_all_visible_respects_filter() {
        let filtered = filter(&scenario(), &SearchQuery::new("rune"));
        assert_eq!(select_all_visible(&filtered, &[]), ids(&["B"]));
    }

    #[test]
    fn test_select_all_visible_appends_after_current() {
        let filtered = filter(&scenario(), &SearchQuery::new(""));
        assert_eq!(
            select_all_visible(&filtered, &ids(&["X"])),
            ids(&["X", "A", "B", "C"])
        );
    }

    #[test]
    fn test_select_all_visible_twice_repeats_ids() {
        let filtered = filter(&scenario(), &SearchQuery::new("sigil"));
        let once = select_all_visible(&filtered, &[]);
        let twice = select_all_visible(&filtered, &once);
        assert_eq!(twice, ids(&["A", "A"]));
    }

    #[test]
    fn test_unselect_all_visible_keeps_hidden() {
        let filtered = filter(&scenario(), &SearchQuery::new("rune"));
        let current = ids(&["A", "B", "C"]);
        assert_eq!(unselect_all_visible(&filtered, &current), ids(&["A", "C"]));
    }

    #[test]
    fn test_unselect_removes_repeated_ids() {
        let filtered = filter(&scenario(), &SearchQuery::new("sigil"));
        assert_eq!(unselect_all_visible(&filtered, &ids(&["A", "B", "A"])), ids(&["B"]));
    }

    #[test]
    fn test_round_trip_from_empty() {
        for q in ["", "rune", "of", "zzz"] {
            let filtered = filter(&scenario(), &SearchQuery::new(q));
            let selected = select_all_visible(&filtered, &[]);
            assert_eq!(unselect_all_visible(&filtered, &selected), Vec::<ItemId>::new());
        }
    }

    #[test]
    fn test_visible_ids_skip_empty_sections() {
        let filtered = filter(&scenario(), &SearchQuery::new("247"));
        assert_eq!(visible_ids(&filtered), ids(&["B"]));
    }
}
