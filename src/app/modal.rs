//! State of one open extras modal.
//!
//! The modal owns its search text and its shortcut binding. Both go away when
//! the modal is dropped: the search is never persisted and the binding guard
//! releases the shortcuts.

use crate::extras::{filter, ExtraType, GroupedCatalog, ItemRecord, SearchQuery};
use crate::shortcuts::{BindingId, ShortcutBinding, ShortcutRouter};
use crate::utils::text_input::TextInput;
use ratatui::widgets::ListState;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalFocus {
    Search,
    List,
}

pub struct ExtrasModal {
    pub extra_type: ExtraType,
    grouped: Rc<GroupedCatalog>,
    filtered: GroupedCatalog,
    search: TextInput,
    pub focus: ModalFocus,
    /// Index into the visible items, section headers excluded
    pub cursor: usize,
    pub list_state: ListState,
    binding: ShortcutBinding,
}

impl ExtrasModal {
    pub fn open(extra_type: ExtraType, grouped: Rc<GroupedCatalog>, router: &ShortcutRouter) -> Self {
        debug!(extra_type = %extra_type, "Opening extras modal");
        let filtered = grouped.as_ref().clone();
        Self {
            extra_type,
            grouped,
            filtered,
            search: TextInput::new(),
            focus: ModalFocus::Search,
            cursor: 0,
            list_state: ListState::default(),
            binding: router.bind(),
        }
    }

    pub fn binding_id(&self) -> BindingId {
        self.binding.id()
    }

    pub fn grouped(&self) -> &GroupedCatalog {
        &self.grouped
    }

    /// Visible part of the catalog for the current search.
    pub fn filtered(&self) -> &GroupedCatalog {
        &self.filtered
    }

    pub fn search(&self) -> &TextInput {
        &self.search
    }

    /// Apply an edit to the search text, refiltering when the text changed.
    pub fn edit_search<R>(&mut self, edit: impl FnOnce(&mut TextInput) -> R) -> R {
        let before = self.search.as_str().to_string();
        let result = edit(&mut self.search);
        if self.search.as_str() != before {
            self.refilter();
        }
        result
    }

    /// Swap in a regrouped catalog, e.g. after the catalog file changed.
    pub fn set_grouped(&mut self, grouped: Rc<GroupedCatalog>) {
        if Rc::ptr_eq(&self.grouped, &grouped) {
            return;
        }
        self.grouped = grouped;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = filter(&self.grouped, &SearchQuery::new(self.search.as_str()));
        self.clamp_cursor();
    }

    pub fn visible_count(&self) -> usize {
        self.filtered.item_count()
    }

    pub fn current_item(&self) -> Option<&ItemRecord> {
        self.filtered.items().nth(self.cursor)
    }

    pub fn focus_search(&mut self) {
        self.focus = ModalFocus::Search;
    }

    pub fn focus_list(&mut self) {
        if self.visible_count() > 0 {
            self.focus = ModalFocus::List;
        }
    }

    pub fn toggle_focus(&mut self) {
        match self.focus {
            ModalFocus::Search => self.focus_list(),
            ModalFocus::List => self.focus_search(),
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.visible_count() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.visible_count().saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            self.cursor = 0;
            self.focus = ModalFocus::Search;
        } else if self.cursor >= count {
            self.cursor = count - 1;
        }
    }
}

impl Drop for ExtrasModal {
    fn drop(&mut self) {
        debug!(extra_type = %self.extra_type, "Closing extras modal");
    }
}
