use super::modal::ExtrasModal;
use super::mode::Mode;
use crate::extras::{
    select_all_visible, unselect_all_visible, Catalog, ExtraType, ExtrasStore, GroupCache,
    ItemId, SelectionBridge,
};
use crate::gear::WeaponSelection;
use crate::i18n::Translations;
use crate::shortcuts::{BindingId, Shortcut, ShortcutRouter};
use crate::storage::UiCache;
use crate::ui::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct AppState {
    pub catalog: Catalog,
    pub group_cache: GroupCache,
    pub selections: SelectionBridge<Box<dyn ExtrasStore>>,
    /// Last selection read back from the store, per type
    snapshots: HashMap<ExtraType, Vec<ItemId>>,
    pub translations: Translations,
    pub theme: Theme,
    pub shortcuts: ShortcutRouter,
    pub mode: Mode,
    pub type_cursor: usize,
    pub weapons: WeaponSelection,
    pub extras_modal: Option<ExtrasModal>,
    pub show_help: bool,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    pub terminal_height: u16,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        store: Box<dyn ExtrasStore>,
        translations: Translations,
        theme: Theme,
        shortcuts: ShortcutRouter,
        ui_cache: Option<UiCache>,
    ) -> Self {
        let ui_cache = ui_cache.unwrap_or_default();
        let type_cursor = ui_cache
            .selected_extra_type
            .and_then(|ty| ExtraType::ALL.iter().position(|t| *t == ty))
            .unwrap_or(0);
        let mut weapons = ui_cache.weapons;
        weapons.sanitize(catalog.professions());

        let mut state = Self {
            catalog,
            group_cache: GroupCache::new(),
            selections: SelectionBridge::new(store),
            snapshots: HashMap::new(),
            translations,
            theme,
            shortcuts,
            mode: Mode::Browse,
            type_cursor,
            weapons,
            extras_modal: None,
            show_help: false,
            should_quit: false,
            status_message: None,
            terminal_height: 0,
        };
        state.prune_selections();
        state.refresh_all_snapshots();
        state
    }

    pub fn selected_type(&self) -> ExtraType {
        ExtraType::ALL[self.type_cursor.min(ExtraType::ALL.len() - 1)]
    }

    /// Current selection for `ty` as last read from the store.
    pub fn selection(&self, ty: ExtraType) -> &[ItemId] {
        self.snapshots.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, ty: ExtraType, id: &ItemId) -> bool {
        self.selection(ty).contains(id)
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn move_type_cursor_down(&mut self) {
        if self.type_cursor + 1 < ExtraType::ALL.len() {
            self.type_cursor += 1;
        }
    }

    pub fn move_type_cursor_up(&mut self) {
        self.type_cursor = self.type_cursor.saturating_sub(1);
    }

    pub fn open_extras_modal(&mut self) {
        let ty = self.selected_type();
        self.refresh_snapshot(ty);
        let grouped = self.group_cache.get_or_group(&self.catalog, ty);
        // Dropping any previous modal first releases its binding before the new one binds.
        self.extras_modal = None;
        self.extras_modal = Some(ExtrasModal::open(ty, grouped, &self.shortcuts));
        self.mode = Mode::Extras;
    }

    pub fn close_extras_modal(&mut self) {
        self.extras_modal = None;
        self.mode = Mode::Browse;
    }

    /// Act on a shortcut routed to `binding`. Shortcuts for a binding that is
    /// not the open modal's are ignored.
    pub fn handle_shortcut(&mut self, binding: BindingId, shortcut: Shortcut) {
        let Some(modal) = self.extras_modal.as_mut() else {
            return;
        };
        if modal.binding_id() != binding {
            return;
        }
        match shortcut {
            Shortcut::FocusSearch => modal.focus_search(),
            Shortcut::SelectVisible => self.select_all_visible(),
            Shortcut::DeselectVisible => self.deselect_all_visible(),
        }
    }

    /// Flip the item under the modal cursor.
    pub fn toggle_current_item(&mut self) {
        let Some(modal) = self.extras_modal.as_ref() else {
            return;
        };
        let Some(item) = modal.current_item() else {
            return;
        };
        let ty = modal.extra_type;
        let id = item.id.clone();
        let present = !self.current_selection(ty).contains(&id);
        let result = self.selections.toggle(ty, &id, present);
        self.finish_write(ty, result);
    }

    pub fn select_all_visible(&mut self) {
        let Some(ty) = self.modal_type() else {
            return;
        };
        let current = self.current_selection(ty);
        let Some(modal) = self.extras_modal.as_ref() else {
            return;
        };
        let ids = select_all_visible(modal.filtered(), &current);
        debug!(extra_type = %ty, visible = modal.visible_count(), "Selecting visible extras");
        let result = self.selections.replace_deduped(ty, ids);
        self.finish_write(ty, result);
    }

    pub fn deselect_all_visible(&mut self) {
        let Some(ty) = self.modal_type() else {
            return;
        };
        let current = self.current_selection(ty);
        let Some(modal) = self.extras_modal.as_ref() else {
            return;
        };
        let ids = unselect_all_visible(modal.filtered(), &current);
        debug!(extra_type = %ty, visible = modal.visible_count(), "Deselecting visible extras");
        let result = self.selections.replace(ty, ids);
        self.finish_write(ty, result);
    }

    pub fn clear_selected_type(&mut self) {
        let ty = self.selected_type();
        let result = self.selections.replace(ty, Vec::new());
        if result.is_ok() {
            self.set_status_message(format!("Cleared {}", ty.title()));
        }
        self.finish_write(ty, result);
    }

    fn modal_type(&self) -> Option<ExtraType> {
        self.extras_modal.as_ref().map(|modal| modal.extra_type)
    }

    /// The stored selection for `ty`, read fresh so that writes from other
    /// processes sharing the store are not overwritten. Falls back to the
    /// last snapshot when the read fails.
    fn current_selection(&mut self, ty: ExtraType) -> Vec<ItemId> {
        self.refresh_snapshot(ty);
        self.selection(ty).to_vec()
    }

    /// Record a write outcome. Failures surface as a status message and the
    /// snapshot is re-read, so the UI falls back to the store's state.
    fn finish_write(&mut self, ty: ExtraType, result: Result<Vec<ItemId>>) {
        match result {
            Ok(ids) => {
                self.snapshots.insert(ty, ids);
            }
            Err(e) => {
                self.set_status_message(format!("Could not save selection: {e}"));
                self.refresh_snapshot(ty);
            }
        }
    }

    fn refresh_snapshot(&mut self, ty: ExtraType) {
        match self.selections.get_selection(ty) {
            Ok(ids) => {
                self.snapshots.insert(ty, ids);
            }
            Err(e) => warn!(extra_type = %ty, "Failed to read selection: {e:#}"),
        }
    }

    /// Re-read every selection, e.g. after the database file changed.
    pub fn refresh_all_snapshots(&mut self) {
        for ty in ExtraType::ALL {
            self.refresh_snapshot(ty);
        }
    }

    fn prune_selections(&mut self) {
        for ty in ExtraType::ALL {
            let grouped = self.group_cache.get_or_group(&self.catalog, ty);
            if let Err(e) = self.selections.retain_known(ty, &grouped) {
                warn!(extra_type = %ty, "Failed to prune selection: {e:#}");
            }
        }
    }

    /// Swap in a freshly loaded catalog.
    pub fn reload_catalog(&mut self, catalog: Catalog) {
        info!(version = %catalog.version(), "Catalog reloaded");
        self.catalog = catalog;
        self.weapons.sanitize(self.catalog.professions());
        self.prune_selections();
        self.refresh_all_snapshots();

        if let Some(modal) = self.extras_modal.as_mut() {
            let grouped = self.group_cache.get_or_group(&self.catalog, modal.extra_type);
            modal.set_grouped(grouped);
        }
        self.set_status_message("Catalog reloaded".to_string());
    }

    pub fn cycle_profession(&mut self) {
        self.weapons.cycle_profession(self.catalog.professions());
    }

    pub fn cycle_main_hand(&mut self) {
        self.weapons.cycle_main_hand(self.catalog.professions());
    }

    pub fn cycle_off_hand(&mut self) {
        if !self.weapons.can_offhand(self.catalog.professions()) {
            self.set_status_message("Main hand is two-handed".to_string());
        }
        self.weapons.cycle_off_hand(self.catalog.professions());
    }

    pub fn ui_cache(&self) -> UiCache {
        UiCache {
            selected_extra_type: Some(self.selected_type()),
            weapons: self.weapons.clone(),
        }
    }
}
