//! Modal-wide keyboard shortcuts.
//!
//! A single router sits in front of all key handling. While a binding is
//! alive the configured chords are intercepted and never reach the text
//! input or list beneath. Bindings are guards: dropping one unbinds it, so a
//! modal cannot leave its shortcuts installed after it is gone.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    FocusSearch,
    SelectVisible,
    DeselectVisible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Plain keys belong to the search input and the list, so a shortcut
    /// needs Ctrl or Alt unless it is a function key.
    pub fn is_bindable(&self) -> bool {
        matches!(self.code, KeyCode::F(_))
            || self
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    }

    /// Whether some key event would match both chords.
    pub fn overlaps(&self, other: &KeyChord) -> bool {
        self.normalized() == other.normalized()
    }

    fn normalized(self) -> KeyChord {
        let mut modifiers =
            self.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        let code = match self.code {
            KeyCode::Char(c) => {
                modifiers.remove(KeyModifiers::SHIFT);
                KeyCode::Char(c.to_ascii_lowercase())
            }
            other => other,
        };
        KeyChord { code, modifiers }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        let code_matches = match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        let mut wanted = self.modifiers & mask;
        let mut got = key.modifiers & mask;
        // Shift only changes the case of a character key.
        if matches!(key.code, KeyCode::Char(_)) {
            wanted.remove(KeyModifiers::SHIFT);
            got.remove(KeyModifiers::SHIFT);
        }
        code_matches && wanted == got
    }
}

impl FromStr for KeyChord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = KeyModifiers::NONE;
        let mut code = None;

        for part in s.split('+').map(|p| p.trim().to_lowercase()) {
            match part.as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                key if code.is_none() => code = Some(parse_key(key)?),
                _ => return Err(format!("Invalid key chord: {}", s)),
            }
        }

        match code {
            Some(code) => Ok(Self { code, modifiers }),
            None => Err(format!("Key chord has no key: {}", s)),
        }
    }
}

fn parse_key(key: &str) -> Result<KeyCode, String> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    match key {
        "esc" | "escape" => Ok(KeyCode::Esc),
        "enter" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "space" => Ok(KeyCode::Char(' ')),
        f if f.starts_with('f') => f[1..]
            .parse::<u8>()
            .map(KeyCode::F)
            .map_err(|_| format!("Invalid key: {}", key)),
        _ => Err(format!("Invalid key: {}", key)),
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_lowercase()),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Esc => write!(f, "Esc"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Tab => write!(f, "Tab"),
            other => write!(f, "{:?}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutsConfig {
    #[serde(default = "default_focus_search")]
    pub focus_search: String,
    #[serde(default = "default_select_visible")]
    pub select_visible: String,
    #[serde(default = "default_deselect_visible")]
    pub deselect_visible: String,
}

fn default_focus_search() -> String {
    "ctrl+k".to_string()
}

fn default_select_visible() -> String {
    "ctrl+s".to_string()
}

fn default_deselect_visible() -> String {
    "ctrl+d".to_string()
}

impl Default for ShortcutsConfig {
    fn default() -> Self {
        Self {
            focus_search: default_focus_search(),
            select_visible: default_select_visible(),
            deselect_visible: default_deselect_visible(),
        }
    }
}

/// Resolved chord for each shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutMap {
    bindings: Vec<(KeyChord, Shortcut)>,
}

impl Shortcut {
    pub const ALL: [Shortcut; 3] = [
        Shortcut::FocusSearch,
        Shortcut::SelectVisible,
        Shortcut::DeselectVisible,
    ];

    pub fn default_chord(self) -> KeyChord {
        match self {
            Shortcut::FocusSearch => KeyChord::ctrl('k'),
            Shortcut::SelectVisible => KeyChord::ctrl('s'),
            Shortcut::DeselectVisible => KeyChord::ctrl('d'),
        }
    }
}

impl ShortcutMap {
    /// Resolve the configured chords. A chord that fails to parse, has no
    /// Ctrl/Alt modifier or is already taken falls back to the shortcut's
    /// default. If the result still has two shortcuts on one chord, every
    /// shortcut gets its default.
    pub fn from_config(config: &ShortcutsConfig) -> Self {
        let entries = [
            (&config.focus_search, Shortcut::FocusSearch),
            (&config.select_visible, Shortcut::SelectVisible),
            (&config.deselect_visible, Shortcut::DeselectVisible),
        ];

        let mut bindings: Vec<(KeyChord, Shortcut)> = Vec::with_capacity(entries.len());
        for (configured, shortcut) in entries {
            let fallback = shortcut.default_chord();
            let chord = match configured.parse::<KeyChord>() {
                Err(e) => {
                    warn!("{e}, using {fallback}");
                    fallback
                }
                Ok(chord) if !chord.is_bindable() => {
                    warn!(?shortcut, "{chord} needs Ctrl or Alt, using {fallback}");
                    fallback
                }
                Ok(chord) if bindings.iter().any(|(taken, _)| taken.overlaps(&chord)) => {
                    warn!(?shortcut, "{chord} is already bound, using {fallback}");
                    fallback
                }
                Ok(chord) => chord,
            };
            bindings.push((chord, shortcut));
        }

        let conflict = bindings
            .iter()
            .enumerate()
            .any(|(i, (a, _))| bindings[i + 1..].iter().any(|(b, _)| a.overlaps(b)));
        if conflict {
            warn!("Conflicting shortcut chords, using the defaults");
            return Self::defaults();
        }

        Self { bindings }
    }

    fn defaults() -> Self {
        Self {
            bindings: Shortcut::ALL
                .into_iter()
                .map(|shortcut| (shortcut.default_chord(), shortcut))
                .collect(),
        }
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<Shortcut> {
        self.bindings
            .iter()
            .find(|(chord, _)| chord.matches(key))
            .map(|(_, shortcut)| *shortcut)
    }

    pub fn chord_for(&self, shortcut: Shortcut) -> Option<KeyChord> {
        self.bindings
            .iter()
            .find(|(_, s)| *s == shortcut)
            .map(|(chord, _)| *chord)
    }
}

impl Default for ShortcutMap {
    fn default() -> Self {
        Self::defaults()
    }
}

#[derive(Debug, Default)]
struct RouterSlot {
    active: Option<u64>,
    next_id: u64,
}

/// Identifies which binding a routed shortcut belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingId(u64);

/// Application-wide shortcut router. Cloning shares the same slot.
#[derive(Debug, Clone)]
pub struct ShortcutRouter {
    map: Rc<ShortcutMap>,
    slot: Rc<RefCell<RouterSlot>>,
}

impl ShortcutRouter {
    pub fn new(map: ShortcutMap) -> Self {
        Self {
            map: Rc::new(map),
            slot: Rc::new(RefCell::new(RouterSlot::default())),
        }
    }

    pub fn map(&self) -> &ShortcutMap {
        &self.map
    }

    /// Install a binding, replacing whatever binding was active.
    pub fn bind(&self) -> ShortcutBinding {
        let mut slot = self.slot.borrow_mut();
        slot.next_id += 1;
        let id = slot.next_id;
        if let Some(previous) = slot.active.replace(id) {
            trace!(previous, id, "Replacing shortcut binding");
        }
        ShortcutBinding {
            id,
            slot: Rc::clone(&self.slot),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.slot.borrow().active.is_some()
    }

    /// Resolve `key` against the active binding. `None` means the key was not
    /// intercepted and should be handled normally.
    pub fn route(&self, key: &KeyEvent) -> Option<(BindingId, Shortcut)> {
        let active = self.slot.borrow().active?;
        let shortcut = self.map.lookup(key)?;
        trace!(?shortcut, binding = active, "Routed shortcut");
        Some((BindingId(active), shortcut))
    }
}

impl Default for ShortcutRouter {
    fn default() -> Self {
        Self::new(ShortcutMap::default())
    }
}

/// Guard for an installed binding. Unbinds on drop unless a newer binding
/// has replaced it already.
#[derive(Debug)]
pub struct ShortcutBinding {
    id: u64,
    slot: Rc<RefCell<RouterSlot>>,
}

impl ShortcutBinding {
    pub fn id(&self) -> BindingId {
        BindingId(self.id)
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.slot.borrow().active == Some(self.id)
    }
}

impl Drop for ShortcutBinding {
    fn drop(&mut self) {
        let mut slot = self.slot.borrow_mut();
        if slot.active == Some(self.id) {
            slot.active = None;
            trace!(binding = self.id, "Shortcut binding released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::panic::{self, AssertUnwindSafe};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_parse_chords() {
        assert_eq!("ctrl+k".parse::<KeyChord>(), Ok(KeyChord::ctrl('k')));
        assert_eq!(
            "Alt+Shift+F2".parse::<KeyChord>(),
            Ok(KeyChord {
                code: KeyCode::F(2),
                modifiers: KeyModifiers::ALT | KeyModifiers::SHIFT,
            })
        );
        assert!("ctrl+".parse::<KeyChord>().is_err());
        assert!("ctrl+k+j".parse::<KeyChord>().is_err());
        assert!("ctrl+bogus".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_chord_display() {
        assert_eq!(KeyChord::ctrl('k').to_string(), "Ctrl+k");
    }

    #[test]
    fn test_chord_matching_ignores_case_but_not_ctrl() {
        let chord = KeyChord::ctrl('k');
        assert!(chord.matches(&ctrl('k')));
        assert!(chord.matches(&key(
            KeyCode::Char('K'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(!chord.matches(&key(KeyCode::Char('k'), KeyModifiers::NONE)));
        assert!(!chord.matches(&key(
            KeyCode::Char('k'),
            KeyModifiers::CONTROL | KeyModifiers::ALT
        )));
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let config = ShortcutsConfig {
            focus_search: "ctrl+nonsense".to_string(),
            ..Default::default()
        };
        let map = ShortcutMap::from_config(&config);
        assert_eq!(map.chord_for(Shortcut::FocusSearch), Some(KeyChord::ctrl('k')));
    }

    #[test]
    fn test_reused_chord_falls_back_to_default() {
        let config = ShortcutsConfig {
            focus_search: "ctrl+s".to_string(),
            select_visible: "ctrl+s".to_string(),
            ..Default::default()
        };
        let map = ShortcutMap::from_config(&config);
        // Select-visible's default is taken too, so the whole map reverts.
        assert_eq!(map, ShortcutMap::default());
        assert_eq!(map.lookup(&ctrl('s')), Some(Shortcut::SelectVisible));
        assert_eq!(map.lookup(&ctrl('k')), Some(Shortcut::FocusSearch));
    }

    #[test]
    fn test_reused_chord_takes_free_default() {
        let config = ShortcutsConfig {
            focus_search: "ctrl+f".to_string(),
            select_visible: "ctrl+shift+f".to_string(),
            ..Default::default()
        };
        let map = ShortcutMap::from_config(&config);
        assert_eq!(map.lookup(&ctrl('f')), Some(Shortcut::FocusSearch));
        assert_eq!(map.chord_for(Shortcut::SelectVisible), Some(KeyChord::ctrl('s')));
    }

    #[test]
    fn test_bare_letter_falls_back_to_default() {
        let config = ShortcutsConfig {
            deselect_visible: "k".to_string(),
            ..Default::default()
        };
        let map = ShortcutMap::from_config(&config);
        assert_eq!(map.lookup(&key(KeyCode::Char('k'), KeyModifiers::NONE)), None);
        assert_eq!(map.lookup(&ctrl('d')), Some(Shortcut::DeselectVisible));
    }

    #[test]
    fn test_function_keys_and_alt_are_bindable() {
        let config = ShortcutsConfig {
            focus_search: "f2".to_string(),
            select_visible: "alt+a".to_string(),
            ..Default::default()
        };
        let map = ShortcutMap::from_config(&config);
        assert_eq!(
            map.lookup(&key(KeyCode::F(2), KeyModifiers::NONE)),
            Some(Shortcut::FocusSearch)
        );
        assert_eq!(
            map.lookup(&key(KeyCode::Char('a'), KeyModifiers::ALT)),
            Some(Shortcut::SelectVisible)
        );
        assert!(!"shift+k".parse::<KeyChord>().unwrap().is_bindable());
    }

    #[test]
    fn test_default_map() {
        let map = ShortcutMap::default();
        assert_eq!(map.lookup(&ctrl('k')), Some(Shortcut::FocusSearch));
        assert_eq!(map.lookup(&ctrl('s')), Some(Shortcut::SelectVisible));
        assert_eq!(map.lookup(&ctrl('d')), Some(Shortcut::DeselectVisible));
        assert_eq!(map.lookup(&ctrl('x')), None);
    }

    #[test]
    fn test_unbound_router_routes_nothing() {
        let router = ShortcutRouter::default();
        assert!(!router.is_bound());
        assert_eq!(router.route(&ctrl('k')), None);
    }

    #[test]
    fn test_bound_router_routes_to_binding() {
        let router = ShortcutRouter::default();
        let binding = router.bind();
        assert_eq!(
            router.route(&ctrl('s')),
            Some((binding.id(), Shortcut::SelectVisible))
        );
        assert_eq!(router.route(&key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_drop_unbinds() {
        let router = ShortcutRouter::default();
        let binding = router.bind();
        drop(binding);
        assert!(!router.is_bound());
        assert_eq!(router.route(&ctrl('k')), None);
    }

    #[test]
    fn test_rebind_replaces_and_stale_drop_is_harmless() {
        let router = ShortcutRouter::default();
        let first = router.bind();
        let second = router.bind();
        assert!(!first.is_active());
        assert!(second.is_active());

        let routed = router.route(&ctrl('d')).unwrap();
        assert_eq!(routed.0, second.id());

        drop(first);
        assert!(router.is_bound());
        assert!(second.is_active());

        drop(second);
        assert!(!router.is_bound());
    }

    #[test]
    fn test_unwinding_releases_binding() {
        let router = ShortcutRouter::default();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _binding = router.bind();
            panic!("modal crashed");
        }));
        assert!(result.is_err());
        assert!(!router.is_bound());
    }
}
