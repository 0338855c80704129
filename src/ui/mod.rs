pub mod components;
pub mod theme;

use crate::app::{event::handle_key_event, AppState};
use crate::extras::Catalog;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Source of terminal events, so the loop can be driven without a terminal.
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

pub struct RealEventSource;

impl EventSource for RealEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = disable_raw_mode();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();
    }
}

/// A watched file that changed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Catalog,
    Selections,
}

/// Run the interactive UI until the user quits and hand the state back.
///
/// `catalog_path` is reloaded when it changes. `database_path` is the SQLite
/// file shared with the subcommands; selections are re-read when it changes.
pub fn run_tui(
    mut state: AppState,
    catalog_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
) -> Result<AppState> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (change_tx, change_rx) = mpsc::channel();
    let _catalog_watcher = catalog_path
        .as_deref()
        .and_then(|path| setup_file_watcher(path, FileChange::Catalog, change_tx.clone()));
    let _database_watcher = database_path
        .as_deref()
        .and_then(|path| setup_file_watcher(path, FileChange::Selections, change_tx));

    let mut events = RealEventSource;
    let result = run_app(
        &mut terminal,
        &mut state,
        &mut events,
        &change_rx,
        catalog_path.as_deref(),
    );
    terminal.show_cursor()?;

    result.map(|()| state)
}

fn setup_file_watcher(
    path: &Path,
    change: FileChange,
    tx: mpsc::Sender<FileChange>,
) -> Option<RecommendedWatcher> {
    let watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && (event.kind.is_modify() || event.kind.is_create())
            {
                let _ = tx.send(change);
            }
        },
        Config::default(),
    );

    match watcher {
        Ok(mut w) => {
            if w.watch(path, RecursiveMode::NonRecursive).is_ok() {
                debug!(path = %path.display(), ?change, "Watching file");
                Some(w)
            } else {
                warn!(path = %path.display(), ?change, "Could not watch file");
                None
            }
        }
        Err(e) => {
            warn!("Failed to create file watcher: {e}");
            None
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    events: &mut dyn EventSource,
    change_rx: &mpsc::Receiver<FileChange>,
    catalog_path: Option<&Path>,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            components::render(f, state);
        })?;

        pump(state, events, change_rx, catalog_path)?;

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// One turn of the event loop: handle at most one terminal event, then apply
/// any pending file changes.
pub fn pump(
    state: &mut AppState,
    events: &mut dyn EventSource,
    change_rx: &mpsc::Receiver<FileChange>,
    catalog_path: Option<&Path>,
) -> Result<()> {
    if let Some(Event::Key(key)) = events.poll(POLL_INTERVAL)?
        && key.kind == KeyEventKind::Press
    {
        handle_key_event(key, state)?;
    }

    let mut reload_catalog_file = false;
    let mut refresh_selections = false;
    while let Ok(change) = change_rx.try_recv() {
        match change {
            FileChange::Catalog => reload_catalog_file = true,
            FileChange::Selections => refresh_selections = true,
        }
    }
    if reload_catalog_file && let Some(path) = catalog_path {
        reload_catalog(state, path);
    } else if refresh_selections {
        // A catalog reload re-reads selections too.
        state.refresh_all_snapshots();
    }

    Ok(())
}

fn reload_catalog(state: &mut AppState, path: &Path) {
    match Catalog::load(path) {
        Ok(catalog) => state.reload_catalog(catalog),
        Err(e) => {
            // Keep the last good catalog.
            warn!(path = %path.display(), "Failed to reload catalog: {e:#}");
            state.set_status_message(format!("Catalog reload failed: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::tests::test_state;
    use crate::extras::{ExtraType, ExtrasStore, ItemId};
    use crate::i18n::Translations;
    use crate::shortcuts::ShortcutRouter;
    use crate::storage::SqliteStore;
    use theme::Theme;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use std::collections::VecDeque;
    use std::fs;

    struct FakeEvents {
        events: VecDeque<Event>,
    }

    impl EventSource for FakeEvents {
        fn poll(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.events.pop_front())
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn drain(state: &mut AppState, events: &mut FakeEvents, rx: &mpsc::Receiver<FileChange>) {
        while !events.events.is_empty() {
            pump(state, events, rx, None).unwrap();
        }
    }

    #[test]
    fn test_headless_select_visible_flow() {
        let mut state = test_state();
        let (_tx, rx) = mpsc::channel();

        let mut queue = VecDeque::new();
        // Relics sit three rows below the first sigil slot.
        for _ in 0..3 {
            queue.push_back(press(KeyCode::Char('j'), KeyModifiers::NONE));
        }
        queue.push_back(press(KeyCode::Enter, KeyModifiers::NONE));
        for c in "monk".chars() {
            queue.push_back(press(KeyCode::Char(c), KeyModifiers::NONE));
        }
        queue.push_back(press(KeyCode::Char('s'), KeyModifiers::CONTROL));
        queue.push_back(press(KeyCode::Esc, KeyModifiers::NONE));
        let mut events = FakeEvents { events: queue };

        drain(&mut state, &mut events, &rx);

        assert!(state.extras_modal.is_none());
        assert_eq!(state.selection(ExtraType::Relics), &[ItemId::new("relic-monk")]);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut state = test_state();
        let (_tx, rx) = mpsc::channel();
        let mut events = FakeEvents {
            events: VecDeque::from([Event::Key(KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Release,
                state: KeyEventState::NONE,
            })]),
        };

        drain(&mut state, &mut events, &rx);
        assert!(state.extras_modal.is_none());
    }

    #[test]
    fn test_catalog_change_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"version": "edited", "extras": {}}"#).unwrap();

        let mut state = test_state();
        let (tx, rx) = mpsc::channel();
        let mut events = FakeEvents {
            events: VecDeque::new(),
        };
        tx.send(FileChange::Catalog).unwrap();
        tx.send(FileChange::Catalog).unwrap();

        pump(&mut state, &mut events, &rx, Some(&path)).unwrap();
        assert_eq!(state.catalog.version(), "edited");
    }

    #[test]
    fn test_broken_catalog_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();

        let mut state = test_state();
        let before = state.catalog.version().to_string();
        let (tx, rx) = mpsc::channel();
        let mut events = FakeEvents {
            events: VecDeque::new(),
        };
        tx.send(FileChange::Catalog).unwrap();

        pump(&mut state, &mut events, &rx, Some(&path)).unwrap();
        assert_eq!(state.catalog.version(), before);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_database_change_refreshes_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selections.db");
        let mut state = AppState::new(
            Catalog::bundled().unwrap(),
            Box::new(SqliteStore::open(&path).unwrap()),
            Translations::default(),
            Theme::default(),
            ShortcutRouter::default(),
            None,
        );
        let mut other = SqliteStore::open(&path).unwrap();
        other
            .write(ExtraType::Relics, &[ItemId::new("relic-monk")])
            .unwrap();
        assert!(state.selection(ExtraType::Relics).is_empty());

        let (tx, rx) = mpsc::channel();
        let mut events = FakeEvents {
            events: VecDeque::new(),
        };
        tx.send(FileChange::Selections).unwrap();

        pump(&mut state, &mut events, &rx, None).unwrap();
        assert_eq!(state.selection(ExtraType::Relics), &[ItemId::new("relic-monk")]);
    }
}
