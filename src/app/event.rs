use super::modal::ModalFocus;
use super::mode::Mode;
use super::state::AppState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    // Bound shortcuts win over everything else and are consumed here.
    if let Some((binding, shortcut)) = state.shortcuts.route(&key) {
        state.handle_shortcut(binding, shortcut);
        return Ok(());
    }

    if state.show_help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            state.show_help = false;
        }
        return Ok(());
    }

    match state.mode {
        Mode::Browse => handle_browse_mode(key, state)?,
        Mode::Extras => handle_extras_mode(key, state)?,
    }
    Ok(())
}

fn handle_browse_mode(key: KeyEvent, state: &mut AppState) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => quit(state),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => quit(state),
        KeyCode::Down | KeyCode::Char('j') => state.move_type_cursor_down(),
        KeyCode::Up | KeyCode::Char('k') => state.move_type_cursor_up(),
        KeyCode::Enter | KeyCode::Char(' ') => state.open_extras_modal(),
        KeyCode::Char('c') => state.clear_selected_type(),
        KeyCode::Char('p') => state.cycle_profession(),
        KeyCode::Char('m') => state.cycle_main_hand(),
        KeyCode::Char('o') => state.cycle_off_hand(),
        KeyCode::Char('?') => state.show_help = true,
        _ => {}
    }
    Ok(())
}

fn quit(state: &mut AppState) {
    state.should_quit = true;
}

fn handle_extras_mode(key: KeyEvent, state: &mut AppState) -> Result<()> {
    let Some(modal) = state.extras_modal.as_mut() else {
        state.mode = Mode::Browse;
        return Ok(());
    };

    match key.code {
        KeyCode::Esc => {
            state.close_extras_modal();
            return Ok(());
        }
        KeyCode::Tab | KeyCode::BackTab => {
            modal.toggle_focus();
            return Ok(());
        }
        _ => {}
    }

    let focus = modal.focus;
    match focus {
        ModalFocus::Search => handle_search_input(key, state),
        ModalFocus::List => handle_list_input(key, state),
    }
    Ok(())
}

fn handle_search_input(key: KeyEvent, state: &mut AppState) {
    let Some(modal) = state.extras_modal.as_mut() else {
        return;
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Down | KeyCode::Enter => modal.focus_list(),
        KeyCode::Backspace if ctrl || alt => {
            modal.edit_search(|input| input.delete_word());
        }
        KeyCode::Backspace => {
            modal.edit_search(|input| input.backspace());
        }
        KeyCode::Delete => {
            modal.edit_search(|input| input.delete());
        }
        KeyCode::Left => modal.edit_search(|input| input.move_left()),
        KeyCode::Right => modal.edit_search(|input| input.move_right()),
        KeyCode::Home => modal.edit_search(|input| input.move_home()),
        KeyCode::End => modal.edit_search(|input| input.move_end()),
        KeyCode::Char('w') if ctrl => {
            modal.edit_search(|input| input.delete_word());
        }
        KeyCode::Char('u') if ctrl => modal.edit_search(|input| input.clear()),
        KeyCode::Char(c) if !ctrl && !alt => modal.edit_search(|input| input.insert(c)),
        _ => {}
    }
}

fn handle_list_input(key: KeyEvent, state: &mut AppState) {
    let Some(modal) = state.extras_modal.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => modal.move_down(),
        KeyCode::Up | KeyCode::Char('k') => {
            if modal.cursor == 0 {
                modal.focus_search();
            } else {
                modal.move_up();
            }
        }
        KeyCode::Home | KeyCode::Char('g') => modal.move_to_start(),
        KeyCode::End | KeyCode::Char('G') => modal.move_to_end(),
        KeyCode::Char('/') => modal.focus_search(),
        KeyCode::Char('q') => state.close_extras_modal(),
        KeyCode::Char(' ') | KeyCode::Enter => state.toggle_current_item(),
        _ => {}
    }
}
