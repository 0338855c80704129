use crate::app::AppState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const MESSAGE_SECS: u64 = 3;

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    if let Some((message, time)) = &state.status_message
        && time.elapsed().as_secs() <= MESSAGE_SECS
    {
        render_status_message(f, message, area);
        return;
    }

    let ty = state.selected_type();
    let left_content = format!(
        " {} | {} | {} selected",
        state.mode,
        ty.title(),
        state.selection(ty).len()
    );
    let nav_hint = "? help  q quit";
    let version_text = format!("catalog {}  v{VERSION}", state.catalog.version());

    let used = left_content.width() + nav_hint.width() + version_text.width() + 3;
    let padding = (area.width as usize).saturating_sub(used);

    let status_line = format!(
        "{} {} {:>padding$}{} ",
        left_content,
        nav_hint,
        "",
        version_text,
        padding = padding
    );

    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);
    let status = Paragraph::new(Line::from(vec![Span::styled(status_line, style)]));

    f.render_widget(status, area);
}

fn render_status_message(f: &mut Frame, message: &str, area: Rect) {
    let display_message = format!(" {message} ");

    let style = Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(0, 100, 0))
        .add_modifier(Modifier::BOLD);

    let padding = (area.width as usize).saturating_sub(display_message.width());
    let status_line = format!("{}{:padding$}", display_message, "", padding = padding);

    let status = Paragraph::new(Line::from(vec![Span::styled(status_line, style)]));
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::tests::test_state;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|f| render(f, state, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_shows_mode_type_and_catalog_version() {
        let state = test_state();
        let line = draw(&state);
        assert!(line.contains("BROWSE | Sigil 1 | 0 selected"));
        assert!(line.contains("catalog 2024.11"));
    }

    #[test]
    fn test_recent_message_replaces_status() {
        let mut state = test_state();
        state.set_status_message("Catalog reloaded".to_string());
        let line = draw(&state);
        assert!(line.contains("Catalog reloaded"));
        assert!(!line.contains("BROWSE"));
    }
}
