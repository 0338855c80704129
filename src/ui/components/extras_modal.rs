use super::centered_rect;
use crate::app::modal::ModalFocus;
use crate::app::AppState;
use crate::i18n::{Translate, SECTION_KEY, SUB_TEXT_KEY};
use crate::shortcuts::Shortcut;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Render the open extras modal, if any.
pub fn render(f: &mut Frame, state: &mut AppState) {
    let Some(modal) = state.extras_modal.as_ref() else {
        return;
    };
    let theme = &state.theme;
    let area = centered_rect(70, 80, f.area());

    let selected_count = state.selection(modal.extra_type).len();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(format!(
            " {} ({} selected) ",
            modal.extra_type.title(),
            selected_count
        ))
        .title_bottom(Line::from(" Tab switch focus  Space toggle  Esc close ").centered())
        .style(Style::default().bg(theme.background));

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Length(1), // Bulk hints
            Constraint::Min(1),    // Items
        ])
        .split(inner);

    render_search(f, state, chunks[0]);
    render_hints(f, state, chunks[1]);
    render_items(f, state, chunks[2]);
}

fn chord_label(state: &AppState, shortcut: Shortcut) -> String {
    state
        .shortcuts
        .map()
        .chord_for(shortcut)
        .map(|chord| chord.to_string())
        .unwrap_or_default()
}

fn render_search(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(modal) = state.extras_modal.as_ref() else {
        return;
    };
    let focused = modal.focus == ModalFocus::Search;
    let border_color = if focused {
        state.theme.border
    } else {
        state.theme.dim
    };

    let input = Paragraph::new(modal.search().as_str().to_string())
        .style(Style::default().fg(state.theme.foreground))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(format!(
                    " Search {} ",
                    chord_label(state, Shortcut::FocusSearch)
                )),
        );
    f.render_widget(input, area);

    if focused {
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1 + modal.search().cursor_column()).min(max_x);
        f.set_cursor_position((x, area.y + 1));
    }
}

fn render_hints(f: &mut Frame, state: &AppState, area: Rect) {
    let key_style = Style::default()
        .fg(state.theme.key_hint)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(state.theme.dim);

    let line = Line::from(vec![
        Span::styled(" Select visible ", desc_style),
        Span::styled(chord_label(state, Shortcut::SelectVisible), key_style),
        Span::styled("   Delete visible ", desc_style),
        Span::styled(chord_label(state, Shortcut::DeselectVisible), key_style),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_items(f: &mut Frame, state: &mut AppState, area: Rect) {
    let Some(modal) = state.extras_modal.as_ref() else {
        return;
    };
    let theme = &state.theme;

    if modal.visible_count() == 0 {
        let message = Paragraph::new(Line::from(Span::styled(
            format!(" No matches for \"{}\"", modal.search().as_str()),
            Style::default().fg(theme.dim),
        )));
        f.render_widget(message, area);
        return;
    }

    let header_style = Style::default()
        .fg(theme.section_header)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(theme.dim);

    let mut rows: Vec<ListItem> = Vec::new();
    let mut cursor_row = None;
    let mut item_index = 0;

    for section in modal.filtered().non_empty_sections() {
        rows.push(ListItem::new(Line::from(Span::styled(
            format!(" {}", state.translations.translate(SECTION_KEY, &section.name)),
            header_style,
        ))));

        for item in &section.items {
            if item_index == modal.cursor {
                cursor_row = Some(rows.len());
            }
            item_index += 1;

            let checked = state.is_selected(modal.extra_type, &item.id);
            let (mark, mark_style) = if checked {
                ("[x] ", Style::default().fg(theme.checked))
            } else {
                ("[ ] ", dim_style)
            };

            let mut spans = vec![
                Span::raw("   "),
                Span::styled(mark, mark_style),
                Span::styled(
                    item.display_text().to_string(),
                    Style::default().fg(theme.foreground),
                ),
                Span::styled(format!(" ({})", item.gw2id), dim_style),
            ];
            if let Some(sub_text) = &item.sub_text {
                spans.push(Span::styled(
                    format!("  {}", state.translations.translate(SUB_TEXT_KEY, sub_text)),
                    dim_style,
                ));
            }
            rows.push(ListItem::new(Line::from(spans)));
        }
    }

    let list_focused = modal.focus == ModalFocus::List;
    let highlight = if list_focused {
        Style::default()
            .bg(theme.highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let list = List::new(rows).highlight_style(highlight);

    if let Some(modal) = state.extras_modal.as_mut() {
        modal.list_state.select(cursor_row);
        f.render_stateful_widget(list, area, &mut modal.list_state);
    }
}
