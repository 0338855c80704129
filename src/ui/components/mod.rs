pub mod extras_modal;
pub mod status_bar;

use crate::app::AppState;
use crate::extras::ExtraType;
use crate::i18n::humanize;
use crate::shortcuts::Shortcut;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, state: &mut AppState) {
    state.terminal_height = f.area().height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Weapons
            Constraint::Min(1),    // Extra types
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_weapons(f, state, chunks[0]);
    render_extra_types(f, state, chunks[1]);
    status_bar::render(f, state, chunks[2]);

    extras_modal::render(f, state);

    if state.show_help {
        render_help_overlay(f, state);
    }
}

fn render_weapons(f: &mut Frame, state: &AppState, area: Rect) {
    let label_style = Style::default().fg(state.theme.dim);
    let value_style = Style::default()
        .fg(state.theme.foreground)
        .add_modifier(Modifier::BOLD);
    let weapons = &state.weapons;
    let none = || "-".to_string();

    let off_hand = if weapons.can_offhand(state.catalog.professions()) {
        Span::styled(weapons.off_hand.clone().unwrap_or_else(none), value_style)
    } else {
        Span::styled("two-handed", Style::default().fg(state.theme.dim))
    };

    let line = Line::from(vec![
        Span::styled(" Profession ", label_style),
        Span::styled(
            weapons.profession.as_deref().map(humanize).unwrap_or_else(none),
            value_style,
        ),
        Span::styled("   Main hand ", label_style),
        Span::styled(weapons.main_hand.clone().unwrap_or_else(none), value_style),
        Span::styled("   Off hand ", label_style),
        off_hand,
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Weapons (p/m/o) ")
            .border_style(Style::default().fg(state.theme.dim)),
    );
    f.render_widget(paragraph, area);
}

fn render_extra_types(f: &mut Frame, state: &AppState, area: Rect) {
    let items: Vec<ListItem> = ExtraType::ALL
        .iter()
        .map(|ty| {
            let count = state.selection(*ty).len();
            let count_style = if count > 0 {
                Style::default().fg(state.theme.checked)
            } else {
                Style::default().fg(state.theme.dim)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<14}", ty.title()),
                    Style::default().fg(state.theme.foreground),
                ),
                Span::styled(format!("{count} selected"), count_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Extras ")
                .border_style(Style::default().fg(state.theme.border)),
        )
        .highlight_style(
            Style::default()
                .bg(state.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.type_cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_help_overlay(f: &mut Frame, state: &AppState) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(state.theme.foreground);
    let section_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let chord = |shortcut: Shortcut| {
        state
            .shortcuts
            .map()
            .chord_for(shortcut)
            .map(|c| c.to_string())
            .unwrap_or_default()
    };
    let entry = |key: String, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("    {key:<16}"), key_style),
            Span::styled(desc, desc_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("  ── Main screen ──", section_style)),
        entry("j / ↓, k / ↑".into(), "Move between extra types"),
        entry("Enter".into(), "Pick extras for the type"),
        entry("c".into(), "Clear the type's selection"),
        entry("p / m / o".into(), "Cycle profession, main hand, off hand"),
        entry("q".into(), "Quit"),
        Line::from(""),
        Line::from(Span::styled("  ── Extras picker ──", section_style)),
        entry("Tab".into(), "Switch between search and list"),
        entry("Space / Enter".into(), "Toggle item"),
        entry(chord(Shortcut::FocusSearch), "Focus search"),
        entry(chord(Shortcut::SelectVisible), "Select all visible items"),
        entry(chord(Shortcut::DeselectVisible), "Deselect all visible items"),
        entry("Esc".into(), "Close picker"),
    ];

    let area = centered_rect(60, 60, f.area());
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .title_bottom(Line::from(" Esc close ").centered())
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
