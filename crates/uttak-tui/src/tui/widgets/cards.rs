// Shared row rendering for the team and potential panels.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::layout::Rect;
use ratatui::Frame;

use uttak_core::drag::DragSource;
use uttak_core::player::Player;

use crate::tui::panels::{cursor, rows, Panel, PanelRow};
use crate::tui::ViewState;

/// Style for a card that is currently picked up.
pub fn dragged_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Whether `player` is the card being dragged.
pub fn is_dragged(player: &Player, dragging: Option<&DragSource>) -> bool {
    dragging.is_some_and(|s| s.name() == player.name)
}

/// One player line: registration number, name and desired positions.
pub fn card_line(player: &Player, dragged: bool) -> Line<'static> {
    let style = if dragged {
        dragged_style()
    } else {
        Style::default()
    };
    let mut spans = vec![
        Span::styled(format!("  {:>4} ", player.display_number()), style.fg(Color::Gray)),
        Span::styled(player.name.clone(), style),
    ];
    if !player.desired_positions.is_empty() {
        spans.push(Span::styled(
            format!("  ({})", player.desired_positions),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// A zone header line with the number of cards in the zone.
pub fn header_line(label: &str, count: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            label.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({count})"), Style::default().fg(Color::Gray)),
    ])
}

/// Border style for a panel, brighter when it has focus.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Render a zone/card panel. `header` turns a header row into its line.
pub fn render_panel<F>(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    panel: Panel,
    title: String,
    header: F,
) where
    F: Fn(&PanelRow<'_>) -> Line<'static>,
{
    let dragging = state.dragging.as_ref();
    let items: Vec<ListItem> = rows(state, panel)
        .iter()
        .map(|row| match row.player {
            Some(p) => ListItem::new(card_line(p, is_dragged(p, dragging))),
            None => ListItem::new(header(row)),
        })
        .collect();

    let focused = state.focus == panel;
    let symbol = if focused && dragging.is_some() { "⇥ " } else { "> " };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(symbol);

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(cursor(state, panel)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
