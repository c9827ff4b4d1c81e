// Available players widget: filtered, sorted table of unassigned players.
//
// Columns: Nr, Navn, Posisjon, Nivå, Kjønn, Født, Student, Lag i fjor.
// The dragged card is highlighted; the cursor row shows when focused.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use uttak_core::player::Player;

use super::cards::{border_style, dragged_style, is_dragged};
use crate::tui::panels::{cursor, Panel};
use crate::tui::ViewState;

/// Render the available players table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("Nr"),
        Cell::from("Navn"),
        Cell::from("Posisjon"),
        Cell::from("Nivå"),
        Cell::from("Kjønn"),
        Cell::from("Født"),
        Cell::from("Student"),
        Cell::from("Lag i fjor"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let dragging = state.dragging.as_ref();
    let rows: Vec<Row> = if state.available.is_empty() {
        vec![Row::new(vec![Cell::from(""), Cell::from("Ingen spillere")])
            .style(Style::default().fg(Color::DarkGray))]
    } else {
        state
            .available
            .iter()
            .map(|p| {
                let style = if is_dragged(p, dragging) {
                    dragged_style()
                } else {
                    Style::default()
                };
                Row::new(player_cells(p)).style(style)
            })
            .collect()
    };

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(12),
    ];

    let focused = state.focus == Panel::Available;
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(build_title(state)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if focused {
        table_state.select(Some(cursor(state, Panel::Available)));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn player_cells(p: &Player) -> Vec<Cell<'static>> {
    vec![
        Cell::from(p.display_number()),
        Cell::from(p.name.clone()),
        Cell::from(p.desired_positions.clone()),
        Cell::from(p.desired_level.clone()),
        Cell::from(short_gender(&p.gender).to_string()),
        Cell::from(p.year.map_or_else(|| "-".to_string(), |y| y.to_string())),
        Cell::from(p.is_student.clone()),
        Cell::from(p.previous_team.clone()),
    ]
}

/// First word of a bilingual gender answer (`Kvinne / Female` -> `Kvinne`).
pub fn short_gender(gender: &str) -> &str {
    gender.split('/').next().unwrap_or("").trim()
}

/// Title with shown/total counts, e.g. `Tilgjengelige (4 av 12)`.
fn build_title(state: &ViewState) -> Line<'static> {
    let shown = state.available.len();
    let total = state.available_total;
    if shown == total {
        Line::from(format!("Tilgjengelige ({total})"))
    } else {
        Line::from(format!("Tilgjengelige ({shown} av {total})"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
