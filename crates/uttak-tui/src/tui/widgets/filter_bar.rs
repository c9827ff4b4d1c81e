// Filter bar widget: search box and the active attribute filters.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let search_style = if state.search_mode {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if state.search_mode { "▏" } else { "" };

    let filters = if state.filters.active_count() == 0 {
        "ingen".to_string()
    } else {
        state.filters.describe()
    };

    let line = Line::from(vec![
        Span::styled("Søk: ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{}{}", state.search_input, cursor), search_style),
        Span::styled("  |  Filter: ", Style::default().fg(Color::Gray)),
        Span::styled(filters, Style::default().fg(Color::Cyan)),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Søk og filter"),
    );
    frame.render_widget(paragraph, area);
}
