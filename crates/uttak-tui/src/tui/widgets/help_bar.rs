// Help bar widget: key hints for the current input mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hint_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn hint_text(state: &ViewState) -> String {
    if state.search_mode {
        return " Skriv for å søke | Enter:ferdig | Esc:tøm søk".to_string();
    }
    if state.dragging.is_some() {
        return " Tab/←→:panel | ↑↓:velg mål | Enter:slipp | Esc:slipp utenfor".to_string();
    }
    let mut text = String::from(
        " Space:flytt | /:søk | g s t n p a:filter | c:nullstill | o:sorter | e/E:eksport | r:oppdater | R:tøm | x:lukk",
    );
    if state.requires_login {
        text.push_str(" | L:logg ut");
    }
    text.push_str(" | q:avslutt");
    text
}
