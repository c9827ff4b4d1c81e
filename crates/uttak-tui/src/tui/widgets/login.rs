// Login view: password prompt shown while the coach gate is closed.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Uttak: logg inn ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Passord: "),
            Span::styled(
                format!("{}▏", mask(&state.password_input)),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
    ];
    if state.login_rejected {
        lines.push(Line::from(Span::styled(
            "  Feil passord, prøv igjen",
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  Enter:logg inn  Esc:tøm/avslutt",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

/// One `*` per typed character.
pub fn mask(input: &str) -> String {
    "*".repeat(input.chars().count())
}
