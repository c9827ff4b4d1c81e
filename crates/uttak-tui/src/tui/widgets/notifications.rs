// Notification overlay: active notifications stacked in the top-right corner.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use uttak_app::protocol::NotificationView;
use uttak_core::notify::Severity;

const WIDTH: u16 = 52;

pub fn render(frame: &mut Frame, area: Rect, notifications: &[NotificationView]) {
    if notifications.is_empty() {
        return;
    }
    let rect = overlay_rect(area, notifications.len());
    frame.render_widget(Clear, rect);

    let lines: Vec<Line> = notifications
        .iter()
        .map(|n| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", n.severity.label()),
                    Style::default()
                        .fg(severity_color(n.severity))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(n.message.clone()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray))
                .title(" x:lukk "),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, rect);
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
    }
}

/// Top-right rectangle tall enough for `count` one-line notifications, just
/// below the status bar.
fn overlay_rect(area: Rect, count: usize) -> Rect {
    let width = WIDTH.min(area.width);
    let height = (count as u16).saturating_add(2).min(area.height.saturating_sub(1));
    Rect::new(
        area.x + area.width - width,
        area.y + area.height.min(1),
        width,
        height,
    )
}
