// Status bar widget: feed origin, player counts, sort order, drag indicator.

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use uttak_app::feed::FeedOrigin;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [origin indicator] [counts] [sort] [dragged card]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, color) = origin_indicator(state.origin);
    spans.push(Span::styled(format!(" {} ", dot), Style::default().fg(color)));
    spans.push(Span::styled(
        origin_text(state.origin, state.fetched_at),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!(
            "{} påmeldte, {} på laget, {} potensielle",
            state.player_count,
            state.team_size(),
            state.potential_size()
        ),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("Sortering: {}", state.sort.label()),
        Style::default().fg(Color::White),
    ));

    if let Some(source) = &state.dragging {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("Flytter {}", source.name()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Dot and color for where the player list came from.
pub fn origin_indicator(origin: Option<FeedOrigin>) -> (&'static str, Color) {
    match origin {
        Some(FeedOrigin::Sheet) => ("●", Color::Green),
        Some(FeedOrigin::Cache) => ("●", Color::Cyan),
        Some(FeedOrigin::Fallback) => ("●", Color::Yellow),
        None => ("○", Color::Gray),
    }
}

pub fn origin_text(origin: Option<FeedOrigin>, fetched_at: Option<DateTime<Utc>>) -> String {
    let source = match origin {
        Some(FeedOrigin::Sheet) => "Regneark",
        Some(FeedOrigin::Cache) => "Mellomlager",
        Some(FeedOrigin::Fallback) => "Eksempeldata",
        None => "Laster",
    };
    match fetched_at {
        Some(at) => format!(
            "{} (hentet {})",
            source,
            at.with_timezone(&Local).format("%d.%m %H:%M")
        ),
        None => source.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
