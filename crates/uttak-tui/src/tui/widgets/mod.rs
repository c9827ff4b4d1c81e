// TUI widget modules for each roster screen zone.

pub mod available;
pub mod cards;
pub mod filter_bar;
pub mod help_bar;
pub mod login;
pub mod notifications;
pub mod potential;
pub mod quit_confirm;
pub mod status_bar;
pub mod team;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}
