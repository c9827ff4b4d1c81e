// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Filter Bar (3 rows)                               |
// +-------------------------+------------------------+
// | Available (50%)          | Team (55%)             |
// |                          +------------------------+
// |                          | Potential (45%)        |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for the roster view.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Feed origin, counts and drag indicator.
    pub status_bar: Rect,
    /// Search box and active filters.
    pub filter_bar: Rect,
    pub available: Rect,
    pub team: Rect,
    pub potential: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the roster layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // filter bar
            Constraint::Min(8),    // panels
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        filter_bar: vertical[1],
        available: horizontal[0],
        team: right[0],
        potential: right[1],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
