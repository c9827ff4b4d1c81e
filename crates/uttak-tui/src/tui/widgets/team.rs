// Team panel: the team area followed by one list per roster position.

use ratatui::layout::Rect;
use ratatui::Frame;

use uttak_core::drag::DropZone;

use super::cards::{header_line, render_panel};
use crate::tui::panels::Panel;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Laget ({})", state.team_size());
    render_panel(frame, area, state, Panel::Team, title, |row| match row.zone {
        DropZone::Position(pos) => {
            let count = state
                .team
                .iter()
                .find(|(p, _)| *p == pos)
                .map_or(0, |(_, ps)| ps.len());
            header_line(pos.label(), count)
        }
        _ => header_line("Slipp her for beste posisjon", state.team_size()),
    });
}
