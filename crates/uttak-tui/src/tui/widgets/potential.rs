// Potential panel: players under consideration, grouped by position bucket.

use ratatui::layout::Rect;
use ratatui::Frame;

use uttak_core::drag::DropZone;

use super::cards::{header_line, render_panel};
use crate::tui::panels::Panel;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Potensielle ({})", state.potential_size());
    render_panel(frame, area, state, Panel::Potential, title, |row| match row.zone {
        DropZone::PotentialBucket(bucket) => {
            let count = state
                .potential
                .iter()
                .find(|(b, _)| *b == bucket)
                .map_or(0, |(_, ps)| ps.len());
            let label = match bucket.position() {
                Some(pos) => pos.label(),
                None => "Ukjent posisjon",
            };
            header_line(label, count)
        }
        _ => header_line("Slipp her for ønsket posisjon", state.potential_size()),
    });
}
