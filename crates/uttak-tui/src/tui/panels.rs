// Roster panels as flat row lists.
//
// Every panel is rendered and navigated as a list of rows. Each row belongs to
// a drop zone; player rows can also be picked up. The keyboard drag gesture
// picks up the player under the cursor and drops it on the zone of whatever
// row the cursor is on when Enter is pressed.

use uttak_core::drag::{DragSource, DropZone};
use uttak_core::player::Player;

use super::ViewState;

/// The three lists on the roster screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Available,
    Team,
    Potential,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Available, Panel::Team, Panel::Potential];

    pub fn next(self) -> Panel {
        match self {
            Panel::Available => Panel::Team,
            Panel::Team => Panel::Potential,
            Panel::Potential => Panel::Available,
        }
    }

    pub fn prev(self) -> Panel {
        match self {
            Panel::Available => Panel::Potential,
            Panel::Team => Panel::Available,
            Panel::Potential => Panel::Team,
        }
    }
}

/// One line of a panel: a zone header (`player == None`) or a player card.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow<'a> {
    pub zone: DropZone,
    pub player: Option<&'a Player>,
}

impl PanelRow<'_> {
    fn header(zone: DropZone) -> Self {
        PanelRow { zone, player: None }
    }
}

/// Rows of `panel` in display order. Never empty, so the cursor always has
/// a drop zone under it.
pub fn rows(state: &ViewState, panel: Panel) -> Vec<PanelRow<'_>> {
    match panel {
        Panel::Available => {
            if state.available.is_empty() {
                return vec![PanelRow::header(DropZone::Available)];
            }
            state
                .available
                .iter()
                .map(|p| PanelRow {
                    zone: DropZone::Available,
                    player: Some(p),
                })
                .collect()
        }
        Panel::Team => {
            let mut out = vec![PanelRow::header(DropZone::TeamArea)];
            for (pos, players) in &state.team {
                let zone = DropZone::Position(*pos);
                out.push(PanelRow::header(zone));
                out.extend(players.iter().map(|p| PanelRow {
                    zone,
                    player: Some(p),
                }));
            }
            out
        }
        Panel::Potential => {
            let mut out = vec![PanelRow::header(DropZone::PotentialArea)];
            for (bucket, players) in &state.potential {
                let zone = DropZone::PotentialBucket(*bucket);
                out.push(PanelRow::header(zone));
                out.extend(players.iter().map(|p| PanelRow {
                    zone,
                    player: Some(p),
                }));
            }
            out
        }
    }
}

/// Cursor position in `panel`, clamped to its rows.
pub fn cursor(state: &ViewState, panel: Panel) -> usize {
    let len = rows(state, panel).len();
    state
        .cursors
        .get(&panel)
        .copied()
        .unwrap_or(0)
        .min(len.saturating_sub(1))
}

/// Move the cursor of the focused panel by `delta` rows.
pub fn move_cursor(state: &mut ViewState, delta: isize) {
    let panel = state.focus;
    let len = rows(state, panel).len();
    let current = cursor(state, panel) as isize;
    let next = (current + delta).clamp(0, len.saturating_sub(1) as isize);
    state.cursors.insert(panel, next as usize);
}

/// The row under the cursor of the focused panel.
pub fn focused_row(state: &ViewState) -> Option<PanelRow<'_>> {
    let idx = cursor(state, state.focus);
    rows(state, state.focus).into_iter().nth(idx)
}

/// The drag source for picking up the player under the cursor, if any.
pub fn pick_up_source(state: &ViewState) -> Option<DragSource> {
    let player = focused_row(state)?.player?;
    let name = player.name.clone();
    Some(match state.focus {
        Panel::Available => DragSource::Available(name),
        Panel::Team => DragSource::Team(name),
        Panel::Potential => DragSource::Potential(name),
    })
}

/// The drop-zone id under the cursor of the focused panel.
pub fn drop_target(state: &ViewState) -> Option<String> {
    focused_row(state).map(|row| row.zone.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uttak_core::position::{Bucket, Position};

    fn state_with_team() -> ViewState {
        let mut state = ViewState::default();
        state.available = vec![Player::named("A"), Player::named("B")];
        state.team = Position::ALL.iter().map(|p| (*p, Vec::new())).collect();
        state.team[Position::Legger.sort_order()].1 = vec![Player::named("L")];
        state.potential = Bucket::ALL.iter().map(|b| (*b, Vec::new())).collect();
        state
    }

    #[test]
    fn team_rows_have_area_and_position_headers() {
        let state = state_with_team();
        let rows = rows(&state, Panel::Team);
        // area + 5 headers + 1 player
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].zone, DropZone::TeamArea);
        let legger = rows.iter().position(|r| r.player.is_some()).unwrap();
        assert_eq!(rows[legger].zone, DropZone::Position(Position::Legger));
        assert_eq!(rows[legger - 1].player, None);
    }

    #[test]
    fn empty_available_still_has_a_drop_row() {
        let state = ViewState::default();
        let rows = rows(&state, Panel::Available);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].zone, DropZone::Available);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut state = state_with_team();
        move_cursor(&mut state, 10);
        assert_eq!(cursor(&state, Panel::Available), 1);
        move_cursor(&mut state, -10);
        assert_eq!(cursor(&state, Panel::Available), 0);
    }

    #[test]
    fn pick_up_uses_focused_panel() {
        let mut state = state_with_team();
        assert_eq!(
            pick_up_source(&state),
            Some(DragSource::Available("A".into()))
        );

        state.focus = Panel::Team;
        assert_eq!(pick_up_source(&state), None);
        let idx = rows(&state, Panel::Team)
            .iter()
            .position(|r| r.player.is_some())
            .unwrap();
        state.cursors.insert(Panel::Team, idx);
        assert_eq!(pick_up_source(&state), Some(DragSource::Team("L".into())));
        assert_eq!(drop_target(&state).as_deref(), Some("position:Legger"));
    }

    #[test]
    fn panel_cycle_round_trips() {
        for panel in Panel::ALL {
            assert_eq!(panel.next().prev(), panel);
        }
    }
}
