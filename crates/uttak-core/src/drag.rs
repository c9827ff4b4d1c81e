// Drag reconciliation: (source, drop target) pairs to one board operation.

use tracing::{debug, warn};

use crate::board::{Membership, RosterBoard};
use crate::player::Player;
use crate::position::{default_position, Bucket, Position};

/// The card being dragged and the list it was picked up from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    Available(String),
    Team(String),
    Potential(String),
}

impl DragSource {
    pub fn name(&self) -> &str {
        match self {
            DragSource::Available(n) | DragSource::Team(n) | DragSource::Potential(n) => n,
        }
    }

    fn origin(&self) -> &'static str {
        match self {
            DragSource::Available(_) => "available",
            DragSource::Team(_) => "team",
            DragSource::Potential(_) => "potential",
        }
    }

    /// Whether the board still has the player where the gesture claims it
    /// started.
    fn is_current(&self, board: &RosterBoard) -> bool {
        match (self, board.membership(self.name())) {
            (DragSource::Available(_), None) => true,
            (DragSource::Team(_), Some(Membership::Team(_))) => true,
            (DragSource::Potential(_), Some(Membership::Potential(_))) => true,
            _ => false,
        }
    }
}

/// A drop target. Ids are the strings the UI attaches to its drop zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// A specific team position list (`position:<Label>`).
    Position(Position),
    /// The team area outside any position list (`team`).
    TeamArea,
    /// The available list (`available`).
    Available,
    /// The potential area outside any bucket (`potential`).
    PotentialArea,
    /// A specific potential bucket (`potential:<Label>`).
    PotentialBucket(Bucket),
}

impl DropZone {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "team" => return Some(DropZone::TeamArea),
            "available" => return Some(DropZone::Available),
            "potential" => return Some(DropZone::PotentialArea),
            _ => {}
        }
        let (kind, label) = id.split_once(':')?;
        match kind {
            "position" => Position::from_label(label).map(DropZone::Position),
            "potential" => Bucket::from_label(label).map(DropZone::PotentialBucket),
            _ => None,
        }
    }

    pub fn id(&self) -> String {
        match self {
            DropZone::Position(p) => format!("position:{}", p.label()),
            DropZone::TeamArea => "team".to_string(),
            DropZone::Available => "available".to_string(),
            DropZone::PotentialArea => "potential".to_string(),
            DropZone::PotentialBucket(b) => format!("potential:{}", b.label()),
        }
    }
}

/// What a finished gesture did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The board changed; the name of the operation that ran.
    Applied(&'static str),
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl DragOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, DragOutcome::Applied(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    NoTarget,
    UnknownTarget(String),
    StaleSource,
    SamePlace,
    Unsupported,
}

/// Idle/dragging state. Only drives UI affordances; reconciliation does not
/// depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSource),
}

impl DragState {
    pub fn on_drag_start(&mut self, source: DragSource) {
        debug!("drag start: {} from {}", source.name(), source.origin());
        *self = DragState::Dragging(source);
    }

    /// Leave the dragging state and hand back the source, if any.
    pub fn on_drag_end(&mut self) -> Option<DragSource> {
        match std::mem::take(self) {
            DragState::Dragging(source) => Some(source),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn source(&self) -> Option<&DragSource> {
        match self {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }
}

/// Apply the board operation for a finished drag.
///
/// `players` is the current feed; a player missing from it (a name restored
/// from storage after the feed changed) is handled by name only.
pub fn reconcile(
    board: &mut RosterBoard,
    players: &[Player],
    source: &DragSource,
    target: Option<&str>,
) -> DragOutcome {
    let Some(target_id) = target else {
        debug!("drop of {} without target", source.name());
        return DragOutcome::Ignored(IgnoreReason::NoTarget);
    };
    let Some(zone) = DropZone::from_id(target_id) else {
        warn!("drop of {} on unknown zone {:?}", source.name(), target_id);
        return DragOutcome::Ignored(IgnoreReason::UnknownTarget(target_id.to_string()));
    };
    if !source.is_current(board) {
        debug!(
            "stale drag: {} is no longer in {}",
            source.name(),
            source.origin()
        );
        return DragOutcome::Ignored(IgnoreReason::StaleSource);
    }

    let name = source.name();
    let player = players
        .iter()
        .find(|p| p.name == name)
        .cloned()
        .unwrap_or_else(|| Player::named(name));
    let current = board.membership(name);

    let outcome = match (source, zone) {
        (DragSource::Available(_), DropZone::Position(pos)) => {
            board.assign_to_position(&player, pos);
            DragOutcome::Applied("assign_to_position")
        }
        (DragSource::Available(_), DropZone::PotentialArea) => {
            board.add_to_potential(&player);
            DragOutcome::Applied("add_to_potential")
        }
        (DragSource::Available(_), DropZone::PotentialBucket(bucket)) => {
            board.move_potential(name, bucket);
            DragOutcome::Applied("move_potential")
        }
        (DragSource::Available(_), DropZone::TeamArea) => {
            board.assign_to_position(&player, default_position(&player.desired_positions));
            DragOutcome::Applied("assign_to_position")
        }

        (DragSource::Team(_), DropZone::Position(to)) => match current {
            Some(Membership::Team(from)) if from != to => {
                board.move_player(from, name, to);
                DragOutcome::Applied("move")
            }
            _ => DragOutcome::Ignored(IgnoreReason::SamePlace),
        },
        (DragSource::Team(_), DropZone::Available) => match current {
            Some(Membership::Team(from)) => {
                board.unassign(from, name);
                DragOutcome::Applied("unassign")
            }
            _ => DragOutcome::Ignored(IgnoreReason::StaleSource),
        },
        (DragSource::Team(_), DropZone::PotentialArea | DropZone::PotentialBucket(_)) => {
            board.move_to_potential_from_selection(&player);
            DragOutcome::Applied("move_to_potential_from_selection")
        }

        (DragSource::Potential(_), DropZone::Position(pos)) => {
            board.remove_from_potential(name);
            board.assign_to_position(&player, pos);
            DragOutcome::Applied("assign_to_position")
        }
        (DragSource::Potential(_), DropZone::Available) => {
            board.remove_from_potential(name);
            DragOutcome::Applied("remove_from_potential")
        }
        (DragSource::Potential(_), DropZone::PotentialBucket(to)) => match current {
            Some(Membership::Potential(from)) if from != to => {
                board.move_potential(name, to);
                DragOutcome::Applied("move_potential")
            }
            _ => DragOutcome::Ignored(IgnoreReason::SamePlace),
        },
        (DragSource::Potential(_), DropZone::PotentialArea) => {
            board.remove_from_potential(name);
            board.add_to_potential(&player);
            DragOutcome::Applied("add_to_potential")
        }

        _ => DragOutcome::Ignored(IgnoreReason::Unsupported),
    };

    match &outcome {
        DragOutcome::Applied(op) => {
            debug!("drop {} from {} on {}: {}", name, source.origin(), target_id, op)
        }
        DragOutcome::Ignored(reason) => debug!(
            "drop {} from {} on {} ignored: {:?}",
            name,
            source.origin(),
            target_id,
            reason
        ),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wants(name: &str, desired: &str) -> Player {
        let mut p = Player::named(name);
        p.desired_positions = desired.to_string();
        p
    }

    fn players() -> Vec<Player> {
        vec![
            wants("Anna", "kant"),
            wants("Bjørn", "midt"),
            wants("Cecilie", "libero"),
            wants("Dag", ""),
        ]
    }

    fn avail(n: &str) -> DragSource {
        DragSource::Available(n.to_string())
    }
    fn team(n: &str) -> DragSource {
        DragSource::Team(n.to_string())
    }
    fn pot(n: &str) -> DragSource {
        DragSource::Potential(n.to_string())
    }

    #[test]
    fn zone_ids_round_trip() {
        let zones = [
            DropZone::TeamArea,
            DropZone::Available,
            DropZone::PotentialArea,
            DropZone::Position(Position::Libero),
            DropZone::PotentialBucket(Bucket::Unknown),
            DropZone::PotentialBucket(Bucket::Pos(Position::Dia)),
        ];
        for zone in zones {
            assert_eq!(DropZone::from_id(&zone.id()), Some(zone));
        }
    }

    #[test]
    fn malformed_zone_ids_are_rejected() {
        assert_eq!(DropZone::from_id("position:"), None);
        assert_eq!(DropZone::from_id("position:Unknown"), None);
        assert_eq!(DropZone::from_id("bench:Midt"), None);
        assert_eq!(DropZone::from_id(""), None);
    }

    #[test]
    fn available_onto_position() {
        let ps = players();
        let mut board = RosterBoard::new();
        let out = reconcile(&mut board, &ps, &avail("Bjørn"), Some("position:Midt"));
        assert_eq!(out, DragOutcome::Applied("assign_to_position"));
        assert_eq!(board.team(Position::Midt), vec!["Bjørn"]);
    }

    #[test]
    fn available_onto_team_area_uses_desired_or_first_position() {
        let ps = players();
        let mut board = RosterBoard::new();
        reconcile(&mut board, &ps, &avail("Cecilie"), Some("team"));
        reconcile(&mut board, &ps, &avail("Dag"), Some("team"));
        assert_eq!(board.team(Position::Libero), vec!["Cecilie"]);
        assert_eq!(board.team(Position::Midt), vec!["Dag"]);
    }

    #[test]
    fn available_onto_potential_area_buckets_by_desire() {
        let ps = players();
        let mut board = RosterBoard::new();
        reconcile(&mut board, &ps, &avail("Cecilie"), Some("potential"));
        assert_eq!(board.potential(Bucket::Pos(Position::Libero)), vec!["Cecilie"]);
    }

    #[test]
    fn available_onto_specific_bucket() {
        let ps = players();
        let mut board = RosterBoard::new();
        reconcile(&mut board, &ps, &avail("Anna"), Some("potential:Dia"));
        assert_eq!(board.potential(Bucket::Pos(Position::Dia)), vec!["Anna"]);
    }

    #[test]
    fn team_between_positions_and_same_position() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.assign_to_position(&ps[0], Position::Kant);

        let same = reconcile(&mut board, &ps, &team("Anna"), Some("position:Kant"));
        assert_eq!(same, DragOutcome::Ignored(IgnoreReason::SamePlace));

        let moved = reconcile(&mut board, &ps, &team("Anna"), Some("position:Dia"));
        assert_eq!(moved, DragOutcome::Applied("move"));
        assert_eq!(board.team(Position::Dia), vec!["Anna"]);
        assert!(board.team(Position::Kant).is_empty());
    }

    #[test]
    fn team_onto_available_unassigns() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.assign_to_position(&ps[1], Position::Midt);
        reconcile(&mut board, &ps, &team("Bjørn"), Some("available"));
        assert!(board.is_empty());
    }

    #[test]
    fn team_onto_any_potential_zone_uses_default_bucket() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.assign_to_position(&ps[0], Position::Midt);
        board.assign_to_position(&ps[2], Position::Midt);

        reconcile(&mut board, &ps, &team("Anna"), Some("potential"));
        reconcile(&mut board, &ps, &team("Cecilie"), Some("potential:Dia"));

        assert_eq!(board.potential(Bucket::Pos(Position::Kant)), vec!["Anna"]);
        assert_eq!(board.potential(Bucket::Pos(Position::Libero)), vec!["Cecilie"]);
        assert_eq!(board.team_size(), 0);
    }

    #[test]
    fn potential_onto_position() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.add_to_potential(&ps[2]);
        reconcile(&mut board, &ps, &pot("Cecilie"), Some("position:Libero"));
        assert_eq!(board.team(Position::Libero), vec!["Cecilie"]);
        assert_eq!(board.potential_size(), 0);
    }

    #[test]
    fn potential_onto_available_removes() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.add_to_potential(&ps[2]);
        reconcile(&mut board, &ps, &pot("Cecilie"), Some("available"));
        assert!(board.is_empty());
    }

    #[test]
    fn potential_between_buckets() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.add_to_potential(&ps[3]);
        assert_eq!(board.potential(Bucket::Unknown), vec!["Dag"]);

        let same = reconcile(&mut board, &ps, &pot("Dag"), Some("potential:Unknown"));
        assert_eq!(same, DragOutcome::Ignored(IgnoreReason::SamePlace));

        reconcile(&mut board, &ps, &pot("Dag"), Some("potential:Kant"));
        assert_eq!(board.potential(Bucket::Pos(Position::Kant)), vec!["Dag"]);
    }

    #[test]
    fn potential_onto_area_rebuckets_by_desire() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.move_potential("Cecilie", Bucket::Unknown);
        reconcile(&mut board, &ps, &pot("Cecilie"), Some("potential"));
        assert!(board.potential(Bucket::Unknown).is_empty());
        assert_eq!(board.potential(Bucket::Pos(Position::Libero)), vec!["Cecilie"]);
    }

    #[test]
    fn missing_or_unknown_target_changes_nothing() {
        let ps = players();
        let mut board = RosterBoard::new();
        assert_eq!(
            reconcile(&mut board, &ps, &avail("Anna"), None),
            DragOutcome::Ignored(IgnoreReason::NoTarget)
        );
        assert!(matches!(
            reconcile(&mut board, &ps, &avail("Anna"), Some("position:Bench")),
            DragOutcome::Ignored(IgnoreReason::UnknownTarget(_))
        ));
        assert!(board.is_empty());
    }

    #[test]
    fn unsupported_combinations_are_ignored() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.assign_to_position(&ps[0], Position::Kant);
        board.add_to_potential(&ps[2]);
        let before = board.clone();

        for (source, target) in [
            (avail("Bjørn"), "available"),
            (team("Anna"), "team"),
            (pot("Cecilie"), "team"),
        ] {
            assert_eq!(
                reconcile(&mut board, &ps, &source, Some(target)),
                DragOutcome::Ignored(IgnoreReason::Unsupported)
            );
        }
        assert_eq!(board, before);
    }

    #[test]
    fn stale_source_is_ignored() {
        let ps = players();
        let mut board = RosterBoard::new();
        board.assign_to_position(&ps[0], Position::Kant);
        let out = reconcile(&mut board, &ps, &avail("Anna"), Some("position:Midt"));
        assert_eq!(out, DragOutcome::Ignored(IgnoreReason::StaleSource));
        assert_eq!(board.team(Position::Kant), vec!["Anna"]);
    }

    #[test]
    fn player_missing_from_feed_is_moved_by_name() {
        let mut board = RosterBoard::new();
        board.move_potential("Gammel", Bucket::Unknown);
        reconcile(&mut board, &[], &pot("Gammel"), Some("position:Dia"));
        assert_eq!(board.team(Position::Dia), vec!["Gammel"]);
    }

    #[test]
    fn drag_state_transitions() {
        let mut state = DragState::default();
        assert!(!state.is_dragging());
        state.on_drag_start(avail("Anna"));
        assert!(state.is_dragging());
        assert_eq!(state.source().map(|s| s.name()), Some("Anna"));
        assert_eq!(state.on_drag_end(), Some(avail("Anna")));
        assert!(!state.is_dragging());
        assert_eq!(state.on_drag_end(), None);
    }
}
