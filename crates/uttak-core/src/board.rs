// Roster board: team selection per position and potential groups.
//
// Membership is a single ordered list of `(name, Membership)` entries. A name
// has at most one entry, so a player can never sit in two positions, two
// buckets, or the team and a potential bucket at once. Display order inside a
// position or bucket is the order entries were (re)appended.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::Player;
use crate::position::{default_bucket, Bucket, Position};

/// Where a player currently is on the board. Players without an entry are
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    Team(Position),
    Potential(Bucket),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterBoard {
    entries: Vec<(String, Membership)>,
}

impl RosterBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a board from persisted lists.
    ///
    /// Team lists are applied first, so a name stored both in the team and in
    /// a potential bucket stays in the team. Later duplicates are dropped.
    pub fn from_parts(
        team: &[(Position, Vec<String>)],
        potential: &[(String, Bucket)],
    ) -> Self {
        let mut board = RosterBoard::new();
        for (pos, names) in team {
            for name in names {
                if board.membership(name).is_none() {
                    board.entries.push((name.clone(), Membership::Team(*pos)));
                }
            }
        }
        for (name, bucket) in potential {
            if board.membership(name).is_none() {
                board.entries.push((name.clone(), Membership::Potential(*bucket)));
            }
        }
        board
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn membership(&self, name: &str) -> Option<Membership> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| *m)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names assigned to `position`, in display order.
    pub fn team(&self, position: Position) -> Vec<&str> {
        self.names_where(Membership::Team(position))
    }

    /// Names in potential bucket `bucket`, in display order.
    pub fn potential(&self, bucket: Bucket) -> Vec<&str> {
        self.names_where(Membership::Potential(bucket))
    }

    /// The whole team as (position, names) in position order.
    pub fn selection(&self) -> Vec<(Position, Vec<String>)> {
        Position::ALL
            .iter()
            .map(|pos| {
                let names = self.team(*pos).into_iter().map(str::to_string).collect();
                (*pos, names)
            })
            .collect()
    }

    /// All potential players as a flat (name, bucket) list in bucket order.
    pub fn potential_list(&self) -> Vec<(String, Bucket)> {
        Bucket::ALL
            .iter()
            .flat_map(|bucket| {
                self.potential(*bucket)
                    .into_iter()
                    .map(move |name| (name.to_string(), *bucket))
            })
            .collect()
    }

    pub fn team_size(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, m)| matches!(m, Membership::Team(_)))
            .count()
    }

    pub fn potential_size(&self) -> usize {
        self.entries.len() - self.team_size()
    }

    /// Players that are neither on the team nor potential, deduplicated by
    /// name (first occurrence wins), in input order.
    pub fn available<'a>(&self, players: &'a [Player]) -> Vec<&'a Player> {
        let mut seen: HashSet<&str> = HashSet::new();
        players
            .iter()
            .filter(|p| self.membership(&p.name).is_none())
            .filter(|p| seen.insert(p.name.as_str()))
            .collect()
    }

    fn names_where(&self, wanted: Membership) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, m)| *m == wanted)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    fn remove(&mut self, name: &str) -> Option<Membership> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    fn append(&mut self, name: &str, membership: Membership) {
        self.remove(name);
        self.entries.push((name.to_string(), membership));
    }

    /// Put a player on the team at `position`, taking them out of wherever
    /// they were before. They go to the end of that position's list.
    pub fn assign_to_position(&mut self, player: &Player, position: Position) {
        self.append(&player.name, Membership::Team(position));
    }

    /// Take `name` off the team if it is assigned to `position`.
    pub fn unassign(&mut self, position: Position, name: &str) {
        if self.membership(name) == Some(Membership::Team(position)) {
            self.remove(name);
        }
    }

    /// Move a team player between positions. Same source and target is a
    /// no-op, as is a name that is not currently at `from`.
    pub fn move_player(&mut self, from: Position, name: &str, to: Position) {
        if from == to {
            return;
        }
        if self.membership(name) != Some(Membership::Team(from)) {
            debug!("move ignored: {} is not at {}", name, from);
            return;
        }
        self.append(name, Membership::Team(to));
    }

    /// Mark a player as potential, bucketed by the first position their
    /// desired-position text mentions (`Unknown` when none).
    pub fn add_to_potential(&mut self, player: &Player) {
        let bucket = default_bucket(&player.desired_positions);
        self.append(&player.name, Membership::Potential(bucket));
    }

    pub fn remove_from_potential(&mut self, name: &str) {
        if matches!(self.membership(name), Some(Membership::Potential(_))) {
            self.remove(name);
        }
    }

    /// Put `name` in `bucket`, at the end.
    pub fn move_potential(&mut self, name: &str, bucket: Bucket) {
        self.append(name, Membership::Potential(bucket));
    }

    /// Take a player off the team and into their default potential bucket.
    pub fn move_to_potential_from_selection(&mut self, player: &Player) {
        if matches!(self.membership(&player.name), Some(Membership::Team(_))) {
            self.remove(&player.name);
        }
        self.add_to_potential(player);
    }

    /// Drop every team and potential entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
