// Roster positions and free-text position matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five volleyball roster positions a player can be picked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Midt,
    Dia,
    Legger,
    Libero,
    Kant,
}

impl Position {
    /// All positions in display order. The first entry is the fallback
    /// position for team drops without a better match.
    pub const ALL: [Position; 5] = [
        Position::Midt,
        Position::Dia,
        Position::Legger,
        Position::Libero,
        Position::Kant,
    ];

    /// Parse a position label (case-insensitive, surrounding whitespace ignored).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "midt" => Some(Position::Midt),
            "dia" => Some(Position::Dia),
            "legger" => Some(Position::Legger),
            "libero" => Some(Position::Libero),
            "kant" => Some(Position::Kant),
            _ => None,
        }
    }

    /// Return the display label for this position.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Midt => "Midt",
            Position::Dia => "Dia",
            Position::Legger => "Legger",
            Position::Libero => "Libero",
            Position::Kant => "Kant",
        }
    }

    /// Index into [`Position::ALL`].
    pub fn sort_order(&self) -> usize {
        match self {
            Position::Midt => 0,
            Position::Dia => 1,
            Position::Legger => 2,
            Position::Libero => 3,
            Position::Kant => 4,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A potential-group bucket: one of the positions, or `Unknown` for players
/// whose desired position text matched nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    Pos(Position),
    Unknown,
}

impl Bucket {
    /// All buckets in display order (positions first, `Unknown` last).
    pub const ALL: [Bucket; 6] = [
        Bucket::Pos(Position::Midt),
        Bucket::Pos(Position::Dia),
        Bucket::Pos(Position::Legger),
        Bucket::Pos(Position::Libero),
        Bucket::Pos(Position::Kant),
        Bucket::Unknown,
    ];

    pub fn from_label(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("unknown") {
            return Some(Bucket::Unknown);
        }
        Position::from_label(s).map(Bucket::Pos)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Pos(p) => p.label(),
            Bucket::Unknown => "Unknown",
        }
    }

    /// The position this bucket stands for, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            Bucket::Pos(p) => Some(*p),
            Bucket::Unknown => None,
        }
    }
}

impl From<Position> for Bucket {
    fn from(p: Position) -> Self {
        Bucket::Pos(p)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Lowercase aliases that identify each position in registration free text.
/// Norwegian and English terms are both used on the registration form.
const POSITION_ALIASES: &[(Position, &[&str])] = &[
    (
        Position::Midt,
        &["midt", "middle", "midtblokk", "blocker", "center"],
    ),
    (Position::Dia, &["dia", "opposite", "diagonal", "oppo"]),
    (Position::Legger, &["legger", "setter", "hever"]),
    (Position::Libero, &["libero", "forsvar"]),
    (Position::Kant, &["kant", "outside", "spiker", "wing"]),
];

/// Map free text to the positions it mentions.
///
/// Each alias is tested for case-insensitive substring containment. A
/// position is returned at most once, in taxonomy order. Empty or unmatched
/// text yields an empty vector.
pub fn positions_from_text(text: &str) -> Vec<Position> {
    let haystack = text.trim().to_lowercase();
    if haystack.is_empty() {
        return Vec::new();
    }

    POSITION_ALIASES
        .iter()
        .filter(|(_, aliases)| aliases.iter().any(|alias| haystack.contains(alias)))
        .map(|(pos, _)| *pos)
        .collect()
}

/// The potential bucket a player lands in when no explicit target is given:
/// the first position their desired-position text mentions, else `Unknown`.
pub fn default_bucket(desired_positions: &str) -> Bucket {
    positions_from_text(desired_positions)
        .first()
        .map(|p| Bucket::Pos(*p))
        .unwrap_or(Bucket::Unknown)
}

/// The team position a player lands in on a team-area drop: the first
/// mentioned position, else the first roster position.
pub fn default_position(desired_positions: &str) -> Position {
    positions_from_text(desired_positions)
        .first()
        .copied()
        .unwrap_or(Position::ALL[0])
}
