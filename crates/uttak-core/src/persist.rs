// Board snapshot <-> local key-value storage.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::RosterBoard;
use crate::position::{Bucket, Position};

/// Storage key for the team selection: JSON object of position label to names.
pub const SELECTED_TEAM_KEY: &str = "selectedTeam";
/// Storage key for potential players: JSON array of `{name, position}`.
pub const POTENTIAL_PLAYERS_KEY: &str = "potentialPlayers";

/// String-keyed storage for the two snapshot entries.
pub trait StateStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store, for tests and runs without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store mutex poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store mutex poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PotentialEntry {
    name: String,
    position: String,
}

/// Write the full board under both keys.
pub fn save(board: &RosterBoard, store: &dyn StateStore) -> Result<()> {
    let team: BTreeMap<&str, Vec<String>> = board
        .selection()
        .into_iter()
        .map(|(pos, names)| (pos.label(), names))
        .collect();
    let team_json = serde_json::to_string(&team).context("failed to serialize selected team")?;

    let potential: Vec<PotentialEntry> = board
        .potential_list()
        .into_iter()
        .map(|(name, bucket)| PotentialEntry {
            name,
            position: bucket.label().to_string(),
        })
        .collect();
    let potential_json =
        serde_json::to_string(&potential).context("failed to serialize potential players")?;

    store.write(SELECTED_TEAM_KEY, &team_json)?;
    store.write(POTENTIAL_PLAYERS_KEY, &potential_json)?;
    Ok(())
}

/// Read the board back. Missing keys give an empty section; malformed values
/// are logged and treated as missing. Only a failing store is an error.
pub fn load(store: &dyn StateStore) -> Result<RosterBoard> {
    let team = match store.read(SELECTED_TEAM_KEY)? {
        Some(raw) => parse_team(&raw),
        None => Vec::new(),
    };
    let potential = match store.read(POTENTIAL_PLAYERS_KEY)? {
        Some(raw) => parse_potential(&raw),
        None => Vec::new(),
    };
    Ok(RosterBoard::from_parts(&team, &potential))
}

fn parse_team(raw: &str) -> Vec<(Position, Vec<String>)> {
    let parsed: BTreeMap<String, Vec<String>> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("ignoring malformed {}: {}", SELECTED_TEAM_KEY, e);
            return Vec::new();
        }
    };

    let mut team: Vec<(Position, Vec<String>)> = Vec::new();
    for (label, names) in parsed {
        match Position::from_label(&label) {
            Some(pos) => team.push((pos, names)),
            None => warn!("ignoring unknown position {:?} in {}", label, SELECTED_TEAM_KEY),
        }
    }
    team.sort_by_key(|(pos, _)| pos.sort_order());
    team
}

fn parse_potential(raw: &str) -> Vec<(String, Bucket)> {
    let parsed: Vec<PotentialEntry> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("ignoring malformed {}: {}", POTENTIAL_PLAYERS_KEY, e);
            return Vec::new();
        }
    };

    parsed
        .into_iter()
        .filter_map(|entry| match Bucket::from_label(&entry.position) {
            Some(bucket) => Some((entry.name, bucket)),
            None => {
                warn!(
                    "ignoring potential entry {:?} with unknown bucket {:?}",
                    entry.name, entry.position
                );
                None
            }
        })
        .collect()
}
