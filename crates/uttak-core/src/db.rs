// SQLite persistence layer for roster state and the cached registration feed.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::persist::StateStore;

/// SQLite-backed key-value roster state plus the last fetched feed.
pub struct Database {
    conn: Mutex<Connection>,
}

/// A cached copy of the raw feed and when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
    pub rows: Vec<Vec<String>>,
    pub fetched_at: DateTime<Utc>,
}

impl CachedFeed {
    /// Whether the entry is younger than `max_age_secs` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age_secs: u64) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age.num_seconds() >= 0 && (age.num_seconds() as u64) < max_age_secs
    }
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS roster_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS feed_cache (
                source     TEXT PRIMARY KEY,
                rows       TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned. This should never happen in normal
    /// operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn save_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO roster_state (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved value. Returns `None` if the key does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT value FROM roster_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("failed to load state")
    }

    // ------------------------------------------------------------------
    // Feed cache
    // ------------------------------------------------------------------

    /// Cache the raw feed for `source` (a spreadsheet id + range), stamped
    /// with `fetched_at`.
    pub fn put_feed_cache(
        &self,
        source: &str,
        rows: &[Vec<String>],
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.conn();
        let rows_json = serde_json::to_string(rows).context("failed to serialize feed rows")?;
        conn.execute(
            "INSERT OR REPLACE INTO feed_cache (source, rows, fetched_at) VALUES (?1, ?2, ?3)",
            params![source, rows_json, fetched_at.to_rfc3339()],
        )
        .context("failed to write feed cache")?;
        Ok(())
    }

    /// Load the cached feed for `source`. A row that cannot be decoded is
    /// treated as absent.
    pub fn load_feed_cache(&self, source: &str) -> Result<Option<CachedFeed>> {
        let conn = self.conn();
        let raw: Option<(String, String)> = conn
            .query_row(
                "SELECT rows, fetched_at FROM feed_cache WHERE source = ?1",
                params![source],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("failed to query feed cache")?;

        let Some((rows_json, fetched_at)) = raw else {
            return Ok(None);
        };
        let rows = match serde_json::from_str::<Vec<Vec<String>>>(&rows_json) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("discarding undecodable feed cache for {}: {}", source, e);
                return Ok(None);
            }
        };
        let fetched_at = match DateTime::parse_from_rfc3339(&fetched_at) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!("discarding feed cache with bad timestamp: {}", e);
                return Ok(None);
            }
        };
        Ok(Some(CachedFeed { rows, fetched_at }))
    }

}

impl StateStore for Database {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.load_state(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.save_state(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["Tidsmerke".into(), "E-post".into(), "Navn".into()],
            vec!["".into(), "a@x".into(), "Anna".into()],
        ]
    }

    // ------------------------------------------------------------------
    // Schema / open
    // ------------------------------------------------------------------

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"roster_state".to_string()));
        assert!(tables.contains(&"feed_cache".to_string()));
    }

    // ------------------------------------------------------------------
    // Roster state (key-value)
    // ------------------------------------------------------------------

    #[test]
    fn save_and_load_state_round_trip() {
        let db = test_db();
        db.save_state("selectedTeam", r#"{"Midt":["A"]}"#).unwrap();
        assert_eq!(
            db.load_state("selectedTeam").unwrap().as_deref(),
            Some(r#"{"Midt":["A"]}"#)
        );
    }

    #[test]
    fn load_state_returns_none_for_missing_key() {
        let db = test_db();
        assert!(db.load_state("nonexistent").unwrap().is_none());
    }

    #[test]
    fn save_state_overwrites_previous_value() {
        let db = test_db();
        db.save_state("key", "1").unwrap();
        db.save_state("key", "2").unwrap();
        assert_eq!(db.load_state("key").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn database_is_a_state_store() {
        let db = test_db();
        let store: &dyn StateStore = &db;
        store.write("potentialPlayers", "[]").unwrap();
        assert_eq!(store.read("potentialPlayers").unwrap().as_deref(), Some("[]"));
    }

    // ------------------------------------------------------------------
    // Feed cache
    // ------------------------------------------------------------------

    #[test]
    fn feed_cache_round_trip() {
        let db = test_db();
        let now = Utc::now();
        db.put_feed_cache("sheet!A:K", &rows(), now).unwrap();

        let cached = db.load_feed_cache("sheet!A:K").unwrap().unwrap();
        assert_eq!(cached.rows, rows());
        assert_eq!(cached.fetched_at.timestamp(), now.timestamp());
        assert!(db.load_feed_cache("other").unwrap().is_none());
    }

    #[test]
    fn feed_cache_freshness() {
        let now = Utc::now();
        let cached = CachedFeed {
            rows: rows(),
            fetched_at: now - Duration::seconds(30),
        };
        assert!(cached.is_fresh(now, 60));
        assert!(!cached.is_fresh(now, 30));
        assert!(!cached.is_fresh(now, 0));
    }

    #[test]
    fn undecodable_cache_is_treated_as_absent() {
        let db = test_db();
        {
            let conn = db.conn();
            conn.execute(
                "INSERT INTO feed_cache (source, rows, fetched_at) VALUES ('s', 'nope', 'never')",
                [],
            )
            .unwrap();
        }
        assert!(db.load_feed_cache("s").unwrap().is_none());
    }
}
