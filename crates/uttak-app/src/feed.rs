// Registration feed: Google Sheets client, SQLite cache and sample fallback.
//
// Startup reads the cache first and only goes to the sheet when the cached
// copy is older than `feed.revalidate_secs`. Any failure to get real rows
// degrades to the stale cache and then to the built-in sample dataset; the
// caller never sees an error from `load_players`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use uttak_core::config::Config;
use uttak_core::db::Database;
use uttak_core::player::{normalize_rows, Player};

use crate::fallback::sample_rows;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("spreadsheet feed is not configured")]
    NotConfigured,

    #[error("request to Google Sheets failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google Sheets answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid spreadsheet URL: {0}")]
    Url(String),

    #[error("spreadsheet range returned no registrations")]
    Empty,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can hand back the raw registration rows, header included.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Stable identifier used as the cache key.
    fn source_key(&self) -> String;

    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, FeedError>;
}

/// Google Sheets API v4 `values.get` client.
pub struct SheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    range: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl SheetsClient {
    pub fn new(
        spreadsheet_id: String,
        range: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(SheetsClient {
            http,
            spreadsheet_id,
            range,
            api_key,
        })
    }

    fn values_url(&self) -> Result<reqwest::Url, FeedError> {
        let mut url =
            reqwest::Url::parse(SHEETS_API_BASE).map_err(|e| FeedError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FeedError::Url(SHEETS_API_BASE.to_string()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&self.range);
        Ok(url)
    }
}

/// Render a JSON cell as the text a spreadsheet would show.
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a `values.get` response body into rows of strings.
pub fn parse_value_range(body: &str) -> Result<Vec<Vec<String>>, serde_json::Error> {
    let range: ValueRange = serde_json::from_str(body)?;
    Ok(range
        .values
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

#[async_trait]
impl SheetSource for SheetsClient {
    fn source_key(&self) -> String {
        format!("{}/{}", self.spreadsheet_id, self.range)
    }

    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, FeedError> {
        let url = self.values_url()?;
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let rows = parse_value_range(&body).map_err(|e| FeedError::Status {
            status: status.as_u16(),
            body: format!("unreadable body: {e}"),
        })?;
        if rows.len() < 2 {
            return Err(FeedError::Empty);
        }
        Ok(rows)
    }
}

/// The configured feed: a real sheet, or nothing (sample data only).
pub enum FeedClient {
    Active(Box<dyn SheetSource>),
    Disabled,
}

impl FeedClient {
    /// `Active` when both a spreadsheet id and an API key are configured.
    pub fn from_config(config: &Config) -> Self {
        let id = config.feed.spreadsheet_id.trim();
        let Some(key) = config.credentials.sheets_api_key() else {
            return FeedClient::Disabled;
        };
        if id.is_empty() {
            return FeedClient::Disabled;
        }
        match SheetsClient::new(
            id.to_string(),
            config.feed.range.clone(),
            key.to_string(),
            Duration::from_secs(config.feed.timeout_secs),
        ) {
            Ok(client) => FeedClient::Active(Box::new(client)),
            Err(e) => {
                warn!("could not build Sheets client, using sample data: {}", e);
                FeedClient::Disabled
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Where the current player list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    Sheet,
    Cache,
    Fallback,
}

impl FeedOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            FeedOrigin::Sheet => "sheet",
            FeedOrigin::Cache => "cache",
            FeedOrigin::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedFeed {
    pub players: Vec<Player>,
    pub origin: FeedOrigin,
    /// When the underlying rows were fetched from the sheet.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl LoadedFeed {
    pub fn fallback() -> Self {
        LoadedFeed {
            players: normalize_rows(&sample_rows()),
            origin: FeedOrigin::Fallback,
            fetched_at: None,
        }
    }

    fn from_rows(rows: &[Vec<String>], origin: FeedOrigin, fetched_at: DateTime<Utc>) -> Self {
        LoadedFeed {
            players: normalize_rows(rows),
            origin,
            fetched_at: Some(fetched_at),
        }
    }
}

/// Load the player list, preferring a fresh cache, then the sheet, then a
/// stale cache, then the sample dataset.
pub async fn load_players(
    client: &FeedClient,
    db: &Database,
    revalidate_secs: u64,
    now: DateTime<Utc>,
) -> LoadedFeed {
    let FeedClient::Active(source) = client else {
        info!("no spreadsheet configured, using sample registrations");
        return LoadedFeed::fallback();
    };
    let key = source.source_key();

    let cached = match db.load_feed_cache(&key) {
        Ok(c) => c,
        Err(e) => {
            warn!("feed cache read failed: {:#}", e);
            None
        }
    };
    if let Some(c) = &cached {
        if c.is_fresh(now, revalidate_secs) {
            info!("using cached feed from {}", c.fetched_at);
            return LoadedFeed::from_rows(&c.rows, FeedOrigin::Cache, c.fetched_at);
        }
    }

    match fetch_and_cache(source.as_ref(), db, now).await {
        Ok(feed) => feed,
        Err(e) => {
            warn!("feed fetch failed: {}", e);
            match cached {
                Some(c) => {
                    info!("serving stale cached feed from {}", c.fetched_at);
                    LoadedFeed::from_rows(&c.rows, FeedOrigin::Cache, c.fetched_at)
                }
                None => LoadedFeed::fallback(),
            }
        }
    }
}

/// Fetch the sheet again, ignoring any cached copy. The cache is only
/// replaced when the fetch succeeds. Errors are returned so the caller can
/// tell the coach the refresh failed.
pub async fn refresh(
    client: &FeedClient,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<LoadedFeed, FeedError> {
    let FeedClient::Active(source) = client else {
        return Err(FeedError::NotConfigured);
    };
    fetch_and_cache(source.as_ref(), db, now).await
}

async fn fetch_and_cache(
    source: &dyn SheetSource,
    db: &Database,
    now: DateTime<Utc>,
) -> Result<LoadedFeed, FeedError> {
    let rows = source.fetch_rows().await?;
    let feed = LoadedFeed::from_rows(&rows, FeedOrigin::Sheet, now);
    if feed.players.is_empty() {
        return Err(FeedError::Empty);
    }
    if let Err(e) = db.put_feed_cache(&source.source_key(), &rows, now) {
        warn!("failed to cache feed: {:#}", e);
    }
    info!("fetched {} registrations from sheet", feed.players.len());
    Ok(feed)
}
