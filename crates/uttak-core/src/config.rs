// Configuration loading and parsing (app.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    pub database: DatabaseConfig,
    pub ui: UiConfig,
    pub export: ExportConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// app.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire app.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AppFile {
    feed: FeedConfig,
    database: DatabaseConfig,
    ui: UiConfig,
    export: ExportConfig,
}

/// Where registrations come from and how long a fetched copy stays valid.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Google Sheets document id. Empty means "use the built-in sample".
    pub spreadsheet_id: String,
    /// A1 range covering the form responses, header row included.
    pub range: String,
    pub revalidate_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file. Empty selects `uttak.db` in the platform data directory.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub search_debounce_ms: u64,
    pub notification_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub directory: String,
    /// Sheet the "played last year" formula looks names up in.
    pub lookup_sheet: String,
    /// Column letter holding names on `lookup_sheet`.
    pub lookup_column: String,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub sheets_api_key: Option<String>,
    pub coach_password: Option<String>,
}

impl CredentialsConfig {
    pub fn sheets_api_key(&self) -> Option<&str> {
        non_empty(&self.sheets_api_key)
    }

    pub fn coach_password(&self) -> Option<&str> {
        non_empty(&self.coach_password)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl DatabaseConfig {
    /// Resolve the database file, creating the platform data directory when
    /// the configured path is empty.
    pub fn resolve_path(&self) -> Result<PathBuf, ConfigError> {
        if !self.path.trim().is_empty() {
            return Ok(PathBuf::from(self.path.trim()));
        }
        let dirs = directories::ProjectDirs::from("no", "uttak", "uttak").ok_or_else(|| {
            ConfigError::ValidationError {
                field: "database.path".into(),
                message: "empty and no platform data directory is available".into(),
            }
        })?;
        let dir = dirs.data_local_dir();
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::ValidationError {
            field: "database.path".into(),
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
        Ok(dir.join("uttak.db"))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/app.toml` and (optionally)
/// `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let app_path = config_dir.join("app.toml");
    let app_text = read_file(&app_path)?;
    let app: AppFile = toml::from_str(&app_text).map_err(|e| ConfigError::ParseError {
        path: app_path.clone(),
        source: e,
    })?;

    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        feed: app.feed,
        database: app.database,
        ui: app.ui,
        export: app.export,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.feed.range.trim().is_empty() {
        return Err(invalid("feed.range", "must not be empty"));
    }
    if config.feed.timeout_secs == 0 {
        return Err(invalid("feed.timeout_secs", "must be greater than 0"));
    }

    if config.ui.search_debounce_ms > 5_000 {
        return Err(invalid(
            "ui.search_debounce_ms",
            format!("must be at most 5000, got {}", config.ui.search_debounce_ms),
        ));
    }
    if config.ui.notification_secs == 0 {
        return Err(invalid("ui.notification_secs", "must be greater than 0"));
    }

    if config.export.directory.trim().is_empty() {
        return Err(invalid("export.directory", "must not be empty"));
    }
    if config.export.lookup_sheet.trim().is_empty() {
        return Err(invalid("export.lookup_sheet", "must not be empty"));
    }
    let col = config.export.lookup_column.trim();
    if col.is_empty() || !col.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            "export.lookup_column",
            format!("must be a column letter, got {:?}", config.export.lookup_column),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
