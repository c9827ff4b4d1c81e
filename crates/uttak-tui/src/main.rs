// Tryout roster entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open database
// 4. Load players (cache, sheet, or sample data)
// 5. Initialize the roster session from stored state
// 6. Spawn app logic task
// 7. Run the TUI until the coach quits
// 8. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info};

use uttak_app::app;
use uttak_app::feed::{self, FeedClient};
use uttak_core::config;
use uttak_core::db::Database;
use uttak_core::session::Session;
use uttak_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("uttak starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: sheet configured={}, debounce {} ms",
        !config.feed.spreadsheet_id.trim().is_empty(),
        config.ui.search_debounce_ms
    );

    let db_path = config
        .database
        .resolve_path()
        .context("failed to resolve database path")?;
    let db_path_str = db_path.to_string_lossy().into_owned();
    let db = Arc::new(Database::open(&db_path_str).context("failed to open database")?);
    info!("Database opened at {}", db_path.display());

    let feed_client = FeedClient::from_config(&config);
    match &feed_client {
        FeedClient::Active(_) => info!("Sheet client initialized"),
        FeedClient::Disabled => info!("Sheet client disabled (no spreadsheet id or API key)"),
    }
    let loaded = feed::load_players(&feed_client, &db, config.feed.revalidate_secs, Utc::now()).await;
    info!(
        "Loaded {} players from {}",
        loaded.players.len(),
        loaded.origin.label()
    );

    let mut session = Session::new(db.clone());
    session
        .initialize()
        .context("failed to initialize roster session")?;
    info!(
        "Roster restored: {} on team, {} potential",
        session.board().team_size(),
        session.board().potential_size()
    );

    let export_base = std::env::current_dir().context("failed to read working directory")?;
    let app_state = app::AppState::new(config, db, feed_client, loaded, session, export_base);

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("uttak shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("uttak.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uttak=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
