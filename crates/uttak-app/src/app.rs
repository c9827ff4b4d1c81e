// Application state and orchestration logic.
//
// The central event loop that applies user commands from the TUI to the
// roster session, debounces search input, expires notifications and pushes
// UI updates to the TUI render loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, Utc};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use uttak_core::auth::{IdentityGate, View};
use uttak_core::config::Config;
use uttak_core::db::Database;
use uttak_core::drag::DragState;
use uttak_core::filter::{
    cycle, player_matches, sort_players, AgeGroup, Filters, Gender, Level, SortKey, YesNo,
};
use uttak_core::notify::{NotificationCenter, Severity};
use uttak_core::player::Player;
use uttak_core::position::{Bucket, Position};
use uttak_core::session::Session;

use crate::export::{export_players, ExportError, ExportScope};
use crate::feed::{self, FeedClient, FeedError, LoadedFeed};
use crate::protocol::{AppSnapshot, FilterField, NotificationView, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<Database>,
    pub feed_client: FeedClient,
    pub feed: LoadedFeed,
    pub session: Session,
    pub gate: IdentityGate,
    pub view: View,
    pub filters: Filters,
    /// Search term the available list is filtered by.
    pub search: String,
    /// Latest typed search term and when it takes effect.
    pub pending_search: Option<(String, Instant)>,
    pub sort: SortKey,
    pub drag: DragState,
    pub notifications: NotificationCenter,
    /// Directory export paths are resolved against.
    pub export_base: PathBuf,
}

impl AppState {
    /// Create the application state around an initialized session.
    pub fn new(
        config: Config,
        db: Arc<Database>,
        feed_client: FeedClient,
        feed: LoadedFeed,
        session: Session,
        export_base: PathBuf,
    ) -> Self {
        let gate = IdentityGate::new(config.credentials.coach_password());
        let view = gate.route(View::Roster);
        let notifications =
            NotificationCenter::new(Duration::from_secs(config.ui.notification_secs));
        AppState {
            config,
            db,
            feed_client,
            feed,
            session,
            gate,
            view,
            filters: Filters::default(),
            search: String::new(),
            pending_search: None,
            sort: SortKey::default(),
            drag: DragState::default(),
            notifications,
            export_base,
        }
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        debug!("notification ({:?}): {}", severity, message);
        self.notifications
            .push(severity, message, Instant::now().into_std());
    }

    fn player(&self, name: &str) -> Player {
        self.feed
            .players
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .unwrap_or_else(|| Player::named(name))
    }

    /// Available players after filters, search and sorting.
    pub fn filtered_available(&self) -> Vec<&Player> {
        let year = Local::now().year();
        let mut list: Vec<&Player> = self
            .session
            .board()
            .available(&self.feed.players)
            .into_iter()
            .filter(|p| player_matches(p, &self.filters, &self.search, year))
            .collect();
        sort_players(&mut list, self.sort);
        list
    }

    /// The team as player records, in position order.
    pub fn team_players(&self) -> Vec<(Position, Vec<Player>)> {
        self.session
            .board()
            .selection()
            .into_iter()
            .map(|(pos, names)| (pos, names.iter().map(|n| self.player(n)).collect()))
            .collect()
    }

    fn potential_players(&self) -> Vec<(Bucket, Vec<Player>)> {
        let board = self.session.board();
        Bucket::ALL
            .iter()
            .map(|b| (*b, board.potential(*b).into_iter().map(|n| self.player(n)).collect()))
            .collect()
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            view: self.view,
            available: self.filtered_available().into_iter().cloned().collect(),
            available_total: self.session.board().available(&self.feed.players).len(),
            team: self.team_players(),
            potential: self.potential_players(),
            filters: self.filters.clone(),
            search: self.search.clone(),
            sort: self.sort,
            origin: self.feed.origin,
            fetched_at: self.feed.fetched_at,
            player_count: self.feed.players.len(),
            requires_login: self.gate.requires_login(),
        }
    }

    fn notification_views(&self) -> Vec<NotificationView> {
        self.notifications
            .active()
            .iter()
            .map(|n| NotificationView {
                id: n.id,
                severity: n.severity,
                message: n.message.clone(),
            })
            .collect()
    }

    fn cycle_filter(&mut self, field: FilterField) {
        let f = &mut self.filters;
        match field {
            FilterField::Gender => f.gender = cycle(f.gender, &Gender::ALL),
            FilterField::Student => f.student = cycle(f.student, &YesNo::ALL),
            FilterField::PreviousTeam => f.previous_team = cycle(f.previous_team, &YesNo::ALL),
            FilterField::Level => f.level = cycle(f.level, &Level::ALL),
            FilterField::Position => f.position = cycle(f.position, &Position::ALL),
            FilterField::Age => f.age = cycle(f.age, &AgeGroup::ALL),
        }
    }

    fn apply_pending_search(&mut self) {
        if let Some((term, _)) = self.pending_search.take() {
            debug!("search applied: {:?}", term);
            self.search = term;
        }
    }

    fn export(&mut self, scope: ExportScope) {
        let team;
        let players: Vec<&Player> = match scope {
            ExportScope::Team => {
                team = self.team_players();
                team.iter().flat_map(|(_, ps)| ps.iter()).collect()
            }
            ExportScope::Filtered => self.filtered_available(),
        };
        let result = export_players(
            &players,
            scope,
            &self.config.export,
            &self.export_base,
            Local::now(),
        );
        match result {
            Ok(path) => self.notify(Severity::Success, format!("Eksportert til {}", path.display())),
            Err(ExportError::Empty) => self.notify(Severity::Warning, "Ingen spillere å eksportere"),
            Err(e) => {
                warn!("export failed: {}", e);
                self.notify(Severity::Error, format!("Eksport feilet: {e}"));
            }
        }
    }

    async fn refresh_feed(&mut self) {
        match feed::refresh(&self.feed_client, &self.db, Utc::now()).await {
            Ok(loaded) => {
                let count = loaded.players.len();
                self.feed = loaded;
                self.notify(Severity::Success, format!("Oppdatert: {count} påmeldte"));
            }
            Err(FeedError::NotConfigured) => {
                self.notify(Severity::Info, "Ingen regneark er konfigurert");
            }
            Err(e) => {
                warn!("manual refresh failed: {}", e);
                self.notify(Severity::Error, format!("Kunne ikke oppdatere: {e}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens with `tokio::select!` for:
/// 1. User commands from the TUI
/// 2. The search debounce deadline
/// 3. The next notification expiry
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    if state.feed.origin == feed::FeedOrigin::Fallback {
        state.notify(Severity::Info, "Viser eksempeldata (fant ikke regnearket)");
    }
    send_snapshot(&state, &ui_tx).await;
    send_notifications(&state, &ui_tx).await;

    loop {
        let search_deadline = state.pending_search.as_ref().map(|(_, at)| *at);
        let notify_deadline = state.notifications.next_deadline().map(Instant::from_std);

        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = sleep_until(search_deadline.unwrap_or_else(Instant::now)), if search_deadline.is_some() => {
                state.apply_pending_search();
                send_snapshot(&state, &ui_tx).await;
            }

            _ = sleep_until(notify_deadline.unwrap_or_else(Instant::now)), if notify_deadline.is_some() => {
                if state.notifications.expire(Instant::now().into_std()) {
                    send_notifications(&state, &ui_tx).await;
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;
}

async fn send_notifications(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::Notifications(state.notification_views()))
        .await;
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let notifications_before = state.notifications.active().len();

    match cmd {
        UserCommand::Login(attempt) => {
            if state.gate.login(&attempt) {
                state.view = state.gate.route(View::Roster);
                state.notify(Severity::Success, "Logget inn");
            } else {
                let _ = ui_tx.send(UiUpdate::LoginRejected).await;
                state.notify(Severity::Error, "Feil passord");
            }
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::Logout => {
            state.gate.logout();
            state.view = state.gate.route(state.view);
            if state.view != View::Roster && state.drag.on_drag_end().is_some() {
                let _ = ui_tx.send(UiUpdate::Dragging(None)).await;
            }
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::DismissNotification => {
            state.notifications.dismiss_latest();
            send_notifications(state, ui_tx).await;
            return;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
        cmd if state.view != View::Roster => {
            debug!("ignoring {:?} outside the roster view", cmd);
        }
        UserCommand::SetSearch(term) => {
            let debounce = Duration::from_millis(state.config.ui.search_debounce_ms);
            state.pending_search = Some((term, Instant::now() + debounce));
            if debounce.is_zero() {
                state.apply_pending_search();
                send_snapshot(state, ui_tx).await;
            }
        }
        UserCommand::CycleFilter(field) => {
            state.cycle_filter(field);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::ClearFilters => {
            state.filters = Filters::default();
            state.search.clear();
            state.pending_search = None;
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::CycleSort => {
            state.sort = state.sort.next();
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::DragStart(source) => {
            if state.drag.is_dragging() {
                debug!("drag start while already dragging, replacing source");
            }
            state.drag.on_drag_start(source);
            let _ = ui_tx
                .send(UiUpdate::Dragging(state.drag.source().cloned()))
                .await;
        }
        UserCommand::DragEnd { target } => {
            let Some(source) = state.drag.on_drag_end() else {
                debug!("drag end without a drag in progress, ignoring");
                return;
            };
            let result = state
                .session
                .drop_player(&state.feed.players, &source, target.as_deref());
            if let Err(e) = result {
                warn!("drop failed: {}", e);
                state.notify(Severity::Error, format!("Kunne ikke lagre laget: {e}"));
            }
            let _ = ui_tx
                .send(UiUpdate::Dragging(state.drag.source().cloned()))
                .await;
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::Export(scope) => {
            state.export(scope);
        }
        UserCommand::Refresh => {
            state.refresh_feed().await;
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::ResetRoster => {
            match state.session.reset() {
                Ok(()) => state.notify(Severity::Info, "Laget er tømt"),
                Err(e) => state.notify(Severity::Error, format!("Kunne ikke tømme laget: {e}")),
            }
            send_snapshot(state, ui_tx).await;
        }
    }

    if state.notifications.active().len() != notifications_before {
        send_notifications(state, ui_tx).await;
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use uttak_core::config::{
        CredentialsConfig, DatabaseConfig, ExportConfig, FeedConfig, UiConfig,
    };
    use uttak_core::drag::DragSource;

    fn config(password: Option<&str>) -> Config {
        Config {
            feed: FeedConfig {
                spreadsheet_id: String::new(),
                range: "Ark1!A:K".into(),
                revalidate_secs: 300,
                timeout_secs: 10,
            },
            database: DatabaseConfig {
                path: ":memory:".into(),
            },
            ui: UiConfig {
                search_debounce_ms: 300,
                notification_secs: 3,
            },
            export: ExportConfig {
                directory: "exports".into(),
                lookup_sheet: "Ark1".into(),
                lookup_column: "C".into(),
            },
            credentials: CredentialsConfig {
                sheets_api_key: None,
                coach_password: password.map(str::to_string),
            },
        }
    }

    fn state(password: Option<&str>) -> AppState {
        let db = Arc::new(Database::open(":memory:").unwrap());
        let mut session = Session::new(db.clone());
        session.initialize().unwrap();
        AppState::new(
            config(password),
            db,
            FeedClient::Disabled,
            LoadedFeed::fallback(),
            session,
            std::env::temp_dir(),
        )
    }

    #[test]
    fn starts_on_roster_without_password() {
        let s = state(None);
        assert_eq!(s.view, View::Roster);
        assert!(!s.build_snapshot().requires_login);
    }

    #[test]
    fn starts_on_login_with_password() {
        let s = state(Some("smash"));
        assert_eq!(s.view, View::Login);
        assert!(s.build_snapshot().requires_login);
    }

    #[test]
    fn cycle_filter_walks_options_then_back_to_all() {
        let mut s = state(None);
        s.cycle_filter(FilterField::Gender);
        assert_eq!(s.filters.gender, Some(Gender::Male));
        s.cycle_filter(FilterField::Gender);
        assert_eq!(s.filters.gender, Some(Gender::Female));
        s.cycle_filter(FilterField::Gender);
        assert_eq!(s.filters.gender, None);
    }

    #[test]
    fn snapshot_lists_every_fallback_player_as_available() {
        let s = state(None);
        let snap = s.build_snapshot();
        assert_eq!(snap.available.len(), s.feed.players.len());
        assert_eq!(snap.available_total, s.feed.players.len());
        assert!(snap.team.iter().all(|(_, ps)| ps.is_empty()));
    }

    #[test]
    fn team_players_fall_back_to_bare_names() {
        let mut s = state(None);
        s.session
            .apply(|b| b.assign_to_position(&Player::named("Ukjent"), Position::Dia))
            .unwrap();
        let team = s.team_players();
        let dia = &team[Position::Dia.sort_order()].1;
        assert_eq!(dia[0].name, "Ukjent");
    }

    #[tokio::test]
    async fn drag_end_moves_player_and_reports() {
        let mut s = state(None);
        let name = s.feed.players[0].name.clone();
        let (tx, mut rx) = mpsc::channel(16);

        handle_user_command(
            &mut s,
            UserCommand::DragStart(DragSource::Available(name.clone())),
            &tx,
        )
        .await;
        assert_eq!(s.drag.source().map(|d| d.name()), Some(name.as_str()));
        match rx.recv().await {
            Some(UiUpdate::Dragging(Some(source))) => assert_eq!(source.name(), name),
            other => panic!("expected drag echo, got {other:?}"),
        }

        handle_user_command(
            &mut s,
            UserCommand::DragEnd {
                target: Some("position:Kant".into()),
            },
            &tx,
        )
        .await;

        assert!(!s.drag.is_dragging());
        assert_eq!(s.session.board().team(Position::Kant), vec![name.as_str()]);
        assert!(matches!(rx.recv().await, Some(UiUpdate::Dragging(None))));
        match rx.recv().await {
            Some(UiUpdate::StateSnapshot(snap)) => {
                assert_eq!(snap.team[Position::Kant.sort_order()].1[0].name, name);
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn second_drag_end_is_ignored() {
        let mut s = state(None);
        let name = s.feed.players[0].name.clone();
        let (tx, mut rx) = mpsc::channel(16);

        handle_user_command(&mut s, UserCommand::DragStart(DragSource::Available(name.clone())), &tx)
            .await;
        for target in ["position:Kant", "potential:Midt"] {
            handle_user_command(
                &mut s,
                UserCommand::DragEnd {
                    target: Some(target.into()),
                },
                &tx,
            )
            .await;
        }

        assert_eq!(s.session.board().team(Position::Kant), vec![name.as_str()]);
        assert_eq!(s.session.board().potential_size(), 0);

        // Echo, drop result and snapshot from the first drop only.
        assert!(matches!(rx.recv().await, Some(UiUpdate::Dragging(Some(_)))));
        assert!(matches!(rx.recv().await, Some(UiUpdate::Dragging(None))));
        assert!(matches!(rx.recv().await, Some(UiUpdate::StateSnapshot(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn drag_end_without_drag_start_does_nothing() {
        let mut s = state(None);
        let (tx, mut rx) = mpsc::channel(16);
        handle_user_command(
            &mut s,
            UserCommand::DragEnd {
                target: Some("team".into()),
            },
            &tx,
        )
        .await;
        assert!(s.session.board().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn roster_commands_ignored_before_login() {
        let mut s = state(Some("smash"));
        let (tx, _rx) = mpsc::channel(16);
        let name = s.feed.players[0].name.clone();
        handle_user_command(&mut s, UserCommand::DragStart(DragSource::Available(name)), &tx).await;
        handle_user_command(
            &mut s,
            UserCommand::DragEnd {
                target: Some("position:Kant".into()),
            },
            &tx,
        )
        .await;
        assert!(!s.drag.is_dragging());
        assert!(s.session.board().is_empty());
    }

    #[tokio::test]
    async fn logout_cancels_drag_in_progress() {
        let mut s = state(Some("smash"));
        let (tx, mut rx) = mpsc::channel(16);
        handle_user_command(&mut s, UserCommand::Login("smash".into()), &tx).await;
        let name = s.feed.players[0].name.clone();
        handle_user_command(&mut s, UserCommand::DragStart(DragSource::Available(name)), &tx).await;
        assert!(s.drag.is_dragging());

        handle_user_command(&mut s, UserCommand::Logout, &tx).await;
        assert!(!s.drag.is_dragging());
        assert_eq!(s.view, View::Login);

        let mut saw_cancel = false;
        while let Ok(update) = rx.try_recv() {
            saw_cancel |= matches!(update, UiUpdate::Dragging(None));
        }
        assert!(saw_cancel);
    }

    #[tokio::test]
    async fn failed_login_is_reported() {
        let mut s = state(Some("smash"));
        let (tx, mut rx) = mpsc::channel(16);
        handle_user_command(&mut s, UserCommand::Login("nope".into()), &tx).await;
        assert!(matches!(rx.recv().await, Some(UiUpdate::LoginRejected)));
        assert_eq!(s.view, View::Login);
        assert_eq!(s.notifications.active()[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn refresh_without_sheet_is_informational() {
        let mut s = state(None);
        s.refresh_feed().await;
        assert_eq!(s.notifications.active()[0].severity, Severity::Info);
    }
}
