// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the roster snapshot pushed by the
// application loop. `UiUpdate` messages arrive over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod panels;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use uttak_app::feed::FeedOrigin;
use uttak_app::protocol::{AppSnapshot, NotificationView, UiUpdate, UserCommand};
use uttak_core::auth::View;
use uttak_core::drag::DragSource;
use uttak_core::filter::{Filters, SortKey};
use uttak_core::player::Player;
use uttak_core::position::{Bucket, Position};

use layout::build_layout;
use panels::Panel;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Roster data is replaced wholesale by each snapshot. Cursor, focus and
/// text-input state are owned by the TUI and survive snapshots.
pub struct ViewState {
    pub view: View,
    /// Available players, filtered and sorted by the application loop.
    pub available: Vec<Player>,
    pub available_total: usize,
    pub team: Vec<(Position, Vec<Player>)>,
    pub potential: Vec<(Bucket, Vec<Player>)>,
    pub filters: Filters,
    /// Search term the application has applied.
    pub search: String,
    pub sort: SortKey,
    /// Where the player list came from; `None` until the first snapshot.
    pub origin: Option<FeedOrigin>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub player_count: usize,
    pub requires_login: bool,

    pub notifications: Vec<NotificationView>,
    /// Card currently picked up.
    pub dragging: Option<DragSource>,

    /// Panel receiving cursor keys.
    pub focus: Panel,
    /// Per-panel cursor rows.
    pub cursors: HashMap<Panel, usize>,
    /// Whether keystrokes go to the search box.
    pub search_mode: bool,
    /// Search box contents as typed.
    pub search_input: String,
    /// Password field on the login view.
    pub password_input: String,
    pub login_rejected: bool,
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            view: View::Roster,
            available: Vec::new(),
            available_total: 0,
            team: Vec::new(),
            potential: Vec::new(),
            filters: Filters::default(),
            search: String::new(),
            sort: SortKey::default(),
            origin: None,
            fetched_at: None,
            player_count: 0,
            requires_login: false,
            notifications: Vec::new(),
            dragging: None,
            focus: Panel::Available,
            cursors: HashMap::new(),
            search_mode: false,
            search_input: String::new(),
            password_input: String::new(),
            login_rejected: false,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Apply a full state snapshot from the application loop.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        if snapshot.view != self.view {
            self.password_input.clear();
            self.dragging = None;
        }
        if snapshot.view == View::Roster {
            self.login_rejected = false;
        }
        self.view = snapshot.view;
        self.available = snapshot.available;
        self.available_total = snapshot.available_total;
        self.team = snapshot.team;
        self.potential = snapshot.potential;
        self.filters = snapshot.filters;
        if !self.search_mode {
            self.search_input = snapshot.search.clone();
        }
        self.search = snapshot.search;
        self.sort = snapshot.sort;
        self.origin = Some(snapshot.origin);
        self.fetched_at = snapshot.fetched_at;
        self.player_count = snapshot.player_count;
        self.requires_login = snapshot.requires_login;
    }

    pub fn team_size(&self) -> usize {
        self.team.iter().map(|(_, ps)| ps.len()).sum()
    }

    pub fn potential_size(&self) -> usize {
        self.potential.iter().map(|(_, ps)| ps.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Notifications(list) => {
            state.notifications = list;
        }
        UiUpdate::Dragging(source) => {
            state.dragging = source;
        }
        UiUpdate::LoginRejected => {
            state.login_rejected = true;
            state.password_input.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen for the current view.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();

    match state.view {
        View::Login => widgets::login::render(frame, area, state),
        View::Roster => {
            let layout = build_layout(area);
            widgets::status_bar::render(frame, layout.status_bar, state);
            widgets::filter_bar::render(frame, layout.filter_bar, state);
            widgets::available::render(frame, layout.available, state);
            widgets::team::render(frame, layout.team, state);
            widgets::potential::render(frame, layout.potential, state);
            widgets::help_bar::render(frame, layout.help_bar, state);
        }
    }

    widgets::notifications::render(frame, area, &state.notifications);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, area);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Selects over UI updates, keyboard input and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        info!("UI channel closed, leaving TUI");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("terminal input error: {}", e);
                        break Err(e.into());
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
