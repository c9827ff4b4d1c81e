// Messages between the application loop and the terminal UI.

use chrono::{DateTime, Utc};

use uttak_core::auth::View;
use uttak_core::drag::DragSource;
use uttak_core::filter::{Filters, SortKey};
use uttak_core::notify::Severity;
use uttak_core::player::Player;
use uttak_core::position::{Bucket, Position};

use crate::export::ExportScope;
use crate::feed::FeedOrigin;

/// One of the six attribute filters, for cycling from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Gender,
    Student,
    PreviousTeam,
    Level,
    Position,
    Age,
}

/// Commands sent from the TUI to the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Login(String),
    Logout,
    /// Raw search box contents; applied after the debounce window.
    SetSearch(String),
    CycleFilter(FilterField),
    ClearFilters,
    CycleSort,
    DragStart(DragSource),
    /// Let go of the card picked up by the last `DragStart`. `target` is a
    /// drop-zone id, or `None` when the card was let go outside any zone.
    /// Ignored when no drag is in progress.
    DragEnd {
        target: Option<String>,
    },
    Export(ExportScope),
    Refresh,
    ResetRoster,
    DismissNotification,
    Quit,
}

/// A notification as the UI shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

/// Everything the roster screen needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub view: View,
    /// Available players after filters, search and sorting.
    pub available: Vec<Player>,
    /// Available players before filtering.
    pub available_total: usize,
    pub team: Vec<(Position, Vec<Player>)>,
    pub potential: Vec<(Bucket, Vec<Player>)>,
    pub filters: Filters,
    /// The search term currently applied (not what is being typed).
    pub search: String,
    pub sort: SortKey,
    pub origin: FeedOrigin,
    pub fetched_at: Option<DateTime<Utc>>,
    pub player_count: usize,
    pub requires_login: bool,
}

/// Updates sent from the application loop to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    Notifications(Vec<NotificationView>),
    /// The card currently being dragged, if any.
    Dragging(Option<DragSource>),
    LoginRejected,
}
