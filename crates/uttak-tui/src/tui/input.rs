// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// application loop, or into local ViewState changes (focus, cursor, text
// input). The drag gesture is: Space picks up the card under the cursor,
// Enter drops it on the zone under the cursor, Esc lets go outside any zone.
// The app loop owns the held card; `ViewState::dragging` only mirrors its
// `UiUpdate::Dragging` echoes.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use uttak_app::export::ExportScope;
use uttak_app::protocol::{FilterField, UserCommand};
use uttak_core::auth::View;

use super::panels::{drop_target, move_cursor, pick_up_source};
use super::ViewState;

/// Rows moved by PageUp/PageDown.
const PAGE: isize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// application loop; `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.view == View::Login {
        return handle_login(key_event, view_state);
    }

    if view_state.search_mode {
        return handle_search_mode(key_event, view_state);
    }

    if view_state.dragging.is_some() {
        if let Some(cmd) = handle_drag_keys(key_event, view_state) {
            return Some(cmd);
        }
    }

    match key_event.code {
        // Focus and cursor
        KeyCode::Tab | KeyCode::Right => {
            view_state.focus = view_state.focus.next();
            None
        }
        KeyCode::BackTab | KeyCode::Left => {
            view_state.focus = view_state.focus.prev();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_cursor(view_state, -PAGE);
            None
        }
        KeyCode::PageDown => {
            move_cursor(view_state, PAGE);
            None
        }

        // Drag gesture
        KeyCode::Char(' ') => pick_up_source(view_state).map(UserCommand::DragStart),

        // Search and filters
        KeyCode::Char('/') => {
            view_state.search_mode = true;
            None
        }
        KeyCode::Char('g') => Some(UserCommand::CycleFilter(FilterField::Gender)),
        KeyCode::Char('s') => Some(UserCommand::CycleFilter(FilterField::Student)),
        KeyCode::Char('t') => Some(UserCommand::CycleFilter(FilterField::PreviousTeam)),
        KeyCode::Char('n') => Some(UserCommand::CycleFilter(FilterField::Level)),
        KeyCode::Char('p') => Some(UserCommand::CycleFilter(FilterField::Position)),
        KeyCode::Char('a') => Some(UserCommand::CycleFilter(FilterField::Age)),
        KeyCode::Char('c') => {
            view_state.search_input.clear();
            Some(UserCommand::ClearFilters)
        }
        KeyCode::Char('o') => Some(UserCommand::CycleSort),

        // Actions
        KeyCode::Char('e') => Some(UserCommand::Export(ExportScope::Team)),
        KeyCode::Char('E') => Some(UserCommand::Export(ExportScope::Filtered)),
        KeyCode::Char('r') => Some(UserCommand::Refresh),
        KeyCode::Char('R') => Some(UserCommand::ResetRoster),
        KeyCode::Char('x') => Some(UserCommand::DismissNotification),
        KeyCode::Char('L') if view_state.requires_login => Some(UserCommand::Logout),

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Enter drops the held card on the zone under the cursor; Esc drops it
/// outside every zone. Other keys fall through so the cursor can move.
fn handle_drag_keys(key_event: KeyEvent, view_state: &ViewState) -> Option<UserCommand> {
    let target = match key_event.code {
        KeyCode::Enter => drop_target(view_state),
        KeyCode::Esc => None,
        _ => return None,
    };
    Some(UserCommand::DragEnd { target })
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Every keystroke in the search box is forwarded; the application loop
/// debounces them.
fn handle_search_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.search_mode = false;
            view_state.search_input.clear();
            Some(UserCommand::SetSearch(String::new()))
        }
        KeyCode::Enter => {
            view_state.search_mode = false;
            None
        }
        KeyCode::Backspace => {
            view_state.search_input.pop();
            Some(UserCommand::SetSearch(view_state.search_input.clone()))
        }
        KeyCode::Char(c) => {
            view_state.search_input.push(c);
            Some(UserCommand::SetSearch(view_state.search_input.clone()))
        }
        _ => None,
    }
}

fn handle_login(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => {
            let attempt = std::mem::take(&mut view_state.password_input);
            Some(UserCommand::Login(attempt))
        }
        KeyCode::Esc => {
            if view_state.password_input.is_empty() {
                view_state.confirm_quit = true;
            } else {
                view_state.password_input.clear();
            }
            None
        }
        KeyCode::Backspace => {
            view_state.password_input.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.login_rejected = false;
            view_state.password_input.push(c);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
