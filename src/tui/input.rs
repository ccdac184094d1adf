// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState mutations (grid cursor movement,
// text entry, mode switching).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::widgets::picker::GRID_COLS;
use super::ViewState;
use crate::models::ROLES;
use crate::protocol::{Screen, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator. Returns `None` when the key press was handled
/// locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // On Windows, crossterm emits both Press and Release events for each
    // physical keypress; ignoring non-Press events prevents
    // double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode.
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match view_state.screen {
        Screen::Join => handle_join_screen(key_event, view_state),
        Screen::Draft => handle_draft_screen(key_event, view_state),
        Screen::Stats => handle_stats_screen(key_event, view_state),
    }
}

// ---------------------------------------------------------------------------
// Per-screen handlers
// ---------------------------------------------------------------------------

/// Join screen: free-text code entry, so letter shortcuts (including q)
/// are not available here.
fn handle_join_screen(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '-' => {
            view_state.join_input.push(c.to_ascii_uppercase());
            None
        }
        KeyCode::Backspace => {
            view_state.join_input.pop();
            None
        }
        KeyCode::Enter => {
            let code = view_state.join_input.trim().to_string();
            if code.is_empty() {
                return None;
            }
            Some(UserCommand::JoinDraft(code))
        }
        KeyCode::Esc => {
            view_state.join_input.clear();
            view_state.join_error = None;
            None
        }
        KeyCode::Tab => {
            view_state.screen = Screen::Stats;
            Some(UserCommand::ShowScreen(Screen::Stats))
        }
        _ => None,
    }
}

fn handle_draft_screen(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        // Grid cursor
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.picker_index = view_state.picker_index.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            move_cursor_to(view_state, view_state.picker_index + 1);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.picker_index =
                view_state.picker_index.saturating_sub(GRID_COLS);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor_to(view_state, view_state.picker_index + GRID_COLS);
            None
        }

        KeyCode::Enter => view_state
            .selected_champion()
            .map(|champ| UserCommand::SelectChampion(champ.id.clone())),

        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }

        KeyCode::Char('f') => {
            let next = next_role_filter(view_state.role_filter);
            view_state.role_filter = next;
            view_state.picker_index = 0;
            Some(UserCommand::FilterRole(next))
        }

        KeyCode::Char('r') => Some(UserCommand::Refresh),

        KeyCode::Esc => Some(UserCommand::LeaveDraft),

        KeyCode::Char('2') | KeyCode::Tab => {
            view_state.screen = Screen::Stats;
            Some(UserCommand::ShowScreen(Screen::Stats))
        }

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

fn handle_stats_screen(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('1') | KeyCode::Tab | KeyCode::Esc => {
            let target = if view_state.joined_code.is_some() {
                Screen::Draft
            } else {
                Screen::Join
            };
            view_state.screen = target;
            Some(UserCommand::ShowScreen(target))
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Quit confirmation: y/q confirm, n/Esc cancel, everything else blocked.
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

/// Search entry: printable characters edit the filter, Enter applies it,
/// Esc clears it. Both exits re-query the champion list.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
            view_state.picker_index = 0;
            Some(UserCommand::SearchChampions(String::new()))
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
            view_state.picker_index = 0;
            Some(UserCommand::SearchChampions(view_state.filter_text.clone()))
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Move the picker cursor, clamped to the champion list.
fn move_cursor_to(view_state: &mut ViewState, target: usize) {
    if view_state.champions.is_empty() {
        view_state.picker_index = 0;
        return;
    }
    view_state.picker_index = target.min(view_state.champions.len() - 1);
}

/// Cycle the role filter: None -> TOP -> ... -> SUPPORT -> None.
fn next_role_filter(current: Option<crate::models::Role>) -> Option<crate::models::Role> {
    match current {
        None => Some(ROLES[0]),
        Some(role) => {
            let idx = ROLES.iter().position(|r| *r == role);
            match idx {
                Some(i) if i + 1 < ROLES.len() => Some(ROLES[i + 1]),
                _ => None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
