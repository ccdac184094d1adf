// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the parts of the application
// state needed for drawing. The app orchestrator pushes `UiUpdate`
// messages over an mpsc channel; the TUI applies them to `ViewState`
// and re-renders at ~30 fps. All countdown display is recomputed at
// render time from the snapshot's timer so it ticks between refreshes.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::draft::{is_champion_taken, ReconciledView};
use crate::models::{Champion, DraftStatus, QueueSnapshot, Role};
use crate::protocol::{PushStatus, Screen, UiUpdate, UserCommand};

use layout::{build_draft_layout, build_stats_layout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app
/// orchestrator; never written from anywhere else.
pub struct ViewState {
    pub screen: Screen,
    /// Join code being typed on the join screen.
    pub join_input: String,
    /// Failure message from the last join attempt.
    pub join_error: Option<String>,
    /// Code of the draft we are attached to.
    pub joined_code: Option<String>,
    /// Latest reconciled view of the joined draft.
    pub view: Option<ReconciledView>,
    /// Raw snapshot behind `view`; needed for selection metadata and the
    /// live countdown.
    pub snapshot: Option<DraftStatus>,
    /// Current champion page for the picker and the stats table.
    pub champions: Vec<Champion>,
    /// Cursor position in the champion grid.
    pub picker_index: usize,
    pub queue: Option<QueueSnapshot>,
    pub push_status: PushStatus,
    /// Dismissible error shown in the phase banner.
    pub transient_error: Option<String>,
    /// Champion search text.
    pub filter_text: String,
    /// Whether the search input is capturing keystrokes.
    pub filter_mode: bool,
    pub role_filter: Option<Role>,
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            screen: Screen::Join,
            join_input: String::new(),
            join_error: None,
            joined_code: None,
            view: None,
            snapshot: None,
            champions: Vec::new(),
            picker_index: 0,
            queue: None,
            push_status: PushStatus::Idle,
            transient_error: None,
            filter_text: String::new(),
            filter_mode: false,
            role_filter: None,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// The champion under the picker cursor.
    pub fn selected_champion(&self) -> Option<&Champion> {
        self.champions.get(self.picker_index)
    }

    /// Whether a champion is already banned or picked in the joined draft.
    pub fn champion_taken(&self, champion_id: &str) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|status| is_champion_taken(status, champion_id))
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::DraftJoined { code, .. } => {
            state.joined_code = Some(code);
            state.join_error = None;
            state.join_input.clear();
            state.screen = Screen::Draft;
        }
        UiUpdate::DraftView(view) => {
            state.view = Some(*view);
        }
        UiUpdate::DraftSnapshot(snapshot) => {
            state.snapshot = Some(*snapshot);
        }
        UiUpdate::DraftLeft => {
            state.joined_code = None;
            state.view = None;
            state.snapshot = None;
            state.screen = Screen::Join;
        }
        UiUpdate::Champions(champions) => {
            state.champions = champions;
            if state.picker_index >= state.champions.len() {
                state.picker_index = state.champions.len().saturating_sub(1);
            }
        }
        UiUpdate::Queue(queue) => {
            state.queue = Some(*queue);
        }
        UiUpdate::PushStatusChanged(status) => {
            state.push_status = status;
        }
        UiUpdate::JoinFailed { message, .. } => {
            state.join_error = Some(message);
        }
        UiUpdate::TransientError(message) => {
            state.transient_error = Some(message);
        }
        UiUpdate::ErrorCleared => {
            state.transient_error = None;
        }
        UiUpdate::Shutdown => {
            // Handled by the main loop.
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    match state.screen {
        Screen::Join => {
            widgets::join::render(frame, frame.area(), state);
        }
        Screen::Draft => {
            let layout = build_draft_layout(frame.area());
            widgets::status_bar::render(frame, layout.status_bar, state);
            widgets::phase_banner::render(frame, layout.phase_banner, state);
            widgets::teams::render(frame, layout.teams, state);
            widgets::picker::render(frame, layout.picker, state);
            widgets::help_bar::render(frame, layout.help_bar, state);
        }
        Screen::Stats => {
            let layout = build_stats_layout(frame.area());
            widgets::status_bar::render(frame, layout.status_bar, state);
            widgets::queue::render(frame, layout.queue, state);
            widgets::champion_stats::render(frame, layout.champions, state);
            widgets::help_bar::render(frame, layout.help_bar, state);
        }
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
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

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(UiUpdate::Shutdown) | None => break,
                    Some(update) => apply_ui_update(&mut view_state, update),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quitting = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Resize is handled by the next draw; mouse ignored.
                    }
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
