// Message types flowing between the input handler, the orchestrator, and
// the TUI render loop.

use crate::draft::ReconciledView;
use crate::models::{Champion, DraftStatus, QueueSnapshot, Role};

/// Which screen the TUI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Join-code entry.
    Join,
    /// Live draft board plus champion picker.
    Draft,
    /// Guild queue occupancy and champion stats.
    Stats,
}

/// Health of the push channel for the currently joined draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushStatus {
    /// No draft joined, so no push channel either.
    #[default]
    Idle,
    Connecting,
    Connected,
    /// Reconnect attempts exhausted; polling still covers updates.
    Degraded,
}

impl PushStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PushStatus::Idle => "idle",
            PushStatus::Connecting => "connecting",
            PushStatus::Connected => "live",
            PushStatus::Degraded => "polling only",
        }
    }
}

/// Commands sent from the input handler to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Join a draft by its short code.
    JoinDraft(String),
    /// Leave the current draft and return to the join screen.
    LeaveDraft,
    /// Attempt to select a champion in the current phase.
    SelectChampion(String),
    /// Update the champion picker search filter.
    SearchChampions(String),
    /// Filter the champion picker by role, or clear the filter.
    FilterRole(Option<Role>),
    /// Switch to the given screen.
    ShowScreen(Screen),
    /// Force an immediate status refresh.
    Refresh,
    Quit,
}

/// Updates sent from the orchestrator to the TUI.
///
/// Large payloads are boxed to keep the enum small on the channel.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Successfully joined a draft; carries its server-canonical code.
    DraftJoined { code: String },
    /// Fresh reconciled view of the joined draft. Sent on every poll tick
    /// and push-triggered refresh.
    DraftView(Box<ReconciledView>),
    /// Raw snapshot alongside the view, for widgets that need selection
    /// metadata the view does not carry.
    DraftSnapshot(Box<DraftStatus>),
    /// Left the draft (user action or draft no longer found).
    DraftLeft,
    /// Champion page for the picker or the stats screen.
    Champions(Vec<Champion>),
    /// Guild queue occupancy.
    Queue(Box<QueueSnapshot>),
    PushStatusChanged(PushStatus),
    /// A join attempt failed. `not_found` distinguishes a bad code from a
    /// transport problem.
    JoinFailed { not_found: bool, message: String },
    /// Transient error to surface in the banner. Cleared by ErrorCleared.
    TransientError(String),
    ErrorCleared,
    Shutdown,
}
