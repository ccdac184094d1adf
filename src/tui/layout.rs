// Screen layouts: panel arrangement and sizing.
//
// The draft screen divides the terminal into fixed zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Phase Banner (4 rows)                             |
// +-------------------------+------------------------+
// | Team Boards (55%)        | Champion Picker (45%)  |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The stats screen replaces the middle section with the guild queue on
// the left and champion rates on the right.

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Resolved screen areas for the draft screen.
#[derive(Debug, Clone)]
pub struct DraftLayout {
    /// Top row: push channel status, joined code, lifecycle.
    pub status_bar: Rect,
    /// Second row: whose turn, phase, countdown, transient errors.
    pub phase_banner: Rect,
    /// Left of the middle section: both teams' bans and picks.
    pub teams: Rect,
    /// Right of the middle section: champion grid with filters.
    pub picker: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Resolved screen areas for the stats screen.
#[derive(Debug, Clone)]
pub struct StatsLayout {
    pub status_bar: Rect,
    /// Left: per-role queue occupancy and readiness.
    pub queue: Rect,
    /// Right: champion pick/ban/win rates.
    pub champions: Rect,
    pub help_bar: Rect,
}

/// Build the draft screen layout from the available terminal area.
pub fn build_draft_layout(area: Rect) -> DraftLayout {
    let [status_bar, phase_banner, middle, help_bar] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(middle);

    DraftLayout {
        status_bar,
        phase_banner,
        teams: columns[0],
        picker: columns[1],
        help_bar,
    }
}

/// Build the stats screen layout from the available terminal area.
pub fn build_stats_layout(area: Rect) -> StatsLayout {
    let [status_bar, middle, help_bar] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(middle);

    StatsLayout {
        status_bar,
        queue: columns[0],
        champions: columns[1],
        help_bar,
    }
}

/// Centered box for the join-code prompt.
pub fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
    let [horizontal] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(horizontal);
    rect
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
