// Phase banner widget: current team, phase, countdown, transient errors.

use chrono::Utc;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::draft::remaining_seconds;
use crate::models::{ActionType, Lifecycle, TeamSide};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();

    match &state.view {
        Some(view) if view.actionable => {
            let team_color = side_color(view.current_team);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", view.current_team),
                    Style::default().fg(team_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("to {} ", action_verb(view.action)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("(turn {})", view.current_turn),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  {}", countdown_text(state)),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
        }
        Some(view) => {
            lines.push(Line::from(Span::styled(
                lifecycle_message(view.lifecycle),
                Style::default().fg(Color::Yellow),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Waiting for draft state...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if let Some(error) = &state.transient_error {
        lines.push(Line::from(Span::styled(
            format!("! {error}"),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Draft"));
    frame.render_widget(paragraph, area);
}

fn action_verb(action: ActionType) -> &'static str {
    match action {
        ActionType::Ban => "BAN",
        ActionType::Pick => "PICK",
    }
}

fn side_color(side: TeamSide) -> Color {
    match side {
        TeamSide::Blue => Color::Blue,
        TeamSide::Red => Color::Red,
    }
}

fn lifecycle_message(lifecycle: Lifecycle) -> &'static str {
    match lifecycle {
        Lifecycle::Waiting => "Waiting for captains to be ready",
        Lifecycle::Completed => "Draft complete",
        Lifecycle::Cancelled => "Draft cancelled",
        Lifecycle::Drafting => "",
    }
}

/// Countdown text recomputed from the snapshot's deadline at render
/// time, so it ticks between status refreshes.
fn countdown_text(state: &ViewState) -> String {
    let remaining = state
        .snapshot
        .as_ref()
        .and_then(|s| s.timer_end)
        .map(|end| remaining_seconds(end, Utc::now()));
    match remaining {
        Some(secs) => format_countdown(secs),
        None => String::new(),
    }
}

/// Format seconds as M:SS.
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
