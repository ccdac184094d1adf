// Team boards widget: each side's bans and per-role picks.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::draft::TeamBoard;
use crate::models::{TeamSide, ROLES};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (blue, red, active) = match &state.view {
        Some(view) => (
            Some(&view.blue),
            Some(&view.red),
            view.actionable.then_some(view.current_team),
        ),
        None => (None, None, None),
    };

    render_side(frame, halves[0], TeamSide::Blue, blue, active, state);
    render_side(frame, halves[1], TeamSide::Red, red, active, state);
}

fn render_side(
    frame: &mut Frame,
    area: Rect,
    side: TeamSide,
    board: Option<&TeamBoard>,
    active: Option<TeamSide>,
    state: &ViewState,
) {
    let name = state
        .snapshot
        .as_ref()
        .map(|s| match side {
            TeamSide::Blue => s.teams.blue.name.clone(),
            TeamSide::Red => s.teams.red.name.clone(),
        })
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| side.to_string());

    let border_color = match side {
        TeamSide::Blue => Color::Blue,
        TeamSide::Red => Color::Red,
    };
    let mut title_style = Style::default().fg(border_color);
    if active == Some(side) {
        title_style = title_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }

    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("Bans: {}", bans_line(board)),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::default());

    for role in ROLES {
        let pick = board.and_then(|b| b.pick_for_role(role));
        let (text, style) = match pick {
            Some(selection) => (
                selection.champion.name.clone(),
                Style::default().fg(Color::White),
            ),
            None => ("--".to_string(), Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<8}", role.display_str()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(text, style),
        ]));
    }

    // Picks recorded without a role land below the fixed slots.
    if let Some(board) = board {
        for selection in board.picks.iter().filter(|s| s.role.is_none()) {
            lines.push(Line::from(Span::styled(
                format!("{:<8}{}", "?", selection.champion.name),
                Style::default().fg(Color::White),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(format!(" {name} "), title_style)),
    );
    frame.render_widget(paragraph, area);
}

/// One-line ban summary, oldest first.
pub fn bans_line(board: Option<&TeamBoard>) -> String {
    match board {
        Some(board) if !board.bans.is_empty() => board
            .bans
            .iter()
            .map(|s| s.champion.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ => "none".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
