// Guild queue widget: per-role occupancy and readiness.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::models::{QueueSnapshot, ROLES};
use crate::tui::ViewState;

/// Players needed per role to fill both teams.
const SLOTS_PER_ROLE: usize = 2;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();

    match &state.queue {
        Some(queue) => {
            for role in ROLES {
                let count = queue.role_count(role);
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:<8}", role.display_str()),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(
                        role_fill(count, SLOTS_PER_ROLE),
                        Style::default().fg(fill_color(count)),
                    ),
                    Span::styled(
                        format!(" {count}/{SLOTS_PER_ROLE}"),
                        Style::default().fg(Color::White),
                    ),
                ]));
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!(
                    "{} queued, {:.0}% full",
                    queue.stats.total_players,
                    queue.stats.progress * 100.0
                ),
                Style::default().fg(Color::White),
            )));
            if queue.stats.is_ready {
                lines.push(Line::from(Span::styled(
                    "Queue ready!",
                    Style::default().fg(Color::Green),
                )));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Waiting for queue data...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Queue"));
    frame.render_widget(paragraph, area);
}

/// Occupancy bar for a role, e.g. `[##.]` but with block glyphs.
pub fn role_fill(count: usize, slots: usize) -> String {
    let filled = count.min(slots);
    let mut bar = String::new();
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..slots {
        bar.push('░');
    }
    // Overfull queues happen when more players wait than slots exist.
    if count > slots {
        bar.push('+');
    }
    bar
}

fn fill_color(count: usize) -> Color {
    match count {
        0 => Color::DarkGray,
        1 => Color::Yellow,
        _ => Color::Green,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
