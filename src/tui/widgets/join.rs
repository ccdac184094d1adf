// Join screen: centered prompt for a draft code.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::layout::centered_box;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let rect = centered_box(area, 46, 8);
    frame.render_widget(Clear, rect);

    let mut lines = vec![
        Line::from(Span::styled(
            "Enter a draft code to join:",
            Style::default().fg(Color::White),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("> {}_", state.join_input),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];

    if let Some(error) = &state.join_error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Join Draft"));
    frame.render_widget(paragraph, rect);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
