// Status bar widget: push channel indicator, joined draft, lifecycle.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{PushStatus, Screen};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [push indicator] [draft code + lifecycle] [screen tabs]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, dot_color) = push_indicator(state.push_status);
    spans.push(Span::styled(
        format!(" {dot} "),
        Style::default().fg(dot_color),
    ));
    spans.push(Span::styled(
        format!("{} ", state.push_status.label()),
        Style::default().fg(Color::Gray),
    ));

    if let Some(code) = &state.joined_code {
        spans.push(Span::styled(
            format!("draft {code}"),
            Style::default().fg(Color::White),
        ));
        if let Some(view) = &state.view {
            spans.push(Span::styled(
                format!(" [{}]", view.lifecycle),
                Style::default().fg(lifecycle_color(view.actionable)),
            ));
        }
    } else {
        spans.push(Span::styled(
            "no draft",
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.extend(screen_spans(state.screen));

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the push channel dot character and its color.
pub fn push_indicator(status: PushStatus) -> (&'static str, Color) {
    match status {
        PushStatus::Connected => ("●", Color::Green),
        PushStatus::Connecting => ("●", Color::Yellow),
        PushStatus::Degraded => ("●", Color::Magenta),
        PushStatus::Idle => ("○", Color::DarkGray),
    }
}

fn lifecycle_color(actionable: bool) -> Color {
    if actionable {
        Color::Green
    } else {
        Color::Yellow
    }
}

/// Build screen tab spans with the active screen highlighted.
pub fn screen_spans(active: Screen) -> Vec<Span<'static>> {
    let screens = [(Screen::Draft, "1:Draft"), (Screen::Stats, "2:Stats")];

    let mut spans = Vec::new();
    for (screen, label) in screens {
        // The join screen shows under the Draft tab.
        let is_active = screen == active || (screen == Screen::Draft && active == Screen::Join);
        let style = if is_active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{label}]"), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_colors_distinguish_states() {
        assert_eq!(push_indicator(PushStatus::Connected).1, Color::Green);
        assert_eq!(push_indicator(PushStatus::Connecting).1, Color::Yellow);
        assert_eq!(push_indicator(PushStatus::Degraded).1, Color::Magenta);
        assert_eq!(push_indicator(PushStatus::Idle).0, "○");
    }

    #[test]
    fn join_screen_highlights_draft_tab() {
        let spans = screen_spans(Screen::Join);
        // First span is the Draft tab; it should carry the active style.
        assert_eq!(spans[0].style.bg, Some(Color::White));
    }

    #[test]
    fn render_does_not_panic_default() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_joined_draft() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.joined_code = Some("AB12".to_string());
        state.push_status = PushStatus::Connected;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
