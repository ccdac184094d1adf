// Help bar widget: keyboard shortcut hints for the current mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::Screen;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        return " Quit? y:Yes n:No";
    }
    if state.filter_mode {
        return " Type to search | Enter:Apply Esc:Clear";
    }
    match state.screen {
        Screen::Join => " Type code, Enter:Join | Tab:Stats | Ctrl+C:Quit",
        Screen::Draft => {
            " Arrows:Move Enter:Select | /:Search f:Role r:Refresh | Esc:Leave 2:Stats q:Quit"
        }
        Screen::Stats => " 1:Draft | q:Quit",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
