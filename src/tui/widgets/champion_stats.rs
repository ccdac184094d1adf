// Champion stats widget: pick/ban/win rates for the stats screen.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec!["Champion", "Pick%", "Ban%", "Win%"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .champions
        .iter()
        .map(|champ| {
            Row::new(vec![
                Cell::from(champ.name.clone()),
                Cell::from(rate_cell(champ.pick_rate)),
                Cell::from(rate_cell(champ.ban_rate)),
                Cell::from(rate_cell(champ.win_rate)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Champion Stats"));
    frame.render_widget(table, area);
}

/// Rates are absent until the service has match data.
pub fn rate_cell(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}", rate * 100.0),
        None => "--".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
