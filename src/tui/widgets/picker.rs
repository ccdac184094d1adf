// Champion picker widget: filterable grid with taken champions dimmed.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Logical grid width; navigation in the input handler moves the cursor
/// by this much for up/down.
pub const GRID_COLS: usize = 3;

const CELL_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();

    lines.push(filter_line(state));
    lines.push(Line::default());

    // Keep the cursor's row visible in the available height.
    let visible_rows = (area.height as usize).saturating_sub(4).max(1);
    let cursor_row = state.picker_index / GRID_COLS;
    let first_row = cursor_row.saturating_sub(visible_rows.saturating_sub(1));

    for (row_idx, row) in state
        .champions
        .chunks(GRID_COLS)
        .enumerate()
        .skip(first_row)
        .take(visible_rows)
    {
        let mut spans = Vec::new();
        for (col_idx, champ) in row.iter().enumerate() {
            let index = row_idx * GRID_COLS + col_idx;
            let taken = state.champion_taken(&champ.id);
            let mut style = if taken {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };
            if index == state.picker_index {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(
                format!("{:<CELL_WIDTH$}", truncate(&champ.name, CELL_WIDTH - 1)),
                style,
            ));
        }
        lines.push(Line::from(spans));
    }

    if state.champions.is_empty() {
        lines.push(Line::from(Span::styled(
            "No champions match the current filter",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Champions"));
    frame.render_widget(paragraph, area);
}

fn filter_line(state: &ViewState) -> Line<'static> {
    let search = if state.filter_mode {
        format!("/{}_", state.filter_text)
    } else if !state.filter_text.is_empty() {
        format!("/{}", state.filter_text)
    } else {
        String::from("(/ to search)")
    };
    let role = match state.role_filter {
        Some(role) => format!("role: {role}"),
        None => "role: ALL".to_string(),
    };
    Line::from(vec![
        Span::styled(search, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(role, Style::default().fg(Color::Gray)),
    ])
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        name.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Champion, Role};

    fn champion(id: &str, name: &str) -> Champion {
        serde_json::from_value(serde_json::json!({"id": id, "name": name})).unwrap()
    }

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("Ahri", 15), "Ahri");
        assert_eq!(truncate("Nunu & Willump!!", 8), "Nunu & …");
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_grid_and_filters() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.champions = (0..20)
            .map(|i| champion(&format!("c{i}"), &format!("Champ {i}")))
            .collect();
        state.picker_index = 7;
        state.filter_text = "ch".to_string();
        state.role_filter = Some(Role::Jungle);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_cursor_beyond_visible_rows() {
        let backend = ratatui::backend::TestBackend::new(60, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.champions = (0..60)
            .map(|i| champion(&format!("c{i}"), &format!("Champ {i}")))
            .collect();
        state.picker_index = 59;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
