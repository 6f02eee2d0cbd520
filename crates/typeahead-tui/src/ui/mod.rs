pub(crate) mod statusbar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search field
            Constraint::Length(1), // heading
            Constraint::Min(1),    // suggestions
            Constraint::Length(1), // status bar
        ])
        .split(size);

    render_input(frame, app, chunks[0]);
    render_heading(frame, app, chunks[1]);
    render_suggestions(frame, app, chunks[2]);
    statusbar::render(frame, app, chunks[3]);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.frost_blue()))
        .style(Style::default().bg(app.theme.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let query = app.controller.input();
    let line = Line::from(vec![
        Span::styled(
            " Search: ",
            Style::default()
                .fg(app.theme.yellow())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(query, Style::default().fg(app.theme.fg_bright())),
        Span::styled(
            " ",
            Style::default().bg(app.theme.frost_ice()).fg(app.theme.bg()),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_heading(frame: &mut Frame, app: &App, area: Rect) {
    let heading = Paragraph::new(Span::styled(
        " Suggestions",
        Style::default()
            .fg(app.theme.frost_ice())
            .add_modifier(Modifier::BOLD),
    ))
    .style(Style::default().bg(app.theme.bg()));
    frame.render_widget(heading, area);
}

fn render_suggestions(frame: &mut Frame, app: &App, area: Rect) {
    let suggestions = app.controller.suggestions();

    if suggestions.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "   No suggestions.",
            Style::default().fg(app.theme.muted()),
        ))
        .style(Style::default().bg(app.theme.bg()));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = suggestions
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            let is_selected = app.selected == Some(i);
            let prefix = if is_selected { " ▶ " } else { " • " };
            let line = Line::from(vec![
                Span::styled(prefix, Style::default().fg(app.theme.frost_ice())),
                Span::styled(
                    truncate(suggestion, area.width.saturating_sub(4) as usize),
                    Style::default().fg(if is_selected {
                        app.theme.fg_bright()
                    } else {
                        app.theme.fg()
                    }),
                ),
            ]);
            let style = if is_selected {
                Style::default().bg(app.theme.bg_secondary())
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    // List scrolls its offset so the highlighted row stays on screen.
    let mut state = ListState::default().with_selected(app.selected);
    frame.render_stateful_widget(
        List::new(items).style(Style::default().bg(app.theme.bg())),
        area,
        &mut state,
    );
}

// ─── Helpers ───────────────────────────────────────────────

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{load, mock_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        draw_sized(app, 40, 10)
    }

    fn draw_sized(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn empty_list_shows_placeholder() {
        let app = mock_app();
        let screen = draw(&app);
        assert!(screen.contains("Search:"));
        assert!(screen.contains("Suggestions"));
        assert!(screen.contains("No suggestions."));
    }

    #[tokio::test]
    async fn suggestions_render_in_order() {
        let mut app = mock_app();
        load(&mut app, &["alpha", "beta", "gamma"]);
        let screen = draw(&app);

        assert!(!screen.contains("No suggestions."));
        let a = screen.find("alpha").unwrap();
        let b = screen.find("beta").unwrap();
        let g = screen.find("gamma").unwrap();
        assert!(a < b && b < g);
    }

    #[tokio::test]
    async fn highlighted_row_scrolls_into_view() {
        let mut app = mock_app();
        load(&mut app, &["alpha", "beta", "gamma", "delta", "epsilon"]);

        // 7 rows leave 2 for the list.
        let screen = draw_sized(&app, 40, 7);
        assert!(screen.contains("alpha"));
        assert!(!screen.contains("epsilon"));

        app.select_prev();
        let screen = draw_sized(&app, 40, 7);
        assert!(screen.contains("epsilon"));
        assert!(!screen.contains("alpha"));
    }

    #[tokio::test(start_paused = true)]
    async fn input_text_is_shown() {
        let mut app = mock_app();
        app.push_char('r');
        app.push_char('s');
        assert!(draw(&app).contains("Search: rs"));
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
