use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Left zone: service
            Constraint::Min(10),        // Right zone: activity / error
        ])
        .split(area);

    render_left_zone(frame, app, chunks[0]);
    render_right_zone(frame, app, chunks[1]);
}

fn render_left_zone(frame: &mut Frame, app: &App, area: Rect) {
    let content = Line::from(vec![
        Span::styled(
            " typeahead ",
            Style::default()
                .fg(app.theme.frost_ice())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" › ", Style::default().fg(app.theme.muted())),
        Span::styled(
            super::truncate(&app.service_label, area.width.saturating_sub(14) as usize),
            Style::default().fg(app.theme.fg()),
        ),
    ]);

    frame.render_widget(
        Paragraph::new(content).style(Style::default().bg(app.theme.bg_secondary())),
        area,
    );
}

fn render_right_zone(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();

    if let Some(err) = app.controller.last_error() {
        spans.push(Span::styled(
            super::truncate(err, area.width.saturating_sub(2) as usize),
            Style::default()
                .fg(app.theme.danger())
                .add_modifier(Modifier::DIM),
        ));
    } else if app.controller.in_flight() > 0 {
        spans.push(Span::styled(
            format!("{} in flight", app.controller.in_flight()),
            Style::default().fg(app.theme.yellow()),
        ));
    } else if app.controller.is_debouncing() {
        spans.push(Span::styled("…", Style::default().fg(app.theme.muted())));
    } else {
        spans.push(Span::styled(
            format!("{} results", app.controller.suggestions().len()),
            Style::default().fg(app.theme.green()),
        ));
    }
    spans.push(Span::raw(" "));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(ratatui::layout::Alignment::Right)
            .style(Style::default().bg(app.theme.bg_secondary())),
        area,
    );
}

#[cfg(test)]
mod tests {
    use crate::app::tests::mock_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use typeahead_core::{FetchOutcome, TypeaheadError};

    #[tokio::test]
    async fn error_is_shown_in_status_bar() {
        let mut app = mock_app();
        app.controller.apply(FetchOutcome {
            seq: 1,
            query: "x".to_string(),
            result: Err(TypeaheadError::Parse("bad body".to_string())),
        });

        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|frame| super::render(frame, &app, frame.area()))
            .unwrap();
        let line: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(line.contains("parse error: bad body"));
        assert!(line.contains("mock"));
    }
}
