use crossterm::event::{KeyCode, KeyModifiers};

use crate::app::App;

/// Main key dispatch.
pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('u') => app.clear_input(),
            KeyCode::Char('n') => app.select_next(),
            KeyCode::Char('p') => app.select_prev(),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Tab | KeyCode::Enter => {
            app.accept_selection();
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
}
