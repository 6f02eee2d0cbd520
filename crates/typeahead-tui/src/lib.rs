pub mod app;
pub mod event;
pub mod keys;
pub mod theme;
pub mod ui;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use app::App;
use event::{AppEvent, EventHandler};

/// Raw mode, alternate screen and bracketed paste for as long as it lives.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn start() -> Result<Self> {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            original_hook(info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableBracketedPaste)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = stdout.execute(DisableBracketedPaste);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Run the full TUI application.
///
/// Blocks the calling thread. Fetches are spawned on the ambient Tokio
/// runtime, so the caller must have entered one (a multi-threaded runtime,
/// since this thread never yields to it).
pub fn run_tui(app: &mut App) -> Result<()> {
    let mut session = TerminalSession::start()?;
    let event_handler = EventHandler::new(Duration::from_millis(50));
    tracing::info!(service = %app.service_label, "tui started");

    while !app.should_quit {
        session.terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            AppEvent::Key(key) => keys::handle_key(app, key.code, key.modifiers),
            AppEvent::Paste(text) => app.paste(&text),
            AppEvent::Tick => {}
        }

        if app.tick() {
            tracing::debug!(
                input = app.controller.input(),
                count = app.controller.suggestions().len(),
                "suggestions replaced"
            );
        }
    }

    drop(session);
    tracing::info!("tui stopped");
    Ok(())
}
