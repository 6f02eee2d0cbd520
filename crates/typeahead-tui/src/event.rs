use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Terminal input, reduced to what the search field reacts to.
#[derive(Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// A key press or auto-repeat. Releases are filtered out.
    Key(KeyEvent),
    /// Bracketed paste; applied as one input change instead of one per char.
    Paste(String),
    /// Nothing arrived within the tick rate; the loop uses it to pick up
    /// finished fetches.
    Tick,
}

/// Map a raw crossterm event. Everything the field ignores (mouse, focus,
/// resize) becomes a tick, since the loop redraws on every iteration anyway.
pub fn translate(event: CrosstermEvent) -> AppEvent {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
        CrosstermEvent::Paste(text) => AppEvent::Paste(text),
        _ => AppEvent::Tick,
    }
}

/// Polls for terminal events with a configurable tick rate.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Block until the next event or the tick timeout.
    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            Ok(translate(event::read()?))
        } else {
            Ok(AppEvent::Tick)
        }
    }
}
