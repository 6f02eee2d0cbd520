use std::sync::Arc;

use typeahead_core::{ControllerOptions, SuggestionController, SuggestionSource};

use crate::theme::NordTheme;

/// State of the running TUI.
pub struct App {
    pub controller: SuggestionController,
    /// Highlighted suggestion, if the user moved into the list.
    pub selected: Option<usize>,
    /// Shown in the status bar.
    pub service_label: String,
    pub theme: NordTheme,
    pub should_quit: bool,
}

impl App {
    /// Must be called from within a Tokio runtime.
    pub fn new(
        source: Arc<dyn SuggestionSource>,
        options: ControllerOptions,
        service_label: impl Into<String>,
    ) -> Self {
        Self {
            controller: SuggestionController::new(source, options),
            selected: None,
            service_label: service_label.into(),
            theme: NordTheme::default(),
            should_quit: false,
        }
    }

    /// Pick up finished fetches. Returns `true` when the list was replaced.
    pub fn tick(&mut self) -> bool {
        let replaced = self.controller.apply_pending();
        if replaced {
            self.selected = None;
        }
        replaced
    }

    // ─── Editing ─────────────────────────────────────────────

    pub fn push_char(&mut self, c: char) {
        let mut text = self.controller.input().to_string();
        text.push(c);
        self.set_input(text);
    }

    /// Insert pasted text as a single edit. Control characters are dropped.
    pub fn paste(&mut self, pasted: &str) {
        let mut text = self.controller.input().to_string();
        let before = text.len();
        text.extend(pasted.chars().filter(|c| !c.is_control()));
        if text.len() != before {
            self.set_input(text);
        }
    }

    pub fn backspace(&mut self) {
        let mut text = self.controller.input().to_string();
        if text.pop().is_some() {
            self.set_input(text);
        }
    }

    pub fn clear_input(&mut self) {
        if !self.controller.input().is_empty() {
            self.set_input(String::new());
        }
    }

    fn set_input(&mut self, text: String) {
        self.selected = None;
        self.controller.on_input_change(text);
    }

    // ─── Selection ───────────────────────────────────────────

    pub fn select_next(&mut self) {
        let len = self.controller.suggestions().len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        let len = self.controller.suggestions().len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Copy the highlighted suggestion into the input field.
    pub fn accept_selection(&mut self) -> bool {
        let Some(text) = self
            .selected
            .and_then(|i| self.controller.suggestions().get(i))
            .cloned()
        else {
            return false;
        };
        self.set_input(text);
        true
    }

    pub fn selected_suggestion(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.controller.suggestions().get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use typeahead_core::{FetchOutcome, Result, TypeaheadError};

    /// Echoes the query back with a numeric suffix; `"boom"` fails.
    pub(crate) struct EchoSource;

    #[async_trait]
    impl SuggestionSource for EchoSource {
        async fn suggest(&self, query: &str, size: usize) -> Result<Vec<String>> {
            if query == "boom" {
                return Err(TypeaheadError::Parse("down".to_string()));
            }
            Ok((1..=size.min(3)).map(|i| format!("{query}{i}")).collect())
        }
    }

    pub(crate) fn mock_app() -> App {
        App::new(Arc::new(EchoSource), ControllerOptions::default(), "mock")
    }

    pub(crate) fn load(app: &mut App, items: &[&str]) {
        app.controller.apply(FetchOutcome {
            seq: 1,
            query: String::new(),
            result: Ok(items.iter().map(|s| s.to_string()).collect()),
        });
    }

    #[tokio::test(start_paused = true)]
    async fn editing_updates_input_immediately() {
        let mut app = mock_app();

        app.push_char('h');
        app.push_char('e');
        assert_eq!(app.controller.input(), "he");

        app.backspace();
        assert_eq!(app.controller.input(), "h");

        app.clear_input();
        assert_eq!(app.controller.input(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn tick_applies_results_and_resets_selection() {
        let mut app = mock_app();
        load(&mut app, &["a", "b"]);
        app.select_next();
        assert_eq!(app.selected, Some(0));

        app.push_char('x');
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(app.tick());
        assert_eq!(app.selected, None);
        assert_eq!(app.controller.suggestions(), ["x1", "x2", "x3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_selection() {
        let mut app = mock_app();
        load(&mut app, &["a", "b"]);

        app.controller.on_input_change("boom");
        app.select_next();
        app.select_next();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(!app.tick());
        assert_eq!(app.selected_suggestion(), Some("b"));
        assert_eq!(app.controller.suggestions(), ["a", "b"]);
        assert!(app.controller.last_error().is_some_and(|e| e.contains("down")));
    }

    #[tokio::test(start_paused = true)]
    async fn paste_is_one_edit() {
        let mut app = mock_app();
        app.push_char('a');
        app.paste("b c\n");
        assert_eq!(app.controller.input(), "ab c");

        app.paste("\n");
        assert_eq!(app.controller.input(), "ab c");

        tokio::time::sleep(Duration::from_millis(400)).await;
        app.tick();
        assert_eq!(app.controller.suggestions(), ["ab c1", "ab c2", "ab c3"]);
    }

    #[tokio::test]
    async fn selection_wraps_both_ways() {
        let mut app = mock_app();
        app.select_next();
        assert_eq!(app.selected, None);

        load(&mut app, &["a", "b", "c"]);
        app.select_prev();
        assert_eq!(app.selected_suggestion(), Some("c"));
        app.select_next();
        assert_eq!(app.selected_suggestion(), Some("a"));
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_suggestion(), Some("a"));
    }

    #[tokio::test]
    async fn accept_copies_suggestion_into_input() {
        let mut app = mock_app();
        load(&mut app, &["hello", "help"]);

        assert!(!app.accept_selection());

        app.select_next();
        app.select_next();
        assert!(app.accept_selection());
        assert_eq!(app.controller.input(), "help");
        assert_eq!(app.selected, None);
        assert!(app.controller.is_debouncing());
    }
}
