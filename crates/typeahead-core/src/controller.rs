use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::client::SuggestionSource;
use crate::debounce::Debouncer;
use crate::error::Result;

/// Tuning for a [`SuggestionController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Quiet period after the last keystroke before a request is issued.
    pub debounce: Duration,
    /// Number of suggestions requested per query.
    pub page_size: usize,
    /// Drop responses older than the last one applied instead of letting them
    /// overwrite newer results.
    pub discard_stale_responses: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            page_size: 5,
            discard_stale_responses: false,
        }
    }
}

/// Result of one completed fetch, sent back to the controller.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Issue order of the request, starting at 1.
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<String>>,
}

/// Owns the input text and the suggestion list of one search field.
///
/// Keystrokes go through [`on_input_change`](Self::on_input_change), which
/// updates the input immediately and schedules a debounced fetch. Fetches run
/// as Tokio tasks and report back through a channel; nothing is applied until
/// the owner calls [`apply_pending`](Self::apply_pending) or
/// [`next_outcome`](Self::next_outcome), so all state changes happen on the
/// owner's thread.
///
/// Responses are applied in arrival order. With the default options an older
/// query answered late overwrites a newer one's results.
pub struct SuggestionController {
    input: String,
    suggestions: Vec<String>,
    last_error: Option<String>,
    last_applied: Option<u64>,
    options: ControllerOptions,
    fetch: Debouncer<String>,
    issued: Arc<AtomicU64>,
    received: u64,
    outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl SuggestionController {
    pub fn new(source: Arc<dyn SuggestionSource>, options: ControllerOptions) -> Self {
        let (tx, outcomes) = mpsc::unbounded_channel();
        let issued = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&issued);
        let page_size = options.page_size;
        let fetch = Debouncer::new(options.debounce, move |query: String| {
            let source = Arc::clone(&source);
            let tx = tx.clone();
            let seq = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                tracing::debug!(seq, %query, "issuing suggestion request");
                let result = source.suggest(&query, page_size).await;
                if let Err(e) = &result {
                    tracing::warn!(seq, %query, error = %e, "suggestion request failed");
                }
                let _ = tx.send(FetchOutcome { seq, query, result });
            }
        });

        Self {
            input: String::new(),
            suggestions: Vec::new(),
            last_error: None,
            last_applied: None,
            options,
            fetch,
            issued,
            received: 0,
            outcomes,
        }
    }

    // ─── Events ──────────────────────────────────────────────

    /// Record the new field contents and schedule a fetch for them.
    ///
    /// Empty text is queried like any other value.
    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.fetch.trigger(self.input.clone());
    }

    /// Apply one fetch outcome. Returns `true` if the suggestion list was
    /// replaced; a failure only updates [`last_error`](Self::last_error).
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { seq, query, result } = outcome;

        if self.options.discard_stale_responses
            && self.last_applied.is_some_and(|last| seq < last)
        {
            tracing::debug!(seq, %query, "discarding stale response");
            return false;
        }

        match result {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                self.last_error = None;
                self.last_applied = Some(seq);
                true
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Apply every outcome that has already arrived, oldest first. Returns
    /// `true` if any of them replaced the suggestion list.
    pub fn apply_pending(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.received += 1;
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Wait for the next outcome and apply it.
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcomes.recv().await?;
        self.received += 1;
        Some(self.apply(outcome))
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Requests issued whose outcome has not been received yet.
    pub fn in_flight(&self) -> u64 {
        self.issued
            .load(Ordering::SeqCst)
            .saturating_sub(self.received)
    }

    /// Whether a fetch is scheduled but has not fired yet.
    pub fn is_debouncing(&self) -> bool {
        self.fetch.is_pending()
    }
}
