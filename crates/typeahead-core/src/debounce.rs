use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

type BoxedFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type BoxedAction<A> = Arc<dyn Fn(A) -> BoxedFuture + Send + Sync>;

/// Delays an async action until `delay` has passed without a new trigger.
///
/// Every [`trigger`](Self::trigger) aborts the previously scheduled run, so a
/// burst of calls collapses into one execution carrying the last argument.
/// Once the delay elapses the action runs in its own task: later triggers
/// never abort work that has already started.
///
/// Build one per caller and keep it; a fresh `Debouncer` knows nothing about
/// the pending run of another.
pub struct Debouncer<A> {
    action: BoxedAction<A>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            action: Arc::new(move |arg: A| -> BoxedFuture { Box::pin(action(arg)) }),
            delay,
            pending: None,
        }
    }

    /// Schedule the action with `arg`, superseding any run not yet fired.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger(&mut self, arg: A) {
        self.cancel();

        let action = Arc::clone(&self.action);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            tokio::spawn(action(arg));
        }));
    }

    /// Drop the pending run, if any. Returns `true` when something was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
