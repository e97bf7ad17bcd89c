//! Observer: a set of optional handlers attached to a channel.

use crate::error::{panic_message, RevealError};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

type ErrorFn = Arc<dyn Fn(&RevealError) + Send + Sync>;
type CompleteFn = Arc<dyn Fn() + Send + Sync>;

/// Handlers for the three notification kinds a [`Channel`](super::Channel)
/// delivers. Every slot is optional; unset slots are skipped.
///
/// Handlers run on the thread that publishes (the reveal worker for engine
/// channels) and never while any engine lock is held, so they may call back
/// into the engine. A panicking handler is logged and skipped; it does not
/// reach the publisher or the other observers.
pub struct Observer<T: ?Sized> {
    next: Option<Arc<dyn Fn(&T) + Send + Sync>>,
    error: Option<ErrorFn>,
    complete: Option<CompleteFn>,
}

impl<T: ?Sized> Observer<T> {
    /// Create an observer with no handlers.
    pub const fn new() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }

    /// Set the handler called with every published value.
    #[must_use]
    pub fn on_next(mut self, handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.next = Some(Arc::new(handler));
        self
    }

    /// Set the handler called when a fault is reported.
    #[must_use]
    pub fn on_error(mut self, handler: impl Fn(&RevealError) + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(handler));
        self
    }

    /// Set the handler called when the stream completes.
    #[must_use]
    pub fn on_complete(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.complete = Some(Arc::new(handler));
        self
    }

    pub(crate) fn notify_next(&self, value: &T) {
        if let Some(handler) = &self.next {
            guarded("next", || handler(value));
        }
    }

    pub(crate) fn notify_error(&self, err: &RevealError) {
        if let Some(handler) = &self.error {
            guarded("error", || handler(err));
        }
    }

    pub(crate) fn notify_complete(&self) {
        if let Some(handler) = &self.complete {
            guarded("complete", || handler());
        }
    }
}

fn guarded(slot: &'static str, handler: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(handler)) {
        warn!(slot, message = %panic_message(payload.as_ref()), "observer panicked");
    }
}

impl<T: ?Sized> Default for Observer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next.clone(),
            error: self.error.clone(),
            complete: self.complete.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("next", &self.next.is_some())
            .field("error", &self.error.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}
