//! Pending updates and their per-chunk settings snapshot.

use crate::error::{BoxError, RevealError};
use crate::strategy::RevealStrategy;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Cadence and strategy captured when a chunk is enqueued.
///
/// Immutable; a forced reconfiguration replaces the whole value.
#[derive(Debug, Clone)]
pub(crate) struct RevealSettings {
    pub cadence: Duration,
    pub strategy: Arc<dyn RevealStrategy>,
}

impl RevealSettings {
    pub fn with_cadence(&self, cadence: Duration) -> Self {
        Self {
            cadence,
            strategy: Arc::clone(&self.strategy),
        }
    }

    pub fn with_strategy(&self, strategy: Arc<dyn RevealStrategy>) -> Self {
        Self {
            cadence: self.cadence,
            strategy,
        }
    }
}

/// Hook run after a chunk has been fully revealed.
pub(crate) enum Completion {
    None,
    Infallible(Box<dyn FnOnce() + Send>),
    Fallible(Box<dyn FnOnce() -> Result<(), BoxError> + Send>),
}

impl Completion {
    /// Run the hook, turning an `Err` or a panic into a [`RevealError`].
    pub fn run(self, chunk: u64) -> Result<(), RevealError> {
        let outcome = match self {
            Self::None => return Ok(()),
            Self::Infallible(f) => panic::catch_unwind(AssertUnwindSafe(f)).map(|()| Ok(())),
            Self::Fallible(f) => panic::catch_unwind(AssertUnwindSafe(f)),
        };
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(RevealError::Callback { chunk, source }),
            Err(payload) => Err(RevealError::from_panic(chunk, payload.as_ref())),
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Infallible(_) => "Infallible",
            Self::Fallible(_) => "Fallible",
        })
    }
}

/// One pending unit of work.
#[derive(Debug)]
pub(crate) struct QueuedUpdate {
    pub id: u64,
    pub text: String,
    pub completion: Completion,
    pub settings: RevealSettings,
}

/// FIFO of pending updates. The head stays queued until fully revealed.
#[derive(Debug, Default)]
pub(crate) struct UpdateQueue {
    items: VecDeque<QueuedUpdate>,
}

impl UpdateQueue {
    pub fn push(&mut self, update: QueuedUpdate) {
        self.items.push_back(update);
    }

    pub fn front(&self) -> Option<&QueuedUpdate> {
        self.items.front()
    }

    pub fn pop(&mut self) -> Option<QueuedUpdate> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        dropped
    }

    /// Replace the settings snapshot of every queued item, head included.
    pub fn rewrite(&mut self, f: impl Fn(&RevealSettings) -> RevealSettings) {
        for item in &mut self.items {
            item.settings = f(&item.settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::RevealMode;

    fn update(id: u64, cadence_ms: u64) -> QueuedUpdate {
        QueuedUpdate {
            id,
            text: format!("chunk {id}"),
            completion: Completion::None,
            settings: RevealSettings {
                cadence: Duration::from_millis(cadence_ms),
                strategy: RevealMode::Character.strategy(),
            },
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = UpdateQueue::default();
        queue.push(update(1, 0));
        queue.push(update(2, 0));
        assert_eq!(queue.front().map(|u| u.id), Some(1));
        assert_eq!(queue.pop().map(|u| u.id), Some(1));
        assert_eq!(queue.pop().map(|u| u.id), Some(2));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_rewrite_touches_every_item() {
        let mut queue = UpdateQueue::default();
        queue.push(update(1, 10));
        queue.push(update(2, 20));
        queue.rewrite(|s| s.with_cadence(Duration::from_millis(5)));
        assert!(queue.items.iter().all(|u| u.settings.cadence == Duration::from_millis(5)));

        let word = RevealMode::Word.strategy();
        queue.rewrite(|s| s.with_strategy(Arc::clone(&word)));
        assert!(queue.items.iter().all(|u| Arc::ptr_eq(&u.settings.strategy, &word)));
        assert!(queue.items.iter().all(|u| u.settings.cadence == Duration::from_millis(5)));
    }

    #[test]
    fn test_clear_reports_count() {
        let mut queue = UpdateQueue::default();
        queue.push(update(1, 0));
        queue.push(update(2, 0));
        assert_eq!(queue.clear(), 2);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_completion_outcomes() {
        assert!(Completion::None.run(0).is_ok());
        assert!(Completion::Infallible(Box::new(|| {})).run(1).is_ok());

        let err = Completion::Fallible(Box::new(|| Err::<(), BoxError>("nope".into())))
            .run(2)
            .unwrap_err();
        assert!(matches!(err, RevealError::Callback { chunk: 2, .. }));

        let err = Completion::Infallible(Box::new(|| panic!("kaboom"))).run(3).unwrap_err();
        assert!(matches!(
            err,
            RevealError::CallbackPanicked { chunk: 3, ref message } if message == "kaboom"
        ));
    }
}
