//! Streamer: the public handle to a reveal engine.

use super::config::{Reconcile, StreamerConfig};
use super::queue::{Completion, QueuedUpdate, RevealSettings};
use super::state::{Phase, RevealState, Shared};
use super::worker::Worker;
use crate::channel::{Observer, Subscription};
use crate::error::{BoxError, Result};
use crate::strategy::{RevealMode, RevealStrategy};
use crossbeam_channel::{bounded, Sender, TrySendError};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Handle to a reveal engine.
///
/// Chunks passed to [`enqueue`](Self::enqueue) are revealed in order on a
/// dedicated worker thread, one strategy step per cadence tick. Every
/// visible prefix is published to observers registered with
/// [`subscribe`](Self::subscribe).
///
/// Cloning is cheap and every clone drives the same engine. The worker exits
/// when [`shutdown`](Self::shutdown) is called or the last handle is dropped.
/// A handle captured by one of the engine's own observers or stream-end
/// handlers keeps the engine alive; call [`shutdown`](Self::shutdown) to
/// stop it.
///
/// # Example
///
/// ```rust
/// use trickle::{Reconcile, RevealMode, Streamer};
/// use std::time::Duration;
///
/// let streamer = Streamer::new(Duration::ZERO, RevealMode::Word.strategy(), Reconcile::Append)?;
/// let (tx, rx) = crossbeam_channel::unbounded();
/// streamer.subscribe_fn(move |fragment| {
///     let _ = tx.send(fragment.to_string());
/// });
///
/// streamer.enqueue("hello world");
/// assert_eq!(rx.recv().unwrap(), "hello");
/// assert_eq!(rx.recv().unwrap(), "hello world");
/// # Ok::<(), trickle::RevealError>(())
/// ```
#[derive(Clone)]
pub struct Streamer {
    shared: Arc<Shared>,
    wake_tx: Sender<()>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Streamer {
    /// Create an engine and spawn its worker.
    ///
    /// # Arguments
    ///
    /// * `cadence` - Delay between reveal steps.
    /// * `strategy` - Strategy for chunks enqueued before any reconfiguration.
    /// * `reconcile` - Whether chunks are increments or full replacements.
    pub fn new(
        cadence: Duration,
        strategy: Arc<dyn RevealStrategy>,
        reconcile: Reconcile,
    ) -> Result<Self> {
        Self::spawn(
            RevealSettings { cadence, strategy },
            reconcile,
            StreamerConfig::default().thread_name,
        )
    }

    /// Create an engine from a [`StreamerConfig`].
    pub fn with_config(config: StreamerConfig) -> Result<Self> {
        Self::spawn(
            RevealSettings {
                cadence: config.cadence,
                strategy: config.mode.strategy(),
            },
            config.reconcile,
            config.thread_name,
        )
    }

    fn spawn(settings: RevealSettings, reconcile: Reconcile, thread_name: String) -> Result<Self> {
        let shared = Arc::new(Shared::new(RevealState::new(settings, reconcile)));

        // One pending wake is enough; further wakes would be redundant
        let (wake_tx, wake_rx) = bounded(1);
        let worker = Worker::new(Arc::clone(&shared), wake_rx);
        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker.run())?;

        Ok(Self {
            shared,
            wake_tx,
            worker: Arc::new(Mutex::new(Some(handle))),
        })
    }

    /// Set the cadence for chunks enqueued from now on.
    ///
    /// With `force`, every queued chunk (including the one being revealed)
    /// switches to the new cadence from its next step.
    pub fn set_cadence(&self, cadence: Duration, force: bool) -> &Self {
        let mut state = self.shared.lock();
        state.settings = state.settings.with_cadence(cadence);
        if force {
            state.queue.rewrite(|s| s.with_cadence(cadence));
        }
        debug!(?cadence, force, queued = state.queue.len(), "cadence updated");
        self
    }

    /// Set the strategy for chunks enqueued from now on.
    ///
    /// With `force`, every queued chunk (including the one being revealed)
    /// switches to the new strategy from its next step.
    pub fn set_strategy(&self, strategy: Arc<dyn RevealStrategy>, force: bool) -> &Self {
        let mut state = self.shared.lock();
        if force {
            state.queue.rewrite(|s| s.with_strategy(Arc::clone(&strategy)));
        }
        debug!(?strategy, force, queued = state.queue.len(), "strategy updated");
        state.settings = state.settings.with_strategy(strategy);
        self
    }

    /// [`set_strategy`](Self::set_strategy) with a built-in mode.
    pub fn set_mode(&self, mode: RevealMode, force: bool) -> &Self {
        self.set_strategy(mode.strategy(), force)
    }

    /// Register an observer for revealed fragments.
    ///
    /// `on_next` receives every revealed prefix, `on_error` receives faults
    /// (failed callbacks, misbehaving strategies), and `on_complete` fires
    /// each time the queue drains.
    pub fn subscribe(&self, observer: Observer<str>) -> Subscription<str> {
        self.shared.fragments.subscribe(observer)
    }

    /// Register a fragment handler only.
    pub fn subscribe_fn(
        &self,
        on_fragment: impl Fn(&str) + Send + Sync + 'static,
    ) -> Subscription<str> {
        self.subscribe(Observer::new().on_next(on_fragment))
    }

    /// Register a handler that fires each time the queue fully drains.
    pub fn on_stream_end(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription<()> {
        self.shared
            .lifecycle
            .subscribe(Observer::new().on_next(move |_: &()| callback()))
    }

    /// Discard every queued chunk and reset the target text and cursor.
    ///
    /// A strategy step already running finishes, but nothing from the
    /// flushed text is revealed after it. Callbacks of discarded chunks never
    /// run.
    pub fn flush(&self) -> &Self {
        let (dropped, was) = {
            let mut state = self.shared.lock();
            let dropped = state.queue.clear();
            state.target = Arc::from("");
            state.cursor = 0;
            state.epoch += 1;
            let was = state.phase;
            state.phase = Phase::Idle;
            (dropped, was)
        };
        debug!(dropped, ?was, "flushed");
        if was != Phase::Idle {
            self.wake();
        }
        self
    }

    /// Queue a chunk for reveal. Returns its chunk id.
    pub fn enqueue(&self, text: impl Into<String>) -> u64 {
        self.push(text.into(), Completion::None)
    }

    /// Queue a chunk with a callback that runs once it is fully revealed,
    /// before the next chunk is reconciled.
    pub fn enqueue_with(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce() + Send + 'static,
    ) -> u64 {
        self.push(text.into(), Completion::Infallible(Box::new(callback)))
    }

    /// Like [`enqueue_with`](Self::enqueue_with), but the callback may fail.
    ///
    /// A failure is reported to subscribers' `on_error` and does not stop
    /// the engine.
    pub fn enqueue_fallible<E>(
        &self,
        text: impl Into<String>,
        callback: impl FnOnce() -> std::result::Result<(), E> + Send + 'static,
    ) -> u64
    where
        E: Into<BoxError> + 'static,
    {
        let completion = Completion::Fallible(Box::new(move || callback().map_err(Into::into)));
        self.push(text.into(), completion)
    }

    fn push(&self, text: String, completion: Completion) -> u64 {
        let (id, start) = {
            let mut state = self.shared.lock();
            let id = state.next_chunk;
            state.next_chunk += 1;
            let settings = state.settings.clone();
            let bytes = text.len();
            state.queue.push(QueuedUpdate {
                id,
                text,
                completion,
                settings,
            });
            let start = state.phase == Phase::Idle;
            if start {
                state.phase = Phase::Revealing;
            }
            debug!(chunk = id, bytes, start, "enqueued chunk");
            (id, start)
        };
        if start {
            self.wake();
        }
        id
    }

    fn wake(&self) {
        // Non-blocking: a wake already pending covers this one
        if let Err(TrySendError::Disconnected(())) = self.wake_tx.try_send(()) {
            let mut state = self.shared.lock();
            state.phase = Phase::Idle;
            if !self.shared.is_shut_down() {
                warn!(queued = state.queue.len(), "reveal worker is gone; chunks stay queued");
            }
        }
    }

    /// Current worker phase.
    pub fn phase(&self) -> Phase {
        self.shared.lock().phase
    }

    /// Whether a drain is running.
    pub fn is_streaming(&self) -> bool {
        self.phase() != Phase::Idle
    }

    /// Number of queued chunks, including the one being revealed.
    pub fn pending(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Cadence given to newly enqueued chunks.
    pub fn cadence(&self) -> Duration {
        self.shared.lock().settings.cadence
    }

    /// Reconciliation mode chosen at construction.
    pub fn reconcile(&self) -> Reconcile {
        self.shared.lock().reconcile
    }

    /// Text revealed so far.
    ///
    /// After a strategy fault the rest of that chunk counts as revealed,
    /// although no fragment containing it was published.
    pub fn revealed(&self) -> String {
        self.shared.lock().revealed().to_string()
    }

    /// Full target text, revealed or not.
    pub fn target(&self) -> String {
        self.shared.lock().target.to_string()
    }

    /// Signal the worker to stop at its next pause.
    ///
    /// Queued chunks are left unrevealed, as are chunks enqueued afterwards.
    pub fn shutdown(&self) {
        self.shared.request_shutdown();
        self.wake();
    }

    /// Shut down and wait for the worker thread to finish.
    ///
    /// Called from inside a handler or callback (on the worker itself), this
    /// only signals shutdown.
    pub fn join(self) {
        self.shutdown();
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

impl fmt::Debug for Streamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("Streamer")
            .field("phase", &state.phase)
            .field("pending", &state.queue.len())
            .field("cursor", &state.cursor)
            .field("target_len", &state.target.len())
            .field("reconcile", &state.reconcile)
            .finish_non_exhaustive()
    }
}
