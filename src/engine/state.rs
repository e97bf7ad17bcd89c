//! State shared between `Streamer` handles and the reveal worker.

use super::config::Reconcile;
use super::queue::{RevealSettings, UpdateQueue};
use crate::channel::Channel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the reveal worker is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No drain is running. The next enqueue starts one.
    Idle,
    /// A drain is running: reconciling or revealing a chunk, or pausing
    /// between steps.
    Revealing,
    /// A completion callback is running. Enqueued chunks wait for the
    /// running drain to pick them up.
    RunningCallback,
}

/// Mutable reveal state. Only ever touched under [`Shared::lock`].
#[derive(Debug)]
pub(crate) struct RevealState {
    /// Text currently being revealed.
    pub target: Arc<str>,
    /// Bytes of `target` revealed so far. Always `<= target.len()`.
    pub cursor: usize,
    pub queue: UpdateQueue,
    pub phase: Phase,
    /// Bumped by every flush.
    pub epoch: u64,
    /// Snapshot handed to newly enqueued chunks.
    pub settings: RevealSettings,
    pub reconcile: Reconcile,
    pub next_chunk: u64,
}

impl RevealState {
    pub fn new(settings: RevealSettings, reconcile: Reconcile) -> Self {
        Self {
            target: Arc::from(""),
            cursor: 0,
            queue: UpdateQueue::default(),
            phase: Phase::Idle,
            epoch: 0,
            settings,
            reconcile,
            next_chunk: 0,
        }
    }

    pub fn revealed(&self) -> &str {
        &self.target[..self.cursor]
    }
}

#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<RevealState>,
    /// Revealed prefixes, faults, and per-drain completion.
    pub fragments: Channel<str>,
    /// Fires once each time the queue drains.
    pub lifecycle: Channel<()>,
    shutdown: AtomicBool,
}

impl Shared {
    pub fn new(state: RevealState) -> Self {
        Self {
            state: Mutex::new(state),
            fragments: Channel::new(),
            lifecycle: Channel::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, RevealState> {
        // No user code runs under this lock; a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}
