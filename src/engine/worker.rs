//! Reveal worker: the single thread that drains the update queue.
//!
//! The worker sleeps on the wake channel until an enqueue moves the engine
//! out of [`Phase::Idle`]. It then drains the queue chunk by chunk:
//!
//! 1. reconcile the head chunk into the target text
//! 2. invoke the head's strategy, publish what it emits, pause for the
//!    head's cadence minus the time the strategy took, and repeat until the
//!    cursor reaches the end of the text
//! 3. pop the head and run its completion callback
//!
//! When the queue is empty it publishes completion and stream end and goes
//! back to sleep. The head's settings are re-read on every step, so a forced
//! reconfiguration applies to the chunk being revealed.

use super::state::{Phase, Shared};
use crate::error::RevealError;
use crate::error::panic_message;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, error, trace, warn};

/// The worker should exit: shutdown was requested or every handle is gone.
#[derive(Debug)]
struct Halt;

/// How revealing a chunk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    /// Cursor reached the end of the text (or a fault skipped the rest).
    Done,
    /// A flush discarded the chunk.
    Flushed,
}

/// A chunk whose reveal is in progress.
#[derive(Debug, Clone, Copy)]
struct ChunkRun {
    id: u64,
    epoch: u64,
}

pub(crate) struct Worker {
    shared: Arc<Shared>,
    wake_rx: Receiver<()>,
}

impl Worker {
    pub const fn new(shared: Arc<Shared>, wake_rx: Receiver<()>) -> Self {
        Self { shared, wake_rx }
    }

    /// Main worker loop.
    ///
    /// On exit the phase is reset to idle, so later enqueues find the worker
    /// gone instead of waiting on a drain that never ends.
    pub fn run(self) {
        while self.wake_rx.recv().is_ok() {
            if self.shared.is_shut_down() {
                break;
            }
            match panic::catch_unwind(AssertUnwindSafe(|| self.drain())) {
                Ok(Ok(())) => {}
                Ok(Err(Halt)) => break,
                Err(payload) => {
                    error!(message = %panic_message(payload.as_ref()), "reveal worker panicked");
                    break;
                }
            }
        }
        self.shared.lock().phase = Phase::Idle;
        debug!("reveal worker exiting");
    }

    /// Reveal queued chunks until the queue is empty.
    fn drain(&self) -> Result<(), Halt> {
        // A wake left over from a flush or an earlier drain.
        if self.shared.lock().phase == Phase::Idle {
            return Ok(());
        }

        let mut completed = 0_usize;
        while let Some(run) = self.begin_chunk() {
            let span = debug_span!("reveal_chunk", chunk = run.id);
            let _guard = span.enter();

            if self.reveal(run)? == Finish::Done && self.complete(run) {
                completed += 1;
            }
        }

        debug!(completed, "queue drained");
        self.shared.fragments.complete();
        self.shared.lifecycle.next(&());
        Ok(())
    }

    /// Reconcile the head chunk into the target text.
    ///
    /// Returns `None` (and goes idle) when the queue is empty.
    fn begin_chunk(&self) -> Option<ChunkRun> {
        let mut guard = self.shared.lock();
        let state = &mut *guard;
        let Some(head) = state.queue.front() else {
            state.phase = Phase::Idle;
            return None;
        };

        let (text, cursor) = state.reconcile.apply(&state.target, state.cursor, &head.text);
        let run = ChunkRun {
            id: head.id,
            epoch: state.epoch,
        };
        debug!(chunk = run.id, bytes = head.text.len(), cursor, "chunk reconciled");
        state.target = Arc::from(text);
        state.cursor = cursor;
        state.phase = Phase::Revealing;
        Some(run)
    }

    /// Step the head's strategy until the cursor reaches the end of the text.
    fn reveal(&self, run: ChunkRun) -> Result<Finish, Halt> {
        loop {
            let (text, cursor, settings) = {
                let state = self.shared.lock();
                if state.epoch != run.epoch {
                    return Ok(Finish::Flushed);
                }
                if state.cursor >= state.target.len() {
                    return Ok(Finish::Done);
                }
                let Some(head) = state.queue.front() else {
                    return Ok(Finish::Flushed);
                };
                (Arc::clone(&state.target), state.cursor, head.settings.clone())
            };

            let started = Instant::now();
            let stepped = panic::catch_unwind(AssertUnwindSafe(|| {
                settings.strategy.stream(&text, cursor, &mut |fragment: &str| {
                    trace!(bytes = fragment.len(), "fragment");
                    self.shared.fragments.next(fragment);
                })
            }));
            let elapsed = started.elapsed();
            let checked = stepped
                .map_err(|payload| RevealError::strategy_panicked(run.id, payload.as_ref()))
                .and_then(|next| check_progress(run.id, &text, cursor, next));

            {
                let mut state = self.shared.lock();
                if state.epoch != run.epoch {
                    return Ok(Finish::Flushed);
                }
                state.cursor = match checked {
                    Ok(next) => next,
                    Err(_) => state.target.len(),
                };
            }

            if let Err(err) = checked {
                warn!(%err, "strategy failed; skipping rest of chunk");
                self.shared.fragments.error(&err);
                return Ok(Finish::Done);
            }

            self.pause(settings.cadence.saturating_sub(elapsed))?;
        }
    }

    /// Pop the revealed head and run its completion callback.
    ///
    /// Returns `false` if a flush discarded the chunk first.
    fn complete(&self, run: ChunkRun) -> bool {
        let completion = {
            let mut state = self.shared.lock();
            if state.epoch != run.epoch {
                return false;
            }
            let Some(item) = state.queue.pop() else {
                return false;
            };
            debug_assert_eq!(item.id, run.id);
            state.phase = Phase::RunningCallback;
            item.completion
        };

        debug!(chunk = run.id, "chunk revealed");
        if let Err(err) = completion.run(run.id) {
            warn!(%err, "completion callback failed");
            self.shared.fragments.error(&err);
        }

        let mut state = self.shared.lock();
        if state.phase == Phase::RunningCallback {
            state.phase = Phase::Revealing;
        }
        true
    }

    /// Wait out the cadence. A flush or shutdown cuts the wait short.
    fn pause(&self, delay: Duration) -> Result<(), Halt> {
        let disconnected = if delay.is_zero() {
            matches!(self.wake_rx.try_recv(), Err(TryRecvError::Disconnected))
        } else {
            matches!(
                self.wake_rx.recv_timeout(delay),
                Err(RecvTimeoutError::Disconnected)
            )
        };
        if disconnected || self.shared.is_shut_down() {
            Err(Halt)
        } else {
            Ok(())
        }
    }
}

/// Validate the cursor a strategy returned, clamping overshoot to the end.
fn check_progress(
    chunk: u64,
    text: &str,
    cursor: usize,
    next: usize,
) -> Result<usize, RevealError> {
    let next = next.min(text.len());
    if next <= cursor {
        return Err(RevealError::Stalled {
            chunk,
            cursor,
            len: text.len(),
        });
    }
    if !text.is_char_boundary(next) {
        return Err(RevealError::InvalidCursor { chunk, cursor: next });
    }
    Ok(next)
}
