//! Streamer configuration.

use crate::strategy::RevealMode;
use std::time::Duration;

/// How a dequeued chunk is merged into the target text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Reconcile {
    /// Each chunk is an increment appended to the target text.
    #[default]
    Append,
    /// Each chunk is the full current text. The cursor rewinds to the
    /// longest prefix shared with the previous target so common text is not
    /// revealed twice.
    Replace,
}

impl Reconcile {
    /// `Replace` if `replace` is set, `Append` otherwise.
    pub const fn from_replace(replace: bool) -> Self {
        if replace {
            Self::Replace
        } else {
            Self::Append
        }
    }
}

/// Configuration for a [`Streamer`](super::Streamer).
#[derive(Debug, Clone)]
pub struct StreamerConfig {
    /// Delay between reveal steps, including the strategy's own run time.
    pub cadence: Duration,
    /// Strategy used for chunks enqueued before any `set_strategy` call.
    pub mode: RevealMode,
    /// Append or replace reconciliation.
    pub reconcile: Reconcile,
    /// Name of the worker thread.
    pub thread_name: String,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            cadence: Duration::ZERO,
            mode: RevealMode::Character,
            reconcile: Reconcile::Append,
            thread_name: "trickle-reveal".to_string(),
        }
    }
}

impl StreamerConfig {
    /// Config with the given cadence in milliseconds.
    pub fn with_cadence_ms(mut self, ms: u64) -> Self {
        self.cadence = Duration::from_millis(ms);
        self
    }

    /// Config with the given reveal mode.
    pub const fn with_mode(mut self, mode: RevealMode) -> Self {
        self.mode = mode;
        self
    }

    /// Config with the given reconciliation.
    pub const fn with_reconcile(mut self, reconcile: Reconcile) -> Self {
        self.reconcile = reconcile;
        self
    }
}
