//! Reveal Engine: queue-driven, cadence-controlled text reveal.
//!
//! A [`Streamer`] owns a FIFO of pending chunks, the target text, and a
//! reveal cursor. A single worker thread drains the queue: each chunk is
//! reconciled into the target text (appended, or replaced with the cursor
//! rewound to the common prefix), then revealed step by step by the chunk's
//! [`RevealStrategy`](crate::RevealStrategy) at the chunk's cadence.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  enqueue   ┌──────────────┐   wake   ┌───────────────┐
//! │ Producer │ ─────────▶ │ Update queue │ ───────▶ │ Reveal worker │
//! └──────────┘            └──────────────┘          └───────────────┘
//!                                                     │          │
//!                                           fragments │          │ stream end
//!                                                     ▼          ▼
//!                                              ┌──────────┐ ┌───────────┐
//!                                              │ Channel  │ │ Channel   │
//!                                              │ <str>    │ │ <()>      │
//!                                              └──────────┘ └───────────┘
//! ```
//!
//! Each queued chunk carries the cadence and strategy in effect when it was
//! enqueued. Reconfiguring with `force` rewrites those snapshots, including
//! the one of the chunk currently being revealed.

mod config;
mod queue;
mod reconcile;
mod state;
mod streamer;
mod worker;

pub use config::{Reconcile, StreamerConfig};
pub use reconcile::common_prefix_len;
pub use state::Phase;
pub use streamer::Streamer;
