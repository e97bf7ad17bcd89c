//! # Trickle
//!
//! Cadence-controlled incremental reveal for text that arrives in pieces.
//!
//! Trickle takes text chunks as they arrive from a streamed response, queues
//! them, and reveals the growing text to observers at a steady pace, the way
//! a chat UI "types out" a model's answer.
//!
//! ## Core Concepts
//!
//! - **Streamer**: owns the queue and a worker thread that reveals one step
//!   per cadence tick, compensating for the time each step takes
//! - **Reveal strategies**: character, word, or whole-text steps, or your own
//!   [`RevealStrategy`]
//! - **Reconciliation**: chunks are either appended, or replace the whole
//!   text with the cursor rewound to the common prefix
//! - **Channels**: revealed fragments and stream-end events are published to
//!   any number of observers
//!
//! ## Example
//!
//! ```rust,ignore
//! use trickle::{Reconcile, RevealMode, Streamer};
//! use std::time::Duration;
//!
//! let strategy = RevealMode::Word.strategy();
//! let streamer = Streamer::new(Duration::from_millis(30), strategy, Reconcile::Append)?;
//! streamer.subscribe_fn(|fragment| render(fragment));
//! streamer.on_stream_end(|| println!("done"));
//!
//! for chunk in response {
//!     streamer.enqueue(chunk);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod channel;
pub mod engine;
pub mod error;
pub mod strategy;

// Re-exports for convenience
pub use channel::{Channel, Observer, Subscription};
pub use engine::{Phase, Reconcile, Streamer, StreamerConfig};
pub use error::{BoxError, Result, RevealError};
pub use strategy::{CharacterStrategy, RevealMode, RevealStrategy, WholeStrategy, WordStrategy};
