//! Notification Channel: a minimal multi-subscriber publish/subscribe primitive.
//!
//! The engine owns two independent channels:
//!
//! - a **fragment** channel (`Channel<str>`) that carries every revealed
//!   prefix, reveal faults, and a completion signal each time the queue drains
//! - a **lifecycle** channel (`Channel<()>`) that fires once per drain
//!
//! # Example
//!
//! ```rust
//! use trickle::{Channel, Observer};
//! use std::sync::{Arc, Mutex};
//!
//! let channel: Channel<str> = Channel::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let sub = channel.subscribe(Observer::new().on_next(move |s: &str| {
//!     sink.lock().unwrap().push(s.to_string());
//! }));
//!
//! channel.next("he");
//! channel.next("hello");
//! assert!(sub.unsubscribe());
//! channel.next("ignored");
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["he", "hello"]);
//! ```

mod observer;
mod registry;

pub use observer::Observer;
pub use registry::{Channel, Subscription};
