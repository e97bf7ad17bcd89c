//! Error types for the reveal engine.
//!
//! None of these abort the engine. Faults that occur while a chunk is being
//! revealed are delivered to fragment subscribers through
//! [`Observer::on_error`](crate::Observer::on_error) and the worker moves on to
//! the next chunk.

use std::any::Any;
use std::io;
use thiserror::Error;

/// Boxed error returned by fallible completion callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for trickle operations.
pub type Result<T> = std::result::Result<T, RevealError>;

/// Errors that can occur while revealing queued text.
#[derive(Debug, Error)]
pub enum RevealError {
    /// A fallible completion callback returned an error.
    #[error("completion callback for chunk {chunk} failed: {source}")]
    Callback {
        /// Id of the chunk whose callback failed.
        chunk: u64,
        /// The error returned by the callback.
        #[source]
        source: BoxError,
    },

    /// A completion callback panicked.
    #[error("completion callback for chunk {chunk} panicked: {message}")]
    CallbackPanicked {
        /// Id of the chunk whose callback panicked.
        chunk: u64,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// A strategy panicked while revealing a chunk.
    ///
    /// The remainder of the chunk is skipped.
    #[error("strategy panicked on chunk {chunk}: {message}")]
    StrategyPanicked {
        /// Chunk being revealed.
        chunk: u64,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// A strategy returned without advancing the cursor.
    ///
    /// The remainder of the chunk is skipped.
    #[error("strategy made no progress on chunk {chunk} at offset {cursor} of {len}")]
    Stalled {
        /// Chunk being revealed.
        chunk: u64,
        /// Cursor the strategy was invoked with.
        cursor: usize,
        /// Length of the target text in bytes.
        len: usize,
    },

    /// A strategy returned an offset that splits a UTF-8 sequence.
    #[error("strategy returned offset {cursor} on chunk {chunk}, which is not a char boundary")]
    InvalidCursor {
        /// Chunk being revealed.
        chunk: u64,
        /// The offending offset.
        cursor: usize,
    },

    /// The reveal worker thread could not be spawned.
    #[error("failed to spawn reveal worker: {0}")]
    Spawn(#[from] io::Error),
}

impl RevealError {
    /// Id of the chunk this error belongs to, if any.
    pub const fn chunk(&self) -> Option<u64> {
        match self {
            Self::Callback { chunk, .. }
            | Self::CallbackPanicked { chunk, .. }
            | Self::StrategyPanicked { chunk, .. }
            | Self::Stalled { chunk, .. }
            | Self::InvalidCursor { chunk, .. } => Some(*chunk),
            Self::Spawn(_) => None,
        }
    }

    /// Build a [`RevealError::CallbackPanicked`] from a caught panic payload.
    pub(crate) fn from_panic(chunk: u64, payload: &(dyn Any + Send)) -> Self {
        Self::CallbackPanicked {
            chunk,
            message: panic_message(payload),
        }
    }

    /// Build a [`RevealError::StrategyPanicked`] from a caught panic payload.
    pub(crate) fn strategy_panicked(chunk: u64, payload: &(dyn Any + Send)) -> Self {
        Self::StrategyPanicked {
            chunk,
            message: panic_message(payload),
        }
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_accessor() {
        let err = RevealError::Stalled {
            chunk: 4,
            cursor: 2,
            len: 9,
        };
        assert_eq!(err.chunk(), Some(4));

        let err = RevealError::Spawn(io::Error::other("no threads"));
        assert_eq!(err.chunk(), None);
    }

    #[test]
    fn test_panic_payloads() {
        let err = RevealError::from_panic(1, &"boom");
        assert!(matches!(
            err,
            RevealError::CallbackPanicked { ref message, .. } if message == "boom"
        ));

        let err = RevealError::from_panic(2, &String::from("owned boom"));
        assert!(err.to_string().contains("owned boom"));

        let err = RevealError::from_panic(3, &42_u32);
        assert!(err.to_string().contains("non-string panic payload"));

        let err = RevealError::strategy_panicked(4, &"bad step");
        assert_eq!(err.chunk(), Some(4));
        assert_eq!(err.to_string(), "strategy panicked on chunk 4: bad step");
    }

    #[test]
    fn test_callback_source_is_kept() {
        let source: BoxError = "disk full".into();
        let err = RevealError::Callback { chunk: 7, source };
        assert_eq!(err.to_string(), "completion callback for chunk 7 failed: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
