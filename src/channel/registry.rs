//! Channel registry and subscription tokens.
//!
//! Observers live in a copy-on-write list: publishing clones the `Arc` under
//! the lock and invokes handlers after releasing it, so a handler may
//! subscribe, unsubscribe, or publish again without deadlocking.

use super::observer::Observer;
use crate::error::RevealError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

struct Entry<T: ?Sized> {
    id: u64,
    observer: Observer<T>,
}

impl<T: ?Sized> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            observer: self.observer.clone(),
        }
    }
}

struct Registry<T: ?Sized> {
    next_id: u64,
    entries: Arc<Vec<Entry<T>>>,
}

fn lock<T: ?Sized>(registry: &Mutex<Registry<T>>) -> MutexGuard<'_, Registry<T>> {
    // Handlers never run under this lock, so a poisoned registry is still consistent.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A multi-subscriber notification channel.
///
/// Every registered [`Observer`] sees every value published after it
/// subscribed. Invocation order between observers is unspecified.
pub struct Channel<T: ?Sized> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: ?Sized> Channel<T> {
    /// Create a channel with no observers.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Arc::new(Vec::new()),
            })),
        }
    }

    /// Register an observer.
    ///
    /// The observer stays registered until [`Subscription::unsubscribe`] is
    /// called. Dropping the subscription does not unsubscribe.
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription<T> {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        Arc::make_mut(&mut registry.entries).push(Entry { id, observer });

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Publish a value to every observer's `on_next` handler.
    pub fn next(&self, value: &T) {
        for entry in self.snapshot().iter() {
            entry.observer.notify_next(value);
        }
    }

    /// Publish a fault to every observer's `on_error` handler.
    pub fn error(&self, err: &RevealError) {
        for entry in self.snapshot().iter() {
            entry.observer.notify_error(err);
        }
    }

    /// Signal completion to every observer's `on_complete` handler.
    ///
    /// Observers remain registered and will see later values.
    pub fn complete(&self) {
        for entry in self.snapshot().iter() {
            entry.observer.notify_complete();
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        lock(&self.registry).entries.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Arc<Vec<Entry<T>>> {
        Arc::clone(&lock(&self.registry).entries)
    }
}

impl<T: ?Sized> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("observers", &self.len())
            .finish()
    }
}

/// Token returned by [`Channel::subscribe`].
///
/// Holds only a weak reference to the channel, so it never keeps the channel
/// alive on its own.
pub struct Subscription<T: ?Sized> {
    id: u64,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T: ?Sized> Subscription<T> {
    /// Remove the observer from its channel.
    ///
    /// Returns `false` if the channel is gone or the observer was already
    /// removed. An in-progress publish may still deliver one more value to
    /// the observer.
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = lock(&registry);
        let Some(index) = registry.entries.iter().position(|e| e.id == self.id) else {
            return false;
        };
        Arc::make_mut(&mut registry.entries).swap_remove(index);
        true
    }
}

impl<T: ?Sized> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
