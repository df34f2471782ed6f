//! Blocking single-item handoff channel.
//!
//! A `Mutex<Vec<T>>` paired with a `Condvar`. Producers push and never block;
//! consumers block until at least one value is pending and then take the most
//! recently sent one. Removal is LIFO: when several values pile up before a
//! consumer drains them, the consumer sees the newest first.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::error::ChannelError;

/// Thread-safe blocking handoff of values of type `T`.
///
/// Share it behind an `Arc` (or a borrowing scope) between any number of
/// senders and receivers. Each sent value is delivered to exactly one
/// `receive` call.
pub struct BlockingChannel<T> {
    /// Pending values; the end of the vector is the next value handed out.
    pending: Mutex<Vec<T>>,
    /// Signalled once per `send`.
    not_empty: Condvar,
}

impl<T> BlockingChannel<T> {
    /// Creates an empty channel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Moves `value` into the channel and wakes one blocked receiver.
    ///
    /// Never blocks beyond the brief critical section.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::CapacityExhausted`] if the pending sequence
    /// cannot grow to hold another value. The value is dropped in that case.
    pub fn send(&self, value: T) -> Result<(), ChannelError> {
        {
            let mut pending = self.lock();
            pending
                .try_reserve(1)
                .map_err(|_| ChannelError::CapacityExhausted)?;
            pending.push(value);
        }
        self.not_empty.notify_one();
        Ok(())
    }

    /// Blocks until a value is pending, then removes and returns the most
    /// recently sent one.
    ///
    /// Spurious wakeups are absorbed: the "non-empty" predicate is re-checked
    /// under the lock before anything is taken. There is no timeout; if no
    /// value is ever sent this call never returns.
    pub fn receive(&self) -> T {
        let mut pending = self.lock();
        loop {
            if let Some(value) = pending.pop() {
                return value;
            }
            // Releases the lock while parked; woken receivers loop and re-check.
            pending = self
                .not_empty
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Removes and returns the most recently sent value, if any, without
    /// blocking.
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop()
    }

    /// Number of values currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no values are currently pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Acquires the lock, recovering the guard if a previous holder panicked.
    ///
    /// `push` and `pop` leave the vector consistent even when unwinding, so a
    /// poisoned lock carries no torn state.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for BlockingChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BlockingChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingChannel")
            .field("pending", &self.len())
            .finish_non_exhaustive()
    }
}
