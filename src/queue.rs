//! Bounded event queue shared by producers and the sender thread.
//!
//! Producers call [`EventQueue::offer`], which never blocks: when the queue is
//! at capacity the event is rejected immediately and the caller decides how
//! to report the drop. The single consumer pulls with
//! [`EventQueue::drain_one`], waiting at most the supplied timeout.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select};
use thiserror::Error;

use crate::{access_event::AccessEvent, cancellation::CancelToken};

/// Reasons an event was not accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue is at capacity.
    #[error("event queue is full")]
    Full,
    /// The pipeline has shut down.
    #[error("event queue is closed")]
    Closed,
}

/// FIFO buffer of [`AccessEvent`] values with a fixed capacity.
#[derive(Clone, Debug)]
pub struct EventQueue {
    tx: Sender<AccessEvent>,
    rx: Receiver<AccessEvent>,
    capacity: usize,
}

impl EventQueue {
    /// Create a queue holding at most `capacity` events (minimum one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Enqueue `event` without blocking.
    ///
    /// # Errors
    ///
    /// * [`QueueError::Full`] - The queue is at capacity; the event was dropped.
    pub fn offer(&self, event: AccessEvent) -> Result<(), QueueError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(QueueError::Full),
            Err(TrySendError::Disconnected(_)) => Err(QueueError::Closed),
        }
    }

    /// Take the oldest event, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` on timeout or as soon as `cancel` fires.
    pub fn drain_one(&self, timeout: Duration, cancel: &CancelToken) -> Option<AccessEvent> {
        select! {
            recv(self.rx) -> event => event.ok(),
            recv(cancel.receiver()) -> _ => None,
            default(timeout) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
