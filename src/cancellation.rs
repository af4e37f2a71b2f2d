//! Cooperative cancellation for the sender thread.
//!
//! Cancellation is signalled by dropping the only sender of a channel; every
//! clone of the [`CancelToken`] then observes a disconnected receiver. Blocking
//! waits on the sender thread select on that receiver so they return as soon
//! as cancellation fires.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, never};

/// Create a linked trigger/token pair.
pub fn cancellation() -> (CancelTrigger, CancelToken) {
    let (tx, rx) = bounded(0);
    (CancelTrigger { tx: Some(tx) }, CancelToken { rx })
}

/// Owner side of a cancellation pair. Dropping it cancels as well.
#[derive(Debug)]
pub struct CancelTrigger {
    tx: Option<Sender<()>>,
}

impl CancelTrigger {
    /// Fire cancellation. Idempotent.
    pub fn cancel(&mut self) {
        self.tx.take();
    }
}

/// Observer side of a cancellation pair.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: Receiver<()>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self { rx: never() }
    }

    pub fn is_cancelled(&self) -> bool {
        !matches!(self.rx.try_recv(), Err(TryRecvError::Empty))
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `true` when the full duration elapsed and `false` when the wait
    /// was cut short by cancellation.
    pub fn sleep(&self, duration: Duration) -> bool {
        matches!(self.rx.recv_timeout(duration), Err(RecvTimeoutError::Timeout))
    }

    pub(crate) fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}
