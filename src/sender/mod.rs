//! Batch building and delivery with unbounded retry.
//!
//! One [`EventSender::run_cycle`] call empties the queue batch by batch. A
//! batch is serialized once and resent verbatim after each failure, waiting
//! according to the [`BackoffPolicy`] in between, until the endpoint accepts it
//! or cancellation fires. FIFO order therefore holds across batches and
//! retries.

mod backoff;
mod config;


use std::sync::Arc;

use log::{debug, error, warn};

use crate::{
    access_event::AccessEvent, cancellation::CancelToken, config::Configuration,
    message::build_payload, queue::EventQueue, transport::Transport,
};

pub use backoff::BackoffState;
pub use config::{
    BackoffPolicy, DEFAULT_BACKOFF_CAP, DEFAULT_BACKOFF_INITIAL, DEFAULT_COALESCE_WINDOW,
    SenderOptions,
};

/// Outcome of one drain cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Batches the endpoint accepted.
    pub batches: usize,
    /// Events contained in accepted batches.
    pub events: usize,
    /// Events given up on after cancellation, including those still queued.
    pub abandoned: usize,
    /// Whether the cycle ended because cancellation fired.
    pub cancelled: bool,
}

enum Delivery {
    Accepted,
    Cancelled,
}

/// Drains an [`EventQueue`] into a [`Transport`].
pub struct EventSender<T: Transport> {
    queue: EventQueue,
    transport: T,
    config: Arc<Configuration>,
    options: SenderOptions,
    cancel: CancelToken,
}

impl<T: Transport> EventSender<T> {
    pub fn new(
        queue: EventQueue,
        transport: T,
        config: Arc<Configuration>,
        options: SenderOptions,
        cancel: CancelToken,
    ) -> Self {
        Self {
            queue,
            transport,
            config,
            options,
            cancel,
        }
    }

    /// Send batches until the queue is empty or cancellation fires.
    pub fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();
        while !self.queue.is_empty() {
            if self.cancel.is_cancelled() {
                return self.abandon(report, 0);
            }
            let batch = self.build_batch();
            if self.cancel.is_cancelled() {
                return self.abandon(report, batch.len());
            }
            if batch.is_empty() {
                continue;
            }
            match self.deliver(&batch) {
                Delivery::Accepted => {
                    report.batches += 1;
                    report.events += batch.len();
                }
                Delivery::Cancelled => return self.abandon(report, batch.len()),
            }
        }
        report
    }

    /// Pull up to the target's batch limit, waiting at most the coalescing
    /// window for each further event.
    fn build_batch(&self) -> Vec<AccessEvent> {
        let limit = self.config.target().max_batch_size().max(1);
        let mut batch = Vec::with_capacity(limit.min(self.queue.len().max(1)));
        while batch.len() < limit {
            match self
                .queue
                .drain_one(self.options.coalesce_window, &self.cancel)
            {
                Some(event) => batch.push(event),
                None => break,
            }
        }
        batch
    }

    fn deliver(&self, batch: &[AccessEvent]) -> Delivery {
        let payload = build_payload(batch, self.config.target(), &self.config);
        let mut backoff = BackoffState::new(self.options.backoff.clone());
        let mut attempt = 1u64;
        loop {
            if self.transport.send(payload.as_bytes()) {
                debug!("delivered {} access events", batch.len());
                return Delivery::Accepted;
            }
            let wait = backoff.next_sleep();
            warn!(
                "failed to deliver {} access events (attempt {attempt}), retrying in {wait:?}",
                batch.len()
            );
            if !self.cancel.sleep(wait) {
                return Delivery::Cancelled;
            }
            attempt += 1;
        }
    }

    fn abandon(&self, mut report: CycleReport, in_flight: usize) -> CycleReport {
        let queued = self.queue.len();
        report.abandoned = in_flight + queued;
        report.cancelled = true;
        error!(
            "access log sender cancelled: dropping {in_flight} events in the current batch and {queued} still queued"
        );
        report
    }
}
