//! Background thread running the sender on a fixed delay.

use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::{debug, error, warn};

use crate::{
    cancellation::CancelTrigger,
    error::AccessLogError,
    sender::{CycleReport, EventSender},
    transport::Transport,
};

const THREAD_NAME: &str = "httpaccesslog-sender";

/// Handle owning the sender thread and its control channels.
pub(crate) struct WorkerHandle {
    stop_tx: Option<Sender<()>>,
    done_rx: Receiver<CycleReport>,
    cancel: CancelTrigger,
    thread: Option<JoinHandle<()>>,
}

/// Start the sender thread. The first cycle runs one `tick` after start.
pub(crate) fn spawn_worker<T>(
    sender: EventSender<T>,
    cancel: CancelTrigger,
    tick: Duration,
) -> Result<WorkerHandle, AccessLogError>
where
    T: Transport + 'static,
{
    let (stop_tx, stop_rx) = bounded::<()>(1);
    let (done_tx, done_rx) = bounded(1);
    let thread = thread::Builder::new()
        .name(THREAD_NAME.into())
        .spawn(move || run_schedule(&sender, &stop_rx, &done_tx, tick))
        .map_err(AccessLogError::Spawn)?;
    Ok(WorkerHandle {
        stop_tx: Some(stop_tx),
        done_rx,
        cancel,
        thread: Some(thread),
    })
}

/// Run cycles with `tick` between the end of one and the start of the next.
///
/// When the stop channel disconnects, one final cycle drains what is left and
/// its report is sent on `done_tx`.
fn run_schedule<T: Transport>(
    sender: &EventSender<T>,
    stop_rx: &Receiver<()>,
    done_tx: &Sender<CycleReport>,
    tick: Duration,
) {
    loop {
        match stop_rx.recv_timeout(tick) {
            Err(RecvTimeoutError::Timeout) => {
                let report = sender.run_cycle();
                if report.cancelled {
                    return;
                }
                if report.batches > 0 {
                    debug!(
                        "access log cycle sent {} events in {} batches",
                        report.events, report.batches
                    );
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    let report = sender.run_cycle();
    let _ = done_tx.send(report);
}

impl WorkerHandle {
    /// Stop scheduling, wait up to `timeout` for the final drain, then cancel
    /// whatever is still running and join the thread.
    ///
    /// Returns the final cycle's report when it finished in time.
    pub(crate) fn shutdown(&mut self, timeout: Duration) -> Option<CycleReport> {
        self.stop_tx.take();
        let report = match self.done_rx.recv_timeout(timeout) {
            Ok(report) => Some(report),
            Err(RecvTimeoutError::Timeout) => {
                warn!("access log queue not drained within {timeout:?}; cancelling delivery");
                None
            }
            Err(RecvTimeoutError::Disconnected) => None,
        };
        self.cancel.cancel();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            error!("access log sender thread panicked");
        }
        report
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.shutdown(Duration::ZERO);
        }
    }
}
