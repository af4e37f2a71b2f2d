//! Lifecycle of the access-log pipeline.
//!
//! [`AccessLogValve`] is what the host holds: it accepts events from request
//! threads without blocking, runs the sender on a dedicated thread, and on
//! [`stop`](AccessLogValve::stop) drains the queue within the configured
//! shutdown timeout.

mod worker;


use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use log::{info, warn};
use parking_lot::Mutex;

use crate::{
    access_event::{AccessEvent, RequestSnapshot, ResponseSnapshot},
    cancellation::cancellation,
    config::{Configuration, Properties},
    error::AccessLogError,
    queue::{EventQueue, QueueError},
    rate_limited_warner::{DEFAULT_WARN_INTERVAL, RateLimitedWarner},
    sender::{EventSender, SenderOptions},
    transport::{HttpTransport, Transport},
};

use worker::{WorkerHandle, spawn_worker};

/// Delay between the end of one drain cycle and the start of the next.
pub const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// Hook invoked by the host once per completed request.
pub trait AccessLog {
    fn log(&self, request: &RequestSnapshot, response: &ResponseSnapshot, processing_time: Duration);
}

/// Scheduling and diagnostics options for [`AccessLogValve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValveOptions {
    pub tick: Duration,
    pub sender: SenderOptions,
    pub warn_interval: Duration,
}

impl Default for ValveOptions {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            sender: SenderOptions::default(),
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}

impl ValveOptions {
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_sender(mut self, sender: SenderOptions) -> Self {
        self.sender = sender;
        self
    }

    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.warn_interval = interval;
        self
    }
}

/// Running access-log pipeline.
pub struct AccessLogValve {
    queue: EventQueue,
    worker: Mutex<Option<WorkerHandle>>,
    closed: AtomicBool,
    full_warner: RateLimitedWarner,
    closed_warner: RateLimitedWarner,
    shutdown_timeout: Duration,
}

impl AccessLogValve {
    /// Start shipping to the configured endpoint over HTTP(S).
    ///
    /// # Errors
    ///
    /// Returns [`AccessLogError`] if the transport cannot be created or the
    /// sender thread cannot be spawned.
    pub fn start(config: Configuration) -> Result<Self, AccessLogError> {
        Self::start_with_options(config, ValveOptions::default())
    }

    /// Resolve the configuration from the process environment and start.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLogError::Config`] when a required key is missing or a
    /// value is invalid, in addition to the errors of [`start`](Self::start).
    pub fn start_from_env() -> Result<Self, AccessLogError> {
        Self::start(Configuration::from_env()?)
    }

    /// Resolve the configuration from `properties`, falling back to the
    /// process environment, and start.
    pub fn start_from_properties(properties: &Properties) -> Result<Self, AccessLogError> {
        Self::start(Configuration::from_properties(properties)?)
    }

    /// Like [`start`](Self::start) with custom scheduling options.
    pub fn start_with_options(
        config: Configuration,
        options: ValveOptions,
    ) -> Result<Self, AccessLogError> {
        let config = Arc::new(config);
        let transport = HttpTransport::new(Arc::clone(&config))?;
        Self::launch(config, transport, options)
    }

    /// Start with a caller-supplied [`Transport`].
    pub fn start_with_transport<T>(
        config: Configuration,
        transport: T,
        options: ValveOptions,
    ) -> Result<Self, AccessLogError>
    where
        T: Transport + 'static,
    {
        Self::launch(Arc::new(config), transport, options)
    }

    fn launch<T>(
        config: Arc<Configuration>,
        transport: T,
        options: ValveOptions,
    ) -> Result<Self, AccessLogError>
    where
        T: Transport + 'static,
    {
        if config.is_unencrypted() {
            warn!(
                "access log endpoint {} uses plain http; the token is sent unencrypted, prefer https",
                config.endpoint_url()
            );
        }
        info!(
            "shipping access logs to {} as host {:?}, source {:?}",
            config.endpoint_url(),
            config.host(),
            config.source()
        );

        let queue = EventQueue::with_capacity(config.queue_length());
        let shutdown_timeout = config.shutdown_timeout();
        let (trigger, token) = cancellation();
        let sender = EventSender::new(queue.clone(), transport, config, options.sender, token);
        let worker = spawn_worker(sender, trigger, options.tick)?;

        Ok(Self {
            queue,
            worker: Mutex::new(Some(worker)),
            closed: AtomicBool::new(false),
            full_warner: RateLimitedWarner::new(options.warn_interval),
            closed_warner: RateLimitedWarner::new(options.warn_interval),
            shutdown_timeout,
        })
    }

    /// Enqueue `event` without blocking.
    ///
    /// # Errors
    ///
    /// * [`QueueError::Full`] - The queue is at capacity; the event was dropped.
    /// * [`QueueError::Closed`] - The valve has been stopped.
    pub fn log_event(&self, event: AccessEvent) -> Result<(), QueueError> {
        if self.closed.load(Ordering::Acquire) {
            self.closed_warner.record_drop();
            self.closed_warner.warn_if_due(|count| {
                warn!("dropped {count} access events after shutdown");
            });
            return Err(QueueError::Closed);
        }
        self.queue.offer(event).inspect_err(|_| {
            self.full_warner.record_drop();
            self.full_warner.warn_if_due(|count| {
                warn!("access log queue full: dropped {count} access events");
            });
        })
    }

    /// Events waiting to be sent.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stop accepting events and drain the queue.
    ///
    /// Waits at most the configured shutdown timeout for the final drain,
    /// then abandons whatever is left. Calling it again is a no-op.
    pub fn stop(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let Some(mut worker) = self.worker.lock().take() else {
            return;
        };
        match worker.shutdown(self.shutdown_timeout) {
            Some(report) if report.cancelled => {
                warn!("access log shutdown abandoned {} events", report.abandoned);
            }
            Some(report) => info!(
                "access log stopped after sending {} remaining events",
                report.events
            ),
            None => {}
        }
        self.full_warner.flush(|count| {
            warn!("access log queue full: dropped {count} access events");
        });
    }
}

impl AccessLog for AccessLogValve {
    fn log(&self, request: &RequestSnapshot, response: &ResponseSnapshot, processing_time: Duration) {
        // Rejections are already reported through the rate-limited warners.
        let _ = self.log_event(AccessEvent::from_snapshots(
            request,
            response,
            processing_time,
        ));
    }
}

impl Drop for AccessLogValve {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for AccessLogValve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLogValve")
            .field("pending", &self.queue.len())
            .field("capacity", &self.queue.capacity())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}
