//! Ships HTTP access-log events to a remote log-collection endpoint.
//!
//! Request threads hand completed-request snapshots to an
//! [`AccessLogValve`], which buffers them in a bounded queue. A single
//! background thread periodically drains the queue into batches, serializes
//! them for the configured [`Target`] and posts them over HTTP(S), retrying
//! failed batches with capped exponential backoff.

pub mod access_event;
pub mod cancellation;
pub mod config;
pub mod error;
mod json_builder;
pub mod message;
pub mod queue;
pub mod rate_limited_warner;
pub mod sender;
pub mod target;
pub mod transport;
pub mod valve;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use access_event::{AccessEvent, RequestSnapshot, ResponseSnapshot};
pub use cancellation::{CancelToken, CancelTrigger, cancellation};
pub use config::{ConfigBuilder, ConfigError, Configuration, Properties};
pub use error::AccessLogError;
pub use message::build_payload;
pub use queue::{EventQueue, QueueError};
pub use sender::{BackoffPolicy, CycleReport, EventSender, SenderOptions};
pub use target::{SplunkTarget, Target};
pub use transport::{HttpTransport, Transport};
pub use valve::{AccessLog, AccessLogValve, ValveOptions};
