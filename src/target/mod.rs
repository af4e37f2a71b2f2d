//! Backend-specific formatting, authentication, and response validation.
//!
//! Each log-collection backend is a [`Target`] implementation. The rest of the
//! pipeline only talks to the trait, so adding a backend never requires
//! branching on a backend name elsewhere.

mod splunk;

use std::fmt;

use crate::{access_event::AccessEvent, config::Configuration};

pub use splunk::{SPLUNK_MAX_BATCH_SIZE, SPLUNK_SOURCE_TYPE, SplunkTarget};

/// Strategy describing how one backend expects events to be delivered.
///
/// Implementations must be immutable once constructed; they are shared
/// between the producer side and the sender thread without locking.
pub trait Target: Send + Sync + fmt::Debug {
    /// Value of the `Content-Type` request header.
    fn content_type(&self) -> &str;

    /// Value of the `Authorization` request header for `token`.
    fn auth_header(&self, token: &str) -> String;

    /// Maximum number of events bundled into a single request.
    fn max_batch_size(&self) -> usize;

    /// Serialize one event into the fragment placed inside the payload array.
    fn format_event(&self, event: &AccessEvent, config: &Configuration) -> String;

    /// Decide whether the endpoint accepted the payload.
    fn is_response_ok(&self, status: u16, body: &str) -> bool;
}
