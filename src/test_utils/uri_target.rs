//! Minimal [`Target`] whose fragments are just the request URI.

use crate::{access_event::AccessEvent, config::Configuration, target::Target};

/// Target rendering each event as a JSON string of its URI.
///
/// Payloads therefore parse as `Vec<String>`, which keeps ordering and
/// batching assertions short.
#[derive(Clone, Copy, Debug)]
pub struct UriTarget {
    max_batch: usize,
}

impl UriTarget {
    pub fn new(max_batch: usize) -> Self {
        Self { max_batch }
    }

    /// Decode a payload produced with this target back into URIs.
    pub fn decode(payload: &str) -> Vec<String> {
        serde_json::from_str(payload).unwrap_or_default()
    }
}

impl Target for UriTarget {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn auth_header(&self, token: &str) -> String {
        format!("Bearer {token}")
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch
    }

    fn format_event(&self, event: &AccessEvent, _config: &Configuration) -> String {
        serde_json::Value::from(event.uri()).to_string()
    }

    fn is_response_ok(&self, status: u16, _body: &str) -> bool {
        status == 200
    }
}
