//! Splunk HTTP Event Collector (HEC) target.
//!
//! Events are wrapped in HEC metadata (`time`, `index`, `host`, `source`,
//! `sourcetype`) with the access data nested under `event`. Field order is
//! part of the wire format and must not change.

use chrono::{DateTime, Utc};

use super::Target;
use crate::{access_event::AccessEvent, config::Configuration, json_builder::JsonBuilder};

/// Events per request; keeps individual HEC requests small.
pub const SPLUNK_MAX_BATCH_SIZE: usize = 25;
/// Fixed `sourcetype` attached to every event.
pub const SPLUNK_SOURCE_TYPE: &str = "access";

const PLACEHOLDER: &str = "-";
const SUCCESS_MARKER: &str = "Success";

/// [`Target`] for Splunk HEC endpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplunkTarget;

impl SplunkTarget {
    pub fn new() -> Self {
        Self
    }
}

impl Target for SplunkTarget {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn auth_header(&self, token: &str) -> String {
        format!("Splunk {token}")
    }

    fn max_batch_size(&self) -> usize {
        SPLUNK_MAX_BATCH_SIZE
    }

    fn format_event(&self, event: &AccessEvent, config: &Configuration) -> String {
        let mut json = JsonBuilder::new();
        json.start_object(None)
            .append_str("time", &epoch_seconds(event.timestamp()));
        if let Some(index) = config.index() {
            json.append_str("index", index);
        }
        json.append_str("host", config.host())
            .append_str("source", config.source())
            .append_str("sourcetype", SPLUNK_SOURCE_TYPE)
            .start_object(Some("event"))
            .append_str("remoteHost", event.remote_host())
            .append_str("method", event.method())
            .append_str("uri", event.uri())
            .append_str("user", event.remote_user().unwrap_or(PLACEHOLDER))
            .append_str("sessionId", event.session_id().unwrap_or(PLACEHOLDER))
            .append_str("userAgent", event.user_agent().unwrap_or(PLACEHOLDER))
            .append_number("status", event.status())
            .append_number("bytes", event.bytes())
            .append_number("processingTime", event.processing_millis())
            .end_object()
            .end_object();
        json.finish()
    }

    /// HEC answers `200` with `{"text":"Success","code":0}` on acceptance.
    fn is_response_ok(&self, status: u16, body: &str) -> bool {
        status == 200 && body.contains(SUCCESS_MARKER)
    }
}

/// Epoch seconds with a three-digit millisecond fraction, e.g. `1700000000.123`.
fn epoch_seconds(timestamp: DateTime<Utc>) -> String {
    let millis = timestamp.timestamp_millis();
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}
