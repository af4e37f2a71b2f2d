//! Fixtures shared by the integration tests: access events, listeners, and
//! configurations pointing at a local mock endpoint.

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use httpaccesslog::{
    AccessEvent, ConfigBuilder, RequestSnapshot, ResponseSnapshot, test_utils::UriTarget,
};
use rstest::fixture;

/// Listener on an ephemeral local port.
#[fixture]
pub fn tcp_listener() -> TcpListener {
    TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener")
}

/// Event for `uri` stamped at a fixed instant.
pub fn event(uri: &str) -> AccessEvent {
    let timestamp = Utc
        .timestamp_millis_opt(1_700_000_000_123)
        .single()
        .expect("valid timestamp");
    AccessEvent::captured_at(
        timestamp,
        RequestSnapshot {
            remote_host: "192.0.2.7".into(),
            method: "POST".into(),
            uri: uri.into(),
            remote_user: Some("alice".into()),
            session_id: None,
            user_agent: Some("curl/8.0".into()),
        },
        ResponseSnapshot {
            status: 201,
            bytes: 512,
        },
        Duration::from_millis(42),
    )
}

/// Splunk configuration posting to `addr`.
pub fn splunk_config(addr: SocketAddr) -> ConfigBuilder {
    ConfigBuilder::new()
        .with_url(format!("http://{addr}/services/collector"))
        .with_token("integration-token")
        .with_host("web-01")
        .with_index("main")
        .with_timeout_ms(2_000)
}

/// Configuration with URI-only payloads and the given batch limit.
pub fn uri_config(limit: usize) -> ConfigBuilder {
    ConfigBuilder::new()
        .with_url("https://collector.invalid/ingest")
        .with_token("t")
        .with_host("prop")
        .with_target(Arc::new(UriTarget::new(limit)))
}
