//! Access event representation.
//!
//! An [`AccessEvent`] is the immutable snapshot of one completed request. The
//! host captures it once, hands it to the queue, and never touches it again.
//! Fields are private so the value cannot change after construction.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Request attributes the host exposes once a request has completed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestSnapshot {
    /// Remote host name or address of the client.
    pub remote_host: String,
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request path without the query string.
    pub uri: String,
    /// Authenticated user, if any.
    pub remote_user: Option<String>,
    /// Session identifier requested by the client, if any.
    pub session_id: Option<String>,
    /// Value of the `User-Agent` header, if present.
    pub user_agent: Option<String>,
}

/// Response attributes the host exposes once a request has completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResponseSnapshot {
    /// HTTP status code sent to the client.
    pub status: u16,
    /// Number of response bytes.
    pub bytes: u64,
}

/// Snapshot of one completed request/response pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessEvent {
    timestamp: DateTime<Utc>,
    remote_host: String,
    method: String,
    uri: String,
    remote_user: Option<String>,
    session_id: Option<String>,
    user_agent: Option<String>,
    status: u16,
    bytes: u64,
    processing_time: Duration,
}

impl AccessEvent {
    /// Capture an event stamped with the current time.
    pub fn from_snapshots(
        request: &RequestSnapshot,
        response: &ResponseSnapshot,
        processing_time: Duration,
    ) -> Self {
        Self::captured_at(Utc::now(), request.clone(), *response, processing_time)
    }

    /// Build an event with an explicit timestamp.
    pub fn captured_at(
        timestamp: DateTime<Utc>,
        request: RequestSnapshot,
        response: ResponseSnapshot,
        processing_time: Duration,
    ) -> Self {
        let RequestSnapshot {
            remote_host,
            method,
            uri,
            remote_user,
            session_id,
            user_agent,
        } = request;
        Self {
            timestamp,
            remote_host,
            method,
            uri,
            remote_user,
            session_id,
            user_agent,
            status: response.status,
            bytes: response.bytes,
            processing_time,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn remote_user(&self) -> Option<&str> {
        self.remote_user.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    /// Processing time in whole milliseconds, saturating at `u64::MAX`.
    pub fn processing_millis(&self) -> u64 {
        u64::try_from(self.processing_time.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> RequestSnapshot {
        RequestSnapshot {
            remote_host: "127.0.0.1".into(),
            method: "GET".into(),
            uri: "/index.html".into(),
            remote_user: None,
            session_id: Some("abc123".into()),
            user_agent: Some("testClient".into()),
        }
    }

    #[rstest]
    fn from_snapshots_copies_request_and_response(request: RequestSnapshot) {
        let before = Utc::now();
        let response = ResponseSnapshot {
            status: 404,
            bytes: 123,
        };
        let event = AccessEvent::from_snapshots(&request, &response, Duration::from_millis(5));
        let after = Utc::now();

        assert_eq!(event.remote_host(), "127.0.0.1");
        assert_eq!(event.method(), "GET");
        assert_eq!(event.uri(), "/index.html");
        assert_eq!(event.remote_user(), None);
        assert_eq!(event.session_id(), Some("abc123"));
        assert_eq!(event.user_agent(), Some("testClient"));
        assert_eq!(event.status(), 404);
        assert_eq!(event.bytes(), 123);
        assert_eq!(event.processing_millis(), 5);
        assert!(event.timestamp() >= before && event.timestamp() <= after);
    }

    #[rstest]
    fn processing_millis_truncates_sub_millisecond_precision(request: RequestSnapshot) {
        let event = AccessEvent::captured_at(
            Utc::now(),
            request,
            ResponseSnapshot::default(),
            Duration::from_micros(2_999),
        );
        assert_eq!(event.processing_millis(), 2);
    }
}
