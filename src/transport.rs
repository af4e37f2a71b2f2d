//! HTTP delivery of serialized batches.
//!
//! [`HttpTransport`] performs exactly one POST per call and reports only
//! whether the endpoint accepted the payload. Every failure mode (DNS,
//! refused connections, timeouts, error statuses, unreadable bodies) collapses
//! into `false` so the sender can apply a single retry policy.

use std::{fmt, sync::Arc};

use log::warn;
use native_tls::TlsConnector;
use ureq::{Agent, AgentBuilder};
use url::Url;

use crate::{config::Configuration, error::AccessLogError};

/// One request/response round trip to the collection endpoint.
pub trait Transport: Send {
    /// Deliver `payload`, returning `true` when the endpoint accepted it.
    fn send(&self, payload: &[u8]) -> bool;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, payload: &[u8]) -> bool {
        (**self).send(payload)
    }
}

/// [`Transport`] posting payloads over HTTP or HTTPS with `ureq`.
pub struct HttpTransport {
    agent: Agent,
    url: Url,
    auth_header: String,
    config: Arc<Configuration>,
}

impl HttpTransport {
    /// Build a transport for `config`.
    ///
    /// Idle connections are not kept: each call opens a fresh connection.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLogError::Tls`] if the TLS connector cannot be created
    /// for an `https` endpoint.
    pub fn new(config: Arc<Configuration>) -> Result<Self, AccessLogError> {
        let timeout = config.timeout();
        let mut builder = AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .max_idle_connections(0)
            .max_idle_connections_per_host(0);
        if config.endpoint_url().scheme() == "https" {
            builder = builder.tls_connector(Arc::new(TlsConnector::new()?));
        }
        let auth_header = config.target().auth_header(config.auth_token());
        Ok(Self {
            agent: builder.build(),
            url: config.endpoint_url().clone(),
            auth_header,
            config,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, payload: &[u8]) -> bool {
        let target = self.config.target();
        let result = self
            .agent
            .request_url("POST", &self.url)
            .set("Content-Type", target.content_type())
            .set("Authorization", &self.auth_header)
            .send_bytes(payload);

        match result {
            Ok(response) => {
                let status = response.status();
                match response.into_string() {
                    Ok(body) => {
                        let accepted = target.is_response_ok(status, &body);
                        if !accepted {
                            warn!("access log endpoint refused payload: status {status}, body {body:?}");
                        }
                        accepted
                    }
                    Err(err) => {
                        warn!("failed to read access log endpoint response: {err}");
                        false
                    }
                }
            }
            Err(ureq::Error::Status(code, _)) => {
                warn!("access log endpoint returned status {code}");
                false
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!("access log request to {} failed: {transport}", self.url);
                false
            }
        }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("url", &self.url.as_str())
            .field("timeout", &self.config.timeout())
            .finish()
    }
}
