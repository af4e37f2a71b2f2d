//! Runtime configuration for the access-log pipeline.
//!
//! A [`Configuration`] is built once at startup, either programmatically via
//! [`ConfigBuilder`] or from properties and environment variables via
//! [`Configuration::from_env`] / [`Configuration::from_properties`]. It is
//! immutable afterwards and shared by `Arc` with the sender and transport.
//!
//! Every key can be supplied as a property `httpaccesslogvalve.<key>` or as an
//! environment variable `HTTPACCESSLOGVALVE_<KEY>`. Properties are consulted first
//! and the first non-empty value wins.

mod builder;
mod sources;

#[cfg(test)]
mod tests;

use std::{fmt, num::ParseIntError, sync::Arc, time::Duration};

use thiserror::Error;
use url::Url;

use crate::target::Target;

pub use builder::ConfigBuilder;
pub use sources::{PROPERTIES_SECTION, Properties, env_name, property_name};

/// Default queue capacity.
pub const DEFAULT_QUEUE_LENGTH: usize = 1000;
/// Default connect and read timeout for each request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);
/// Default time granted to drain the queue on shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
/// Default `source` label.
pub const DEFAULT_SOURCE: &str = "HttpAccessLogValve";
/// Host label used when the local hostname cannot be determined.
pub const FALLBACK_HOST: &str = "UnknownHost";

/// Errors raised while assembling a [`Configuration`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key was not supplied by any source.
    #[error(
        "cannot continue without either property {} or environment variable {}",
        property_name(.key),
        env_name(.key)
    )]
    Missing { key: &'static str },
    /// The endpoint URL could not be parsed.
    #[error("invalid endpoint URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The endpoint URL uses a scheme other than `http` or `https`.
    #[error("protocol {0} not supported")]
    UnsupportedProtocol(String),
    /// A numeric key held something other than an unsigned integer.
    #[error("invalid value {value:?} for {}: {source}", property_name(.key))]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    /// A value was syntactically valid but out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The properties file could not be read or parsed.
    #[error("failed to load properties: {0}")]
    Properties(#[from] ini::Error),
}

/// Validated, immutable pipeline configuration.
#[derive(Clone)]
pub struct Configuration {
    endpoint_url: Url,
    auth_token: String,
    host: String,
    index: Option<String>,
    source: String,
    queue_length: usize,
    timeout: Duration,
    shutdown_timeout: Duration,
    target: Arc<dyn Target>,
}

impl Configuration {
    /// Start building a configuration programmatically.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_properties(&Properties::new())
    }

    /// Read the configuration from `properties`, falling back to the process
    /// environment for keys the properties leave unset or empty.
    pub fn from_properties(properties: &Properties) -> Result<Self, ConfigError> {
        Self::resolve(properties, |name| std::env::var(name).ok())
    }

    /// Read the configuration from `properties` and an arbitrary environment
    /// lookup.
    pub fn resolve<E>(properties: &Properties, env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        sources::resolve(properties, env)?.build()
    }

    /// URL the payloads are posted to.
    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }

    /// Token passed to [`Target::auth_header`].
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Name of the logging host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Index to log to; the backend default is used when `None`.
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn queue_length(&self) -> usize {
        self.queue_length
    }

    /// Connect and read timeout applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    pub fn target(&self) -> &dyn Target {
        self.target.as_ref()
    }

    /// Whether the endpoint is reached over plain `http`.
    pub fn is_unencrypted(&self) -> bool {
        self.endpoint_url.scheme() == "http"
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("endpoint_url", &self.endpoint_url.as_str())
            .field("auth_token", &"<redacted>")
            .field("host", &self.host)
            .field("index", &self.index)
            .field("source", &self.source)
            .field("queue_length", &self.queue_length)
            .field("timeout", &self.timeout)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("target", &self.target)
            .finish()
    }
}
