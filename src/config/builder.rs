//! Builder for [`Configuration`].
//!
//! Collects raw values, applies defaults, and validates everything in
//! [`ConfigBuilder::build`]. A [`Configuration`] can only be obtained through
//! this builder, so holding one implies it passed validation.

use std::{sync::Arc, time::Duration};

use log::warn;
use url::Url;

use super::{
    ConfigError, Configuration, DEFAULT_QUEUE_LENGTH, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_SOURCE,
    DEFAULT_TIMEOUT, FALLBACK_HOST,
};
use crate::target::{SplunkTarget, Target};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(ConfigError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing a validated [`Configuration`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    url: Option<String>,
    token: Option<String>,
    host: Option<String>,
    index: Option<String>,
    source: Option<String>,
    queue_length: Option<usize>,
    timeout_ms: Option<u64>,
    shutdown_timeout_secs: Option<u64>,
    target: Option<Arc<dyn Target>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL (required).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the authentication token (required).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the host label. Defaults to the local hostname.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    option_setter!(
        #[doc = "Set the queue capacity."]
        with_queue_length,
        queue_length,
        usize
    );
    option_setter!(
        #[doc = "Set the connect/read timeout in milliseconds."]
        with_timeout_ms,
        timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the shutdown drain timeout in seconds."]
        with_shutdown_timeout_secs,
        shutdown_timeout_secs,
        u64
    );

    /// Bind the backend target. Defaults to [`SplunkTarget`].
    pub fn with_target(mut self, target: Arc<dyn Target>) -> Self {
        self.target = Some(target);
        self
    }

    /// Validate the collected values and produce a [`Configuration`].
    pub fn build(self) -> Result<Configuration, ConfigError> {
        let endpoint_url = self.validate_url()?;
        let auth_token = self.validate_token()?;
        self.validate_sizes()?;

        Ok(Configuration {
            endpoint_url,
            auth_token,
            host: self.host.unwrap_or_else(local_hostname),
            index: self.index.filter(|index| !index.is_empty()),
            source: self.source.unwrap_or_else(|| DEFAULT_SOURCE.to_owned()),
            queue_length: self.queue_length.unwrap_or(DEFAULT_QUEUE_LENGTH),
            timeout: self
                .timeout_ms
                .map_or(DEFAULT_TIMEOUT, Duration::from_millis),
            shutdown_timeout: self
                .shutdown_timeout_secs
                .map_or(DEFAULT_SHUTDOWN_TIMEOUT, Duration::from_secs),
            target: self.target.unwrap_or_else(|| Arc::new(SplunkTarget::new())),
        })
    }

    fn validate_url(&self) -> Result<Url, ConfigError> {
        let raw = match &self.url {
            Some(url) if !url.trim().is_empty() => url.trim(),
            _ => return Err(ConfigError::Missing { key: "url" }),
        };
        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_owned(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedProtocol(other.to_owned())),
        }
    }

    fn validate_token(&self) -> Result<String, ConfigError> {
        match &self.token {
            Some(token) if !token.is_empty() => Ok(token.clone()),
            _ => Err(ConfigError::Missing { key: "token" }),
        }
    }

    fn validate_sizes(&self) -> Result<(), ConfigError> {
        if let Some(queue_length) = self.queue_length {
            ensure_positive!(queue_length, "queue length")?;
        }
        if let Some(timeout) = self.timeout_ms {
            ensure_positive!(timeout, "timeout")?;
        }
        Ok(())
    }
}

/// Local hostname, or [`FALLBACK_HOST`] when it cannot be determined.
pub(crate) fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => match name.into_string() {
            Ok(name) if !name.is_empty() => name,
            _ => {
                warn!("local hostname is empty or not valid UTF-8, using {FALLBACK_HOST}");
                FALLBACK_HOST.to_owned()
            }
        },
        Err(err) => {
            warn!("failed to determine local hostname: {err}");
            FALLBACK_HOST.to_owned()
        }
    }
}
