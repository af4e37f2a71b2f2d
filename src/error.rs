//! Errors surfaced when starting the access-log pipeline.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Failures that prevent the valve from starting.
///
/// Once running, delivery problems are logged and retried rather than
/// returned, so this type only covers startup.
#[derive(Debug, Error)]
pub enum AccessLogError {
    /// The configuration could not be resolved or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The TLS connector for an `https` endpoint could not be created.
    #[error("failed to initialise TLS: {0}")]
    Tls(#[from] native_tls::Error),
    /// The background sender thread could not be spawned.
    #[error("failed to spawn access log sender thread: {0}")]
    Spawn(#[source] io::Error),
}
