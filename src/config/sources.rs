//! Property and environment sources for configuration values.
//!
//! [`Properties`] plays the role of process-level properties: an explicit
//! key/value map the host fills in directly or loads from an INI file. Lookups
//! consult the properties first and the environment second; empty values are
//! treated as unset.

use std::{collections::BTreeMap, path::Path, str::FromStr};

use ini::Ini;

use super::{ConfigBuilder, ConfigError};

/// INI section whose keys map onto `httpaccesslogvalve.<key>` properties.
pub const PROPERTIES_SECTION: &str = "httpaccesslogvalve";

const ENV_PREFIX: &str = "HTTPACCESSLOGVALVE_";

/// Property name for `key`, e.g. `httpaccesslogvalve.url`.
pub fn property_name(key: &str) -> String {
    format!("{PROPERTIES_SECTION}.{}", key.to_ascii_lowercase())
}

/// Environment variable name for `key`, e.g. `HTTPACCESSLOGVALVE_URL`.
pub fn env_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_ascii_uppercase())
}

/// Explicit configuration properties consulted before the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property by its full name, e.g. `httpaccesslogvalve.url`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Load properties from an INI file.
    ///
    /// Keys in the `[httpaccesslogvalve]` section become `httpaccesslogvalve.<key>`.
    /// Keys outside any section are taken verbatim, so a flat file of
    /// `httpaccesslogvalve.url = ...` lines works as well.
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::from_ini(&Ini::load_from_file(path)?))
    }

    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
        Ok(Self::from_ini(&ini))
    }

    fn from_ini(ini: &Ini) -> Self {
        let mut properties = Self::new();
        for (section, props) in ini.iter() {
            for (key, value) in props.iter() {
                let name = match section {
                    Some(section) if section.eq_ignore_ascii_case(PROPERTIES_SECTION) => {
                        property_name(key)
                    }
                    Some(section) => format!("{section}.{key}"),
                    None => key.to_owned(),
                };
                properties.set(name, value);
            }
        }
        properties
    }
}

/// First non-empty value for `key`, properties before environment.
fn lookup<E>(properties: &Properties, env: &E, key: &str) -> Option<String>
where
    E: Fn(&str) -> Option<String>,
{
    properties
        .get(&property_name(key))
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .or_else(|| env(&env_name(key)).filter(|value| !value.is_empty()))
}

fn parse_number<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumber { key, value, source })
}

/// Collect every key from the sources into a [`ConfigBuilder`].
pub(super) fn resolve<E>(properties: &Properties, env: E) -> Result<ConfigBuilder, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(properties, &env, key);

    let mut builder = ConfigBuilder::new();
    if let Some(url) = get("url") {
        builder = builder.with_url(url);
    }
    if let Some(token) = get("token") {
        builder = builder.with_token(token);
    }
    if let Some(host) = get("host") {
        builder = builder.with_host(host);
    }
    if let Some(index) = get("index") {
        builder = builder.with_index(index);
    }
    if let Some(source) = get("source") {
        builder = builder.with_source(source);
    }
    if let Some(queue) = get("queue") {
        builder = builder.with_queue_length(parse_number("queue", queue)?);
    }
    if let Some(timeout) = get("timeout") {
        builder = builder.with_timeout_ms(parse_number("timeout", timeout)?);
    }
    if let Some(shutdown) = get("shutdowntimeout") {
        builder = builder.with_shutdown_timeout_secs(parse_number("shutdowntimeout", shutdown)?);
    }
    Ok(builder)
}
