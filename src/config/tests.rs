//! Unit tests for configuration building and source resolution.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};

use super::*;
use crate::test_utils::UriTarget;

type Env = HashMap<&'static str, &'static str>;

fn env_of(pairs: &[(&'static str, &'static str)]) -> Env {
    pairs.iter().copied().collect()
}

fn resolve_with(properties: &Properties, env: &Env) -> Result<Configuration, ConfigError> {
    Configuration::resolve(properties, |name| env.get(name).map(|v| (*v).to_owned()))
}

#[fixture]
fn minimal_env() -> Env {
    env_of(&[
        ("HTTPACCESSLOGVALVE_URL", "https://hec.example.com/services/collector"),
        ("HTTPACCESSLOGVALVE_TOKEN", "env-token"),
    ])
}

#[rstest]
fn no_sources_fails_on_url() {
    let err = resolve_with(&Properties::new(), &Env::new()).expect_err("url is required");
    assert!(matches!(err, ConfigError::Missing { key: "url" }));
    assert_eq!(
        err.to_string(),
        "cannot continue without either property httpaccesslogvalve.url or environment variable HTTPACCESSLOGVALVE_URL"
    );
}

#[rstest]
fn missing_token_is_reported() {
    let env = env_of(&[("HTTPACCESSLOGVALVE_URL", "https://hec.example.com")]);
    let err = resolve_with(&Properties::new(), &env).expect_err("token is required");
    assert!(matches!(err, ConfigError::Missing { key: "token" }));
}

#[rstest]
fn defaults_are_applied(minimal_env: Env) {
    let config = resolve_with(&Properties::new(), &minimal_env).expect("valid");
    assert_eq!(
        config.endpoint_url().as_str(),
        "https://hec.example.com/services/collector"
    );
    assert_eq!(config.auth_token(), "env-token");
    assert!(!config.host().is_empty());
    assert_eq!(config.index(), None);
    assert_eq!(config.source(), DEFAULT_SOURCE);
    assert_eq!(config.queue_length(), 1000);
    assert_eq!(config.timeout(), Duration::from_secs(60));
    assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    assert_eq!(config.target().max_batch_size(), 25);
    assert!(!config.is_unencrypted());
}

#[rstest]
fn properties_take_precedence_over_environment(minimal_env: Env) {
    let mut properties = Properties::new();
    properties
        .set("httpaccesslogvalve.token", "prop-token")
        .set("httpaccesslogvalve.source", "prop-source");
    let config = resolve_with(&properties, &minimal_env).expect("valid");
    assert_eq!(config.auth_token(), "prop-token");
    assert_eq!(config.source(), "prop-source");
}

#[rstest]
fn empty_property_falls_back_to_environment(minimal_env: Env) {
    let mut properties = Properties::new();
    properties.set("httpaccesslogvalve.token", "");
    let config = resolve_with(&properties, &minimal_env).expect("valid");
    assert_eq!(config.auth_token(), "env-token");
}

#[rstest]
fn empty_environment_value_counts_as_unset() {
    let env = env_of(&[
        ("HTTPACCESSLOGVALVE_URL", "https://hec.example.com"),
        ("HTTPACCESSLOGVALVE_TOKEN", ""),
    ]);
    let err = resolve_with(&Properties::new(), &env).expect_err("token is empty");
    assert!(matches!(err, ConfigError::Missing { key: "token" }));
}

#[rstest]
fn numeric_values_are_parsed(mut minimal_env: Env) {
    minimal_env.insert("HTTPACCESSLOGVALVE_QUEUE", "5");
    minimal_env.insert("HTTPACCESSLOGVALVE_TIMEOUT", "1500");
    minimal_env.insert("HTTPACCESSLOGVALVE_SHUTDOWNTIMEOUT", "2");
    minimal_env.insert("HTTPACCESSLOGVALVE_INDEX", "web");
    minimal_env.insert("HTTPACCESSLOGVALVE_HOST", "web-01");
    let config = resolve_with(&Properties::new(), &minimal_env).expect("valid");
    assert_eq!(config.queue_length(), 5);
    assert_eq!(config.timeout(), Duration::from_millis(1500));
    assert_eq!(config.shutdown_timeout(), Duration::from_secs(2));
    assert_eq!(config.index(), Some("web"));
    assert_eq!(config.host(), "web-01");
}

#[rstest]
#[case("HTTPACCESSLOGVALVE_QUEUE", "lots")]
#[case("HTTPACCESSLOGVALVE_TIMEOUT", "-1")]
#[case("HTTPACCESSLOGVALVE_SHUTDOWNTIMEOUT", "1.5")]
fn malformed_numbers_are_rejected(
    mut minimal_env: Env,
    #[case] name: &'static str,
    #[case] value: &'static str,
) {
    minimal_env.insert(name, value);
    let err = resolve_with(&Properties::new(), &minimal_env).expect_err("malformed number");
    assert!(matches!(err, ConfigError::InvalidNumber { .. }), "{err}");
}

#[rstest]
#[case::queue(ConfigBuilder::new().with_queue_length(0))]
#[case::timeout(ConfigBuilder::new().with_timeout_ms(0))]
fn zero_sizes_are_rejected(#[case] builder: ConfigBuilder) {
    let err = builder
        .with_url("https://hec.example.com")
        .with_token("t")
        .build()
        .expect_err("zero rejected");
    assert!(matches!(err, ConfigError::InvalidConfig(_)));
}

#[rstest]
fn malformed_url_is_rejected() {
    let err = ConfigBuilder::new()
        .with_url("not a url")
        .with_token("t")
        .build()
        .expect_err("malformed url");
    assert!(matches!(err, ConfigError::InvalidUrl { .. }));
}

#[rstest]
#[case("ftp://example.com/upload", "ftp")]
#[case("file:///var/log/access", "file")]
fn unsupported_protocols_are_rejected(#[case] url: &str, #[case] scheme: &str) {
    let err = ConfigBuilder::new()
        .with_url(url)
        .with_token("t")
        .build()
        .expect_err("unsupported protocol");
    match err {
        ConfigError::UnsupportedProtocol(found) => assert_eq!(found, scheme),
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn plain_http_is_flagged_unencrypted() {
    let config = ConfigBuilder::new()
        .with_url("http://localhost:8088")
        .with_token("t")
        .build()
        .expect("valid");
    assert!(config.is_unencrypted());
}

#[rstest]
fn custom_target_is_bound() {
    let config = ConfigBuilder::new()
        .with_url("http://localhost:8088")
        .with_token("t")
        .with_target(Arc::new(UriTarget::new(3)))
        .build()
        .expect("valid");
    assert_eq!(config.target().max_batch_size(), 3);
}

#[rstest]
fn debug_output_redacts_token() {
    let config = ConfigBuilder::new()
        .with_url("http://localhost:8088")
        .with_token("super-secret")
        .build()
        .expect("valid");
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[rstest]
fn ini_section_keys_become_properties() {
    let properties = Properties::from_ini_str(
        "[httpaccesslogvalve]\nurl = https://hec.example.com\ntoken = ini-token\nqueue = 7\n",
    )
    .expect("parse ini");
    assert_eq!(properties.get("httpaccesslogvalve.url"), Some("https://hec.example.com"));
    let config = resolve_with(&properties, &Env::new()).expect("valid");
    assert_eq!(config.auth_token(), "ini-token");
    assert_eq!(config.queue_length(), 7);
}

#[rstest]
fn ini_file_with_flat_keys_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "httpaccesslogvalve.url = https://hec.example.com").expect("write");
    writeln!(file, "httpaccesslogvalve.token = flat-token").expect("write");
    let properties = Properties::from_ini_file(file.path()).expect("load ini");
    let config = resolve_with(&properties, &Env::new()).expect("valid");
    assert_eq!(config.auth_token(), "flat-token");
}

#[rstest]
fn missing_ini_file_is_an_error() {
    let err = Properties::from_ini_file("/nonexistent/httpaccesslogvalve.ini").expect_err("missing");
    assert!(matches!(err, ConfigError::Properties(_)));
}

#[rstest]
fn names_are_derived_from_keys() {
    assert_eq!(property_name("shutdownTimeout"), "httpaccesslogvalve.shutdowntimeout");
    assert_eq!(env_name("shutdowntimeout"), "HTTPACCESSLOGVALVE_SHUTDOWNTIMEOUT");
}

#[rstest]
fn unprefixed_valve_names_are_not_read() {
    let env = env_of(&[
        ("HTTPACCESSLOG_URL", "https://hec.example.com"),
        ("HTTPACCESSLOG_TOKEN", "t"),
    ]);
    let err = resolve_with(&Properties::new(), &env).expect_err("wrong prefix ignored");
    assert!(matches!(err, ConfigError::Missing { key: "url" }));
}
