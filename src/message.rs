//! Batch serialization.
//!
//! A payload is a JSON-style array of per-event fragments, each produced by
//! the active [`Target`].

use crate::{
    access_event::AccessEvent, config::Configuration, json_builder::JsonBuilder, target::Target,
};

/// Serialize `batch` into one request body.
pub fn build_payload(batch: &[AccessEvent], target: &dyn Target, config: &Configuration) -> String {
    let mut json = JsonBuilder::new();
    json.start_array(None);
    for event in batch {
        json.append_raw(&target.format_event(event, config));
    }
    json.end_array();
    json.finish()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::*;
    use crate::access_event::{RequestSnapshot, ResponseSnapshot};
    use crate::config::ConfigBuilder;
    use crate::test_utils::UriTarget;

    fn event(uri: &str) -> AccessEvent {
        AccessEvent::from_snapshots(
            &RequestSnapshot {
                uri: uri.into(),
                ..RequestSnapshot::default()
            },
            &ResponseSnapshot::default(),
            Duration::ZERO,
        )
    }

    fn config() -> Configuration {
        ConfigBuilder::new()
            .with_url("http://localhost/collector")
            .with_token("t")
            .build()
            .expect("valid configuration")
    }

    #[rstest]
    fn single_event_is_wrapped_in_brackets() {
        let payload = build_payload(&[event("/a")], &UriTarget::new(25), &config());
        assert_eq!(payload, r#"["/a"]"#);
    }

    #[rstest]
    fn fragments_are_joined_with_commas_in_order() {
        let batch = [event("/a"), event("/b"), event("/c")];
        let payload = build_payload(&batch, &UriTarget::new(25), &config());
        assert_eq!(payload, r#"["/a","/b","/c"]"#);
    }

    #[rstest]
    fn empty_batch_yields_empty_array() {
        assert_eq!(build_payload(&[], &UriTarget::new(25), &config()), "[]");
    }
}
