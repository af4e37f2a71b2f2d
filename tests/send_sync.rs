//! Send/Sync guarantees for core types.

use httpaccesslog::{
    AccessEvent, AccessLogValve, CancelToken, ConfigBuilder, Configuration, EventQueue,
    HttpTransport, Properties, SplunkTarget,
};
use rstest::rstest;
use static_assertions::assert_impl_all;

#[rstest]
fn configuration_types_are_send_sync() {
    assert_impl_all!(ConfigBuilder: Send, Sync);
    assert_impl_all!(Configuration: Send, Sync);
    assert_impl_all!(Properties: Send, Sync);
    assert_impl_all!(SplunkTarget: Send, Sync);
}

#[rstest]
fn pipeline_types_are_send_sync() {
    assert_impl_all!(AccessEvent: Send, Sync);
    assert_impl_all!(EventQueue: Send, Sync);
    assert_impl_all!(CancelToken: Send, Sync);
    assert_impl_all!(AccessLogValve: Send, Sync);
}

#[rstest]
fn transport_is_send() {
    assert_impl_all!(HttpTransport: Send);
}
