//! Helpers shared by unit and integration tests.
//!
//! Compiled for the crate's own tests and, through the `test-util` feature,
//! for the integration tests under `tests/`.

mod mock_server;
mod recording_transport;
mod uri_target;

pub use mock_server::{CapturedRequest, ScriptedResponse, header_value, spawn_scripted_server};
pub use recording_transport::{RecordedCall, RecordingTransport};
pub use uri_target::UriTarget;
