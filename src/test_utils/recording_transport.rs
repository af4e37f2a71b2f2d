//! In-memory [`Transport`] that records every call.

use std::{
    collections::VecDeque,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::transport::Transport;

/// One call made to a [`RecordingTransport`].
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub payload: String,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct State {
    script: VecDeque<bool>,
    fallback: bool,
    calls: Vec<RecordedCall>,
}

/// Transport returning scripted results and keeping every payload.
///
/// Clones share state, so a test keeps one handle while the sender owns the
/// other. Once the script is exhausted every call returns the fallback.
#[derive(Clone, Debug)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
    latency: Duration,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    /// Transport that accepts everything.
    pub fn new() -> Self {
        Self::scripted(Vec::new(), true)
    }

    /// Transport that rejects everything.
    pub fn failing() -> Self {
        Self::scripted(Vec::new(), false)
    }

    /// Transport answering with `script` in order, then `fallback`.
    pub fn scripted(script: Vec<bool>, fallback: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                script: script.into(),
                fallback,
                calls: Vec::new(),
            })),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency` to simulate a slow endpoint.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .map(|call| call.payload.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Poll until at least `count` calls were made or `timeout` passes.
    pub fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.call_count() >= count {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        self.call_count() >= count
    }
}

impl Transport for RecordingTransport {
    fn send(&self, payload: &[u8]) -> bool {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            payload: String::from_utf8_lossy(payload).into_owned(),
            at: Instant::now(),
        });
        let fallback = state.fallback;
        state.script.pop_front().unwrap_or(fallback)
    }
}
