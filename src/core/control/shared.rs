//! In-process control signal

use super::signal::{ControlSignal, RunState};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Control signal held in memory and written by its owner
///
/// Clones share the same state, so an embedding application keeps one clone
/// to drive pause/stop and hands another to the engine.
#[derive(Debug, Clone)]
pub struct SharedControlSignal {
    state: Arc<RwLock<RunState>>,
    interval: Duration,
}

impl SharedControlSignal {
    pub fn new(initial: RunState, interval: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            interval,
        }
    }

    /// Replace the current state
    pub fn set(&self, state: RunState) {
        *self.state.write() = state;
    }

    pub fn pause(&self) {
        self.set(RunState::Paused);
    }

    pub fn resume(&self) {
        self.set(RunState::Running);
    }

    pub fn stop(&self) {
        self.set(RunState::Stopped);
    }
}

impl Default for SharedControlSignal {
    fn default() -> Self {
        Self::new(RunState::Running, Duration::from_secs(1))
    }
}

#[async_trait]
impl ControlSignal for SharedControlSignal {
    async fn poll(&self) -> RunState {
        *self.state.read()
    }

    fn poll_interval(&self) -> Duration {
        self.interval
    }
}
