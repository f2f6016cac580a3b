//! Control signal trait and run state

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Externally controlled run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Items are submitted
    #[default]
    Running,
    /// Workers hold before their next attempt until resumed or stopped
    Paused,
    /// Terminal for the current run
    Stopped,
}

impl RunState {
    /// Lowercase wire name, as written in the control file
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" => Ok(RunState::Running),
            "paused" => Ok(RunState::Paused),
            "stopped" => Ok(RunState::Stopped),
            other => Err(format!("Unknown run state: {}", other)),
        }
    }
}

/// Read side of the run-state store
///
/// Implementations must fail open: a store that cannot be read reports
/// [`RunState::Running`], so a transient read glitch never halts a batch.
#[async_trait]
pub trait ControlSignal: Send + Sync {
    /// Latest externally written state. Never waits on the writer.
    async fn poll(&self) -> RunState;

    /// Re-check cadence used while paused
    fn poll_interval(&self) -> Duration;

    /// Wait out a pause
    ///
    /// Returns `true` once the state is Running and `false` once it is
    /// Stopped, re-checking every [`ControlSignal::poll_interval`].
    async fn await_resume_or_stop(&self) -> bool {
        loop {
            match self.poll().await {
                RunState::Running => return true,
                RunState::Stopped => return false,
                RunState::Paused => tokio::time::sleep(self.poll_interval()).await,
            }
        }
    }
}
