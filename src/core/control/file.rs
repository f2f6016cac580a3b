//! Control signal backed by a JSON file
//!
//! The file holds `{"state": "running" | "paused" | "stopped"}`. Missing,
//! unreadable or malformed files read as Running.

use super::signal::{ControlSignal, RunState};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// On-disk shape of the control file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFile {
    /// Raw state string; unknown values are treated as running
    #[serde(default)]
    pub state: Option<String>,
}

impl ControlFile {
    /// Write `state` to `path`, replacing any previous content
    ///
    /// This is the operator side of the protocol; the engine itself only reads.
    /// The body goes to a sibling file that is then renamed over `path`, so a
    /// concurrent reader sees either the old state or the new one.
    pub fn write(path: &Path, state: RunState) -> Result<()> {
        let body = serde_json::to_string_pretty(&ControlFile {
            state: Some(state.as_str().to_string()),
        })?;
        let staging = staging_path(path);
        std::fs::write(&staging, body)?;
        if let Err(e) = std::fs::rename(&staging, path) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "control.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Control signal that re-reads a JSON file on every poll
#[derive(Debug, Clone)]
pub struct FileControlSignal {
    path: PathBuf,
    interval: Duration,
}

impl FileControlSignal {
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_state(&self) -> std::result::Result<RunState, ReadFailure> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(ReadFailure::Unavailable)?;
        let file: ControlFile =
            serde_json::from_str(&raw).map_err(|e| ReadFailure::Malformed(e.to_string()))?;
        match file.state {
            Some(state) => state.parse().map_err(ReadFailure::Malformed),
            None => Ok(RunState::Running),
        }
    }
}

enum ReadFailure {
    Unavailable(std::io::Error),
    Malformed(String),
}

#[async_trait]
impl ControlSignal for FileControlSignal {
    async fn poll(&self) -> RunState {
        match self.read_state().await {
            Ok(state) => state,
            Err(ReadFailure::Unavailable(e)) => {
                debug!(
                    "Control file {:?} unavailable, assuming running: {}",
                    self.path, e
                );
                RunState::Running
            }
            Err(ReadFailure::Malformed(reason)) => {
                warn!(
                    "Ignoring malformed control file {:?}, assuming running: {}",
                    self.path, reason
                );
                RunState::Running
            }
        }
    }

    fn poll_interval(&self) -> Duration {
        self.interval
    }
}
