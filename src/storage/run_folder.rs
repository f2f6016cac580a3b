//! Run folder layout
//!
//! A run folder is prepared by whoever launches the upload. It holds
//! `meta.json`, the `control.json` the operator writes, and the result files
//! this tool produces.

use crate::core::control::{ControlFile, FileControlSignal, RunState};
use crate::utils::error::{Result, UploadError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Name of the run metadata file
pub const META_FILE: &str = "meta.json";
/// Name of the control file
pub const CONTROL_FILE: &str = "control.json";

/// Run metadata written by the launcher; unknown fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub env: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

impl RunMeta {
    /// Environment label for logs, upper-cased
    pub fn env_label(&self) -> String {
        self.env
            .as_deref()
            .filter(|env| !env.trim().is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    /// Run id from the metadata, or a fresh one when the launcher gave none
    pub fn run_id_or_new(&self) -> String {
        self.run_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

/// Paths inside one run folder
#[derive(Debug, Clone)]
pub struct RunFolder {
    root: PathBuf,
}

impl RunFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    pub fn control_path(&self) -> PathBuf {
        self.root.join(CONTROL_FILE)
    }

    /// Read `meta.json`; a run folder without it is not a run folder
    pub async fn load_meta(&self) -> Result<RunMeta> {
        let path = self.meta_path();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(UploadError::input(format!(
                    "{} not found in run folder {:?}",
                    META_FILE, self.root
                )));
            }
            Err(e) => {
                return Err(UploadError::input(format!(
                    "Failed to read {:?}: {}",
                    path, e
                )));
            }
        };

        let meta: RunMeta = serde_json::from_str(&content)
            .map_err(|e| UploadError::input(format!("Failed to parse {:?}: {}", path, e)))?;
        debug!("Loaded run metadata: {:?}", meta);
        Ok(meta)
    }

    /// Create `control.json` as running unless it already exists
    ///
    /// Returns `true` when the file was created. An existing file is left
    /// alone so a pause or stop written before the run starts is honored.
    pub fn ensure_control_file(&self) -> Result<bool> {
        let path = self.control_path();
        if path.exists() {
            debug!("Keeping existing control file {:?}", path);
            return Ok(false);
        }
        ControlFile::write(&path, RunState::Running)?;
        info!("Initialized control file {:?}", path);
        Ok(true)
    }

    /// Write a new state to `control.json`
    pub fn set_state(&self, state: RunState) -> Result<()> {
        if !self.root.is_dir() {
            return Err(UploadError::input(format!(
                "Run folder {:?} does not exist",
                self.root
            )));
        }
        ControlFile::write(&self.control_path(), state)
    }

    /// Control signal reading this folder's `control.json`
    pub fn control_signal(&self, interval: Duration) -> FileControlSignal {
        FileControlSignal::new(self.control_path(), interval)
    }

    /// `<stem>_upload_results.csv` for the given input file
    pub fn results_path(&self, input: &Path) -> PathBuf {
        self.root
            .join(format!("{}_upload_results.csv", input_stem(input)))
    }

    /// `<stem>_failed_uploads.csv` for the given input file
    pub fn failed_path(&self, input: &Path) -> PathBuf {
        self.root
            .join(format!("{}_failed_uploads.csv", input_stem(input)))
    }
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string())
}
