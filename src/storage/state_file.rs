//! Rate-limit state persistence
//!
//! The full tracker state is serialized to a single JSON file after each
//! mutation. The format round-trips losslessly across restarts: counters per
//! (provider, credential) plus the raw sliding-window timestamp lists keyed by
//! `req_min:<provider>:<credential>` / `req_day:<provider>:<credential>`.

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Serialized form of the tracker state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RateLimitSnapshot {
    /// Lifetime request counters per provider per credential
    #[serde(default)]
    pub request_counts: HashMap<String, HashMap<String, u64>>,
    /// Lifetime token counters per provider per credential (not enforced)
    #[serde(default)]
    pub token_counts: HashMap<String, HashMap<String, u64>>,
    /// Sliding windows of epoch-second timestamps, by composite window key
    #[serde(default)]
    pub rate_limit_windows: HashMap<String, Vec<f64>>,
}

/// JSON state file holding a [`RateLimitSnapshot`]
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Create a handle for the given path; nothing is touched on disk yet
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot from disk
    ///
    /// A missing file yields an empty snapshot. A file that fails to decode is
    /// discarded and replaced with an empty snapshot, so a corrupt state file
    /// never keeps the gateway from starting.
    pub async fn load(&self) -> Result<RateLimitSnapshot> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => Ok(snapshot),
                Err(e) => {
                    warn!(path = %self.path.display(), "Discarding corrupt state file: {}", e);
                    let snapshot = RateLimitSnapshot::default();
                    self.save(&snapshot).await?;
                    Ok(snapshot)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(RateLimitSnapshot::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the file with the given snapshot
    ///
    /// Writes to a sibling temp file and renames it into place so a crash
    /// mid-write leaves the previous snapshot intact.
    pub async fn save(&self, snapshot: &RateLimitSnapshot) -> Result<()> {
        let data = serde_json::to_vec(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
