//! File-based counter storage for rategate.
//!
//! All four counters live in one JSON document (default
//! `~/.rategate/state.json`). Atomic writes are achieved via temp file +
//! rename, so a crash mid-write leaves the previous document intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::config::state_path;
use crate::core::ReviewState;
use crate::error::{RateGateError, Result};
use crate::storage::CounterStore;

/// File-based counter store.
#[derive(Debug)]
pub struct FileCounterStore {
    /// Path of the JSON state document.
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileCounterStore {
    /// Create a store at the default location.
    ///
    /// Uses `~/.rategate/state.json` or `$RATEGATE_HOME/state.json`.
    pub fn new() -> Result<Self> {
        let path = state_path().ok_or_else(|| {
            RateGateError::config("Could not determine state path (no home directory)")
        })?;
        Self::with_path(path)
    }

    /// Create a store backed by a specific file.
    ///
    /// The parent directory is created if needed; the file itself is only
    /// written on the first mutation.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| RateGateError::storage(parent, e))?;
            }
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path for the temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Load the document. A missing file is the empty state.
    fn load(&self) -> Result<ReviewState> {
        if !self.path.exists() {
            return Ok(ReviewState::default());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| RateGateError::storage(&self.path, e))?;
        let state: ReviewState = serde_json::from_str(&content)?;
        Ok(state)
    }

    /// Write the document atomically using temp file + rename.
    ///
    /// The temp file is removed if any step fails.
    fn atomic_write(&self, state: &ReviewState) -> Result<()> {
        let temp_path = self.temp_path();
        let json = serde_json::to_string_pretty(state)?;

        let written = Self::write_synced(&temp_path, json.as_bytes()).and_then(|()| {
            fs::rename(&temp_path, &self.path).map_err(|e| RateGateError::storage(&self.path, e))
        });

        if written.is_err() && temp_path.exists() {
            if let Err(e) = fs::remove_file(&temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to remove temp state file"
                );
            }
        }

        written
    }

    /// Create `path`, write `bytes`, and flush them to disk.
    fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = fs::File::create(path).map_err(|e| RateGateError::storage(path, e))?;
        file.write_all(bytes)
            .map_err(|e| RateGateError::storage(path, e))?;
        file.sync_all().map_err(|e| RateGateError::storage(path, e))
    }

    /// Load, apply `change`, and write back under the process-local lock.
    fn update(&self, change: impl FnOnce(&mut ReviewState)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RateGateError::invalid_state("file store lock poisoned"))?;

        let mut state = self.load()?;
        change(&mut state);
        self.atomic_write(&state)
    }
}

impl CounterStore for FileCounterStore {
    fn first_launch_date(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.load()?.first_launch_date)
    }

    fn set_first_launch_date(&self, date: Option<DateTime<Utc>>) -> Result<()> {
        self.update(|state| state.first_launch_date = date)
    }

    fn happiness_index(&self) -> Result<i64> {
        Ok(self.load()?.happiness_index)
    }

    fn set_happiness_index(&self, value: i64) -> Result<()> {
        self.update(|state| state.happiness_index = value)
    }

    fn dates_asked_for_review(&self) -> Result<Vec<DateTime<Utc>>> {
        Ok(self.load()?.dates_asked_for_review)
    }

    fn set_dates_asked_for_review(&self, dates: &[DateTime<Utc>]) -> Result<()> {
        self.update(|state| state.dates_asked_for_review = dates.to_vec())
    }

    fn last_asked_version(&self) -> Result<Option<String>> {
        Ok(self.load()?.last_asked_version)
    }

    fn set_last_asked_version(&self, version: Option<&str>) -> Result<()> {
        self.update(|state| state.last_asked_version = version.map(str::to_string))
    }

    fn clear(&self) -> Result<()> {
        self.update(|state| *state = ReviewState::default())
    }

    fn snapshot(&self) -> Result<ReviewState> {
        self.load()
    }
}
