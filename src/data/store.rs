//! File-backed time series of player count samples.
//!
//! The whole log lives in memory and is rewritten to a single JSON file
//! on every save:
//!
//! ```json
//! {"hourly": [{"timestamp": "2024-05-01T18:00:00Z", "players": 42}]}
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use playerwatch_types::Sample;

/// Errors from persisting the series log.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Write error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk layout of the stats file.
#[derive(Debug, Deserialize)]
struct StatsFile {
    hourly: Vec<Sample>,
}

/// An append-only, time-pruned log of samples backed by a JSON file.
///
/// Appends only touch memory; [`save`](Self::save) writes the full log.
/// Insertion order is chronological order, so queries never sort.
#[derive(Debug)]
pub struct TimeSeriesStore {
    path: PathBuf,
    samples: Vec<Sample>,
    /// Reason the last load fell back to an empty log, if it did
    load_error: Option<String>,
}

impl TimeSeriesStore {
    /// Load the log from `path`.
    ///
    /// A missing or malformed file yields an empty log; this never fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let (samples, load_error) = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<StatsFile>(&content) {
                Ok(file) => {
                    info!(path = %path.display(), samples = file.hourly.len(), "Loaded stats file");
                    (file.hourly, None)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Stats file is malformed, starting empty");
                    (Vec::new(), Some(format!("Parse error: {}", e)))
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No stats file yet, starting empty");
                (Vec::new(), None)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Stats file is unreadable, starting empty");
                (Vec::new(), Some(format!("Read error: {}", e)))
            }
        };

        Self {
            path,
            samples,
            load_error,
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the last load discarded the file contents, if it did.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// All samples in chronological order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Add a sample to the in-memory log. Does not persist.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Values of every sample no older than `window`, oldest first.
    pub fn windowed(&self, window: TimeDelta) -> Vec<u64> {
        self.windowed_at(window, Utc::now())
    }

    /// Like [`windowed`](Self::windowed) with an explicit clock.
    pub fn windowed_at(&self, window: TimeDelta, now: DateTime<Utc>) -> Vec<u64> {
        self.samples
            .iter()
            .filter(|s| s.age_at(now) <= window)
            .map(|s| s.value)
            .collect()
    }

    /// Remove every sample older than `max_age`. Returns how many were removed.
    pub fn prune(&mut self, max_age: TimeDelta) -> usize {
        self.prune_at(max_age, Utc::now())
    }

    /// Like [`prune`](Self::prune) with an explicit clock.
    pub fn prune_at(&mut self, max_age: TimeDelta, now: DateTime<Utc>) -> usize {
        let before = self.samples.len();
        self.samples.retain(|s| s.age_at(now) <= max_age);
        let removed = before - self.samples.len();
        if removed > 0 {
            debug!(removed, remaining = self.samples.len(), "Pruned old samples");
        }
        removed
    }

    /// Write the full log to the backing file, replacing its contents.
    ///
    /// The data is written to a sibling temp file first and renamed over
    /// the target, so an interrupted write leaves the previous file intact.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&StatsFileRef {
            hourly: &self.samples,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), samples = self.samples.len(), "Saved stats file");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Borrowing twin of [`StatsFile`] so saving doesn't clone the log.
#[derive(Serialize)]
struct StatsFileRef<'a> {
    hourly: &'a [Sample],
}
