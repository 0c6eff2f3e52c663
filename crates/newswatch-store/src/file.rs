//! Flat-file state records.
//!
//! Each record is its own file inside the state directory. Writes go to a
//! uniquely named temp file next to the target and are renamed over it, so a
//! reader sees either the previous value or the new one, never a torn write.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions, TryLockError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use newswatch_core::{default_filter_keywords, normalize_keyword, StateStore, StoreError};
use uuid::Uuid;

/// Scalar record holding the last-seen article id.
pub const LAST_SEEN_FILE: &str = "last_id.txt";

/// JSON array of lowercase filter keywords.
pub const FILTER_KEYWORDS_FILE: &str = "filter_key.json";

/// Lock file held for the duration of a poll cycle.
pub const POLL_LOCK_FILE: &str = ".poll.lock";

/// Exclusive advisory lock on a state directory's poll cycle.
///
/// Released when dropped, or by the OS if the holding process dies.
#[derive(Debug)]
pub struct PollLock {
    _file: File,
}

#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Opens (and creates if needed) a state directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Takes the poll lock for this state directory without waiting.
    ///
    /// Returns `None` when another handle, in this process or another one,
    /// already holds it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the lock file cannot be opened or locked.
    pub fn try_lock_poll(&self) -> Result<Option<PollLock>, StoreError> {
        let path = self.record_path(POLL_LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| io_error(&path, e))?;

        match file.try_lock() {
            Ok(()) => Ok(Some(PollLock { _file: file })),
            Err(TryLockError::WouldBlock) => {
                tracing::debug!(path = %path.display(), "poll lock held elsewhere");
                Ok(None)
            }
            Err(TryLockError::Error(e)) => Err(io_error(&path, e)),
        }
    }

    fn record_path(&self, record: &str) -> PathBuf {
        self.dir.join(record)
    }

    /// Reads a record, mapping "file does not exist" to `None`.
    fn read_record(&self, record: &str) -> Result<Option<String>, StoreError> {
        let path = self.record_path(record);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn write_record(&self, record: &str, payload: &[u8]) -> Result<(), StoreError> {
        let path = self.record_path(record);
        let temp_path = self
            .dir
            .join(format!(".{record}.{}.tmp", Uuid::new_v4().simple()));

        std::fs::write(&temp_path, payload).map_err(|e| io_error(&temp_path, e))?;

        if let Err(e) = std::fs::rename(&temp_path, &path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(io_error(&path, e));
        }

        tracing::debug!(record, path = %path.display(), "state record written");
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn read_last_seen_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .read_record(LAST_SEEN_FILE)?
            .map(|raw| raw.trim().to_string())
            .filter(|id| !id.is_empty()))
    }

    fn write_last_seen_id(&self, id: &str) -> Result<(), StoreError> {
        self.write_record(LAST_SEEN_FILE, id.as_bytes())
    }

    fn clear_last_seen_id(&self) -> Result<(), StoreError> {
        let path = self.record_path(LAST_SEEN_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn read_filter_keywords(&self) -> Result<BTreeSet<String>, StoreError> {
        let Some(raw) = self.read_record(FILTER_KEYWORDS_FILE)? else {
            let seed = default_filter_keywords();
            self.write_filter_keywords(&seed)?;
            tracing::info!(keywords = ?seed, "seeded default filter keywords");
            return Ok(seed);
        };

        let words: Vec<String> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                path: self.record_path(FILTER_KEYWORDS_FILE).display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(words
            .iter()
            .map(|w| normalize_keyword(w))
            .filter(|w| !w.is_empty())
            .collect())
    }

    fn write_filter_keywords(&self, keywords: &BTreeSet<String>) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(keywords).map_err(|e| StoreError::Encode {
            record: FILTER_KEYWORDS_FILE.to_string(),
            reason: e.to_string(),
        })?;
        self.write_record(FILTER_KEYWORDS_FILE, &payload)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
