//! File-backed implementation of [`newswatch_core::StateStore`].

mod file;

pub use file::{FileStateStore, PollLock, FILTER_KEYWORDS_FILE, LAST_SEEN_FILE, POLL_LOCK_FILE};
