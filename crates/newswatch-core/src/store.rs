//! Persisted state contract.
//!
//! Two independent records live behind [`StateStore`]: the last-seen article
//! id and the filter keyword set. Each write must be atomic with respect to
//! concurrent reads of the same record; no cross-record transaction exists.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::StoreError;

/// Keywords persisted on the first read when no filter record exists.
pub const DEFAULT_FILTER_KEYWORDS: [&str; 2] = ["listing", "token"];

/// Returns [`DEFAULT_FILTER_KEYWORDS`] as an owned set.
#[must_use]
pub fn default_filter_keywords() -> BTreeSet<String> {
    DEFAULT_FILTER_KEYWORDS
        .iter()
        .map(|k| (*k).to_string())
        .collect()
}

pub trait StateStore: Send + Sync {
    /// Returns the stored last-seen id, or `None` if never set or cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be read.
    fn read_last_seen_id(&self) -> Result<Option<String>, StoreError>;

    /// Overwrites the last-seen id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be written.
    fn write_last_seen_id(&self, id: &str) -> Result<(), StoreError>;

    /// Removes the last-seen id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no marker exists, or another
    /// [`StoreError`] if removal fails.
    fn clear_last_seen_id(&self) -> Result<(), StoreError>;

    /// Returns the filter keywords, persisting the default seed first when
    /// no record exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be read, decoded, or seeded.
    fn read_filter_keywords(&self) -> Result<BTreeSet<String>, StoreError>;

    /// Replaces the filter keywords wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be written.
    fn write_filter_keywords(&self, keywords: &BTreeSet<String>) -> Result<(), StoreError>;
}

impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn read_last_seen_id(&self) -> Result<Option<String>, StoreError> {
        (**self).read_last_seen_id()
    }

    fn write_last_seen_id(&self, id: &str) -> Result<(), StoreError> {
        (**self).write_last_seen_id(id)
    }

    fn clear_last_seen_id(&self) -> Result<(), StoreError> {
        (**self).clear_last_seen_id()
    }

    fn read_filter_keywords(&self) -> Result<BTreeSet<String>, StoreError> {
        (**self).read_filter_keywords()
    }

    fn write_filter_keywords(&self, keywords: &BTreeSet<String>) -> Result<(), StoreError> {
        (**self).write_filter_keywords(keywords)
    }
}
