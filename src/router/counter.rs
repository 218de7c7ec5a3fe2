//! Rotation Counter
//!
//! Round-robin selection over a candidate list, with the cursor persisted in
//! a [`CounterStore`] under a hash of the list itself.

use crate::config::ConfigurationRecord;
use crate::router::store::CounterStore;

/// Storage key for a candidate list: hex MD5 of its compact JSON form
///
/// Same records in the same order give the same key; reordering changes it.
pub fn storage_key(candidates: &[&ConfigurationRecord]) -> serde_json::Result<String> {
    let json = serde_json::to_vec(candidates)?;
    Ok(format!("{:x}", md5::compute(json)))
}

/// Round-robin cursor over a [`CounterStore`]
pub struct RotationCounter<'a> {
    store: &'a dyn CounterStore,
}

impl<'a> RotationCounter<'a> {
    pub fn new(store: &'a dyn CounterStore) -> Self {
        Self { store }
    }

    /// Pick the next candidate and advance the persisted cursor
    ///
    /// Unreadable counters count as zero and failed writes are logged; neither
    /// stops a selection. Returns `None` only for an empty list.
    pub fn next_index<'c>(
        &self,
        candidates: &[&'c ConfigurationRecord],
    ) -> Option<(usize, &'c ConfigurationRecord)> {
        let first = *candidates.first()?;

        let key = match storage_key(candidates) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to derive rotation key, using first candidate");
                return Some((0, first));
            }
        };

        let counter = match self.store.read(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(key = %key, "No rotation counter yet, starting at 0");
                0
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Unreadable rotation counter, treating as 0");
                0
            }
        };

        if let Err(e) = self.store.write(&key, counter.wrapping_add(1)) {
            tracing::warn!(key = %key, error = %e, "Failed to persist rotation counter");
        }

        let index = (counter % candidates.len() as u64) as usize;
        match candidates.get(index) {
            Some(record) => Some((index, *record)),
            None => Some((0, first)),
        }
    }
}
