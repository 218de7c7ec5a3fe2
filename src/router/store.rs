//! Rotation Counter Storage
//!
//! Durable key/value storage for rotation counters.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Directory under the storage root holding one file per counter
pub const TOKEN_DIR: &str = "openai_token";

/// Storage for rotation counters keyed by candidate-list hash
///
/// Reads and writes are independent calls; there is no compare-and-swap.
pub trait CounterStore: Send + Sync {
    /// Read a counter, `Ok(None)` if it was never written
    fn read(&self, key: &str) -> io::Result<Option<u64>>;

    /// Overwrite a counter
    fn write(&self, key: &str, value: u64) -> io::Result<()>;
}

/// File-per-key store: `<root>/openai_token/<key>` holding a decimal counter
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    dir: PathBuf,
}

impl FileCounterStore {
    /// Create a store under the given storage root
    pub fn new(storage_root: impl AsRef<Path>) -> Self {
        Self {
            dir: storage_root.as_ref().join(TOKEN_DIR),
        }
    }

    /// Directory holding the counter files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl CounterStore for FileCounterStore {
    fn read(&self, key: &str) -> io::Result<Option<u64>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => content
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, value: u64) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value.to_string())
    }
}

/// In-process store; counters do not survive a restart
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: Mutex<HashMap<String, u64>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter
    pub fn get(&self, key: &str) -> Option<u64> {
        self.counters.lock().get(key).copied()
    }

    /// Number of counters held
    pub fn len(&self) -> usize {
        self.counters.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.lock().is_empty()
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self, key: &str) -> io::Result<Option<u64>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: u64) -> io::Result<()> {
        self.counters.lock().insert(key.to_string(), value);
        Ok(())
    }
}
