use super::files;
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

/// Fixed key the serialized task list is stored under
pub const TASKS_KEY: &str = "tasks-v1";

/// Key-value storage for serialized blobs
pub trait StorageBackend {
    /// Return the blob stored under `key`, or None if absent
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `blob` under `key`, replacing any previous value
    fn store(&mut self, key: &str, blob: &str) -> Result<()>;
}

/// Stores each key as a JSON file inside a data directory
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open storage in the default data directory, creating it if needed
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(files::ensure_data_dir()?))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        files::read_file(self.path_for(key))
    }

    fn store(&mut self, key: &str, blob: &str) -> Result<()> {
        files::atomic_write(self.path_for(key), blob)
    }
}

/// In-memory backend, used as a test double
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    /// When set, every store() fails without touching the entries
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, blob: &str) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("writes disabled");
        }
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
