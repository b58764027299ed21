//! Persistent key-value store surface
//!
//! Descriptors persist under `driver_<id>` keys; the store interface is
//! write/read/enumerate with no delete, matching the firmware store.

use crate::error::HostError;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub trait KvStore: Send + Sync {
    fn write(&self, key: &str, data: &[u8]) -> Result<(), HostError>;
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, HostError>;
    /// Keys beginning with `prefix`, in stable (sorted) order
    fn keys(&self, prefix: &str) -> Result<Vec<String>, HostError>;
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn write(&self, key: &str, data: &[u8]) -> Result<(), HostError> {
        self.map.lock().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, HostError> {
        Ok(self.map.lock().get(key).cloned())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, HostError> {
        Ok(self
            .map
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Directory-backed store: one file per key under `root`
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, HostError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Keys map to file names, so they must be single path components.
    /// Dots are fine (driver ids like `sensor.v2` persist); separators and
    /// the `.`/`..` components are not.
    fn path_for(&self, key: &str) -> Result<PathBuf, HostError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.chars().all(|c| c == '.') {
            return Err(HostError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl KvStore for FsStore {
    fn write(&self, key: &str, data: &[u8]) -> Result<(), HostError> {
        std::fs::write(self.path_for(key)?, data)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, HostError> {
        match std::fs::read(self.path_for(key)?) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, HostError> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
