//! The external driver manager surface
//!
//! The manager exposes one set of lifecycle operations per registered id,
//! and those operations carry **no per-call instance parameter**, the
//! firmware contract this subsystem must live with. Whoever implements
//! [`DriverOps`] has to recover the acting instance some other way; the
//! adapter trampolines do it through the current execution context.

use crate::category::DriverCategory;
use crate::error::HostError;
use parking_lot::Mutex;
use std::sync::Arc;

/// The six lifecycle operations. Buffer-and-length shapes mirror the
/// firmware interface: `read` fills the caller's buffer up to `max_size`
/// and returns a byte count, `get_status` fills a text buffer, and every
/// operation returns a status code (negative on error).
pub trait DriverOps: Send + Sync {
    fn init(&self) -> i32;
    fn deinit(&self) -> i32;
    fn read(&self, buf: &mut Vec<u8>, max_size: usize) -> i32;
    fn write(&self, data: &[u8]) -> i32;
    fn control(&self, command: i32, arg: Option<&str>) -> i32;
    fn get_status(&self, buf: &mut String, max_size: usize) -> i32;
}

/// Per-driver record the manager keeps
#[derive(Clone)]
pub struct DriverInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub category: DriverCategory,
    pub config_schema: Option<serde_json::Value>,
    pub initialized: bool,
    pub ops: Arc<dyn DriverOps>,
}

/// Manager surface consumed by the adapters; the subsystem's only path to
/// visibility elsewhere in the firmware.
pub trait DriverManager: Send + Sync {
    fn register(&self, info: DriverInfo) -> Result<(), HostError>;
    fn unregister(&self, id: &str) -> Result<(), HostError>;
    fn find(&self, id: &str) -> Option<DriverInfo>;
}

/// Reference manager used by tests and the CLI. Registration order is
/// preserved; `ids` reports it.
#[derive(Default)]
pub struct InMemoryDriverManager {
    entries: Mutex<Vec<DriverInfo>>,
}

impl InMemoryDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DriverManager for InMemoryDriverManager {
    fn register(&self, info: DriverInfo) -> Result<(), HostError> {
        let mut entries = self.entries.lock();
        if entries.iter().any(|e| e.id == info.id) {
            return Err(HostError::DuplicateDriver(info.id));
        }
        entries.push(info);
        Ok(())
    }

    fn unregister(&self, id: &str) -> Result<(), HostError> {
        let mut entries = self.entries.lock();
        match entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                entries.remove(pos);
                Ok(())
            }
            None => Err(HostError::DriverNotFound(id.to_string())),
        }
    }

    fn find(&self, id: &str) -> Option<DriverInfo> {
        self.entries.lock().iter().find(|e| e.id == id).cloned()
    }
}
