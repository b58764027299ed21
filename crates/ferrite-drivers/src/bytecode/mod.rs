//! Bytecode-backed driver adapter
//!
//! A driver description names up to six lifecycle programs as JSON
//! instruction lists. `read` and `write` are mandatory; a missing `init`
//! or `deinit` is an automatic success, a missing `control` is "not
//! supported" and a missing `getStatus` yields a canned status. Programs
//! are assembled and validated at registration, so nothing unimplemented
//! or out-of-range ever reaches the interpreter.

mod trampoline;

use crate::descriptor::DriverMeta;
use crate::error::AdapterError;
use crate::persist::{driver_key, BackendKind, StoredDriver, DRIVER_KEY_PREFIX};
use crate::DEFAULT_CAPACITY;
use ferrite_host::{DriverInfo, DriverManager, KvStore};
use ferrite_vm::{asm, Program};
use parking_lot::Mutex;
use serde_json::Value as Json;
use std::sync::Arc;

use trampoline::BytecodeOps;

/// The six lifecycle programs of one driver
#[derive(Debug, Clone, Default)]
pub struct DriverPrograms {
    pub init: Option<Program>,
    pub deinit: Option<Program>,
    pub read: Option<Program>,
    pub write: Option<Program>,
    pub control: Option<Program>,
    pub get_status: Option<Program>,
}

impl DriverPrograms {
    /// Assemble and validate the `programs` object of a description.
    /// `read` and `write` must be present.
    fn from_description(description: &Json) -> Result<Self, AdapterError> {
        let block = description.get("programs");
        let assemble_op = |op: &str| -> Result<Option<Program>, AdapterError> {
            let Some(source) = block.and_then(|b| b.get(op)) else {
                return Ok(None);
            };
            let program = asm::assemble(source).map_err(|e| {
                AdapterError::InvalidDescription(format!("program `{}`: {}", op, e))
            })?;
            program.validate().map_err(|e| {
                AdapterError::InvalidDescription(format!("program `{}`: {}", op, e))
            })?;
            Ok(Some(program))
        };

        let programs = Self {
            init: assemble_op("init")?,
            deinit: assemble_op("deinit")?,
            read: assemble_op("read")?,
            write: assemble_op("write")?,
            control: assemble_op("control")?,
            get_status: assemble_op("getStatus")?,
        };
        if programs.read.is_none() {
            return Err(AdapterError::MissingMandatoryProgram("read"));
        }
        if programs.write.is_none() {
            return Err(AdapterError::MissingMandatoryProgram("write"));
        }
        Ok(programs)
    }
}

/// Registry entry: metadata plus the programs it exclusively owns
#[derive(Debug)]
pub struct BytecodeDescriptor {
    pub meta: DriverMeta,
    pub programs: DriverPrograms,
}

pub(crate) struct Inner {
    manager: Arc<dyn DriverManager>,
    store: Option<Arc<dyn KvStore>>,
    pub(crate) drivers: Mutex<Vec<Arc<BytecodeDescriptor>>>,
}

impl Inner {
    /// Descriptor for the acting driver: the current context's `driver_id`
    /// when it names one, otherwise the first-registered descriptor.
    pub(crate) fn resolve(&self) -> Option<Arc<BytecodeDescriptor>> {
        match crate::util::current_driver_id() {
            Some(id) => self.find(&id),
            None => self.drivers.lock().first().cloned(),
        }
    }

    pub(crate) fn find(&self, id: &str) -> Option<Arc<BytecodeDescriptor>> {
        self.drivers.lock().iter().find(|d| d.meta.id == id).cloned()
    }
}

/// Adapter front: owns the registry, installs trampolines into the driver
/// manager, persists descriptors on request
pub struct BytecodeAdapter {
    inner: Arc<Inner>,
}

impl BytecodeAdapter {
    pub fn new(manager: Arc<dyn DriverManager>, store: Option<Arc<dyn KvStore>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                manager,
                store,
                drivers: Mutex::new(Vec::with_capacity(DEFAULT_CAPACITY)),
            }),
        }
    }

    /// The driver manager this adapter installs into
    pub fn manager(&self) -> Arc<dyn DriverManager> {
        self.inner.manager.clone()
    }

    /// Register a driver from its JSON description. Any failure after a
    /// partial step rolls the step back; no driver is left half-registered.
    /// A persistence failure does not fail the live registration.
    pub fn register_json(&self, description: &Json) -> Result<(), AdapterError> {
        let meta = DriverMeta::from_description(description)?;
        let programs = DriverPrograms::from_description(description)?;

        let descriptor = Arc::new(BytecodeDescriptor {
            meta: meta.clone(),
            programs,
        });

        {
            let mut drivers = self.inner.drivers.lock();
            if drivers.iter().any(|d| d.meta.id == meta.id) {
                return Err(AdapterError::DuplicateId(meta.id));
            }
            drivers.push(descriptor);
        }

        let info = DriverInfo {
            id: meta.id.clone(),
            name: meta.name.clone(),
            version: meta.version.clone(),
            category: meta.category,
            config_schema: meta.config_schema.clone(),
            initialized: false,
            ops: Arc::new(BytecodeOps::new(Arc::downgrade(&self.inner))),
        };
        if let Err(e) = self.inner.manager.register(info) {
            // Roll back the registry insertion
            self.inner.drivers.lock().retain(|d| d.meta.id != meta.id);
            return Err(AdapterError::Downstream(e.to_string()));
        }

        if meta.persistent {
            if let Some(store) = &self.inner.store {
                let stored = StoredDriver {
                    backend: BackendKind::Bytecode,
                    description: description.clone(),
                };
                // Live registration stands even when the write fails
                if let Ok(bytes) = serde_json::to_vec(&stored) {
                    let _ = store.write(&driver_key(&meta.id), &bytes);
                }
            }
        }

        Ok(())
    }

    /// Remove a driver from the registry and the driver manager. The
    /// stored record, if any, stays (the store has no delete).
    pub fn unregister(&self, id: &str) -> Result<(), AdapterError> {
        {
            let drivers = self.inner.drivers.lock();
            if !drivers.iter().any(|d| d.meta.id == id) {
                return Err(AdapterError::NotFound(id.to_string()));
            }
        }
        // A manager miss here means the two registries drifted; removing
        // the local entry anyway restores agreement.
        let _ = self.inner.manager.unregister(id);
        self.inner.drivers.lock().retain(|d| d.meta.id != id);
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<Arc<BytecodeDescriptor>> {
        self.inner.find(id)
    }

    pub fn len(&self) -> usize {
        self.inner.drivers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.drivers.lock().is_empty()
    }

    /// Registered descriptors in registration order
    pub fn list(&self) -> Vec<Arc<BytecodeDescriptor>> {
        self.inner.drivers.lock().clone()
    }

    /// Re-register every stored bytecode driver through the identical JSON
    /// register path used live. Entries that fail to parse or register are
    /// skipped; returns how many loaded.
    pub fn load_all(&self) -> Result<usize, AdapterError> {
        let Some(store) = &self.inner.store else {
            return Ok(0);
        };
        let keys = store
            .keys(DRIVER_KEY_PREFIX)
            .map_err(|e| AdapterError::Store(e.to_string()))?;

        let mut loaded = 0;
        for key in keys {
            let Ok(Some(bytes)) = store.read(&key) else {
                continue;
            };
            let Ok(stored) = serde_json::from_slice::<StoredDriver>(&bytes) else {
                continue;
            };
            if stored.backend != BackendKind::Bytecode {
                continue;
            }
            if self.register_json(&stored.description).is_ok() {
                loaded += 1;
            }
        }
        Ok(loaded)
    }
}
