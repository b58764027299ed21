//! Native-bridge driver adapter
//!
//! Drivers whose lifecycle operations are pre-existing compiled functions.
//! A descriptor carries a growable list of (operation name, native
//! function, role) mappings, pre-populated by the per-family helpers in
//! [`families`] or one at a time through [`BridgeAdapter::add_mapping`].
//! The trampolines translate JSON payloads into the strongly-typed calls
//! of the two known families and fall through to generic buffer calls for
//! everything else.

pub mod families;
pub mod native;

mod trampoline;

use crate::descriptor::DriverMeta;
use crate::error::AdapterError;
use crate::persist::{driver_key, BackendKind, StoredDriver, DRIVER_KEY_PREFIX};
use crate::DEFAULT_CAPACITY;
use ferrite_host::{json, DriverInfo, DriverManager, KvStore};
use parking_lot::Mutex;
use std::sync::Arc;

pub use families::{DeviceFamily, LedHal, LedKind, TempSensorHal};
pub use native::{Mapping, NativeOp, OpRole};

use trampoline::BridgeOps;

/// Registry entry: metadata, family tag, and the mapping table. The table
/// stays growable after registration.
pub struct BridgeDescriptor {
    pub meta: DriverMeta,
    pub family: DeviceFamily,
    mappings: Mutex<Vec<Mapping>>,
}

impl BridgeDescriptor {
    pub(crate) fn mapping(&self, name: &str) -> Option<Mapping> {
        self.mappings.lock().iter().find(|m| m.name == name).cloned()
    }

    /// First mapping registered for a role
    pub(crate) fn mapping_for_role(&self, role: OpRole) -> Option<Mapping> {
        self.mappings.lock().iter().find(|m| m.role == role).cloned()
    }

    pub(crate) fn mappings_snapshot(&self) -> Vec<Mapping> {
        self.mappings.lock().clone()
    }

    pub fn mapping_names(&self) -> Vec<String> {
        self.mappings.lock().iter().map(|m| m.name.clone()).collect()
    }
}

pub(crate) struct Inner {
    manager: Arc<dyn DriverManager>,
    store: Option<Arc<dyn KvStore>>,
    pub(crate) drivers: Mutex<Vec<Arc<BridgeDescriptor>>>,
}

impl Inner {
    /// Same resolution rule as the bytecode backend: the current context's
    /// `driver_id` when set, else the first-registered descriptor.
    pub(crate) fn resolve(&self) -> Option<Arc<BridgeDescriptor>> {
        match crate::util::current_driver_id() {
            Some(id) => self.find(&id),
            None => self.drivers.lock().first().cloned(),
        }
    }

    pub(crate) fn find(&self, id: &str) -> Option<Arc<BridgeDescriptor>> {
        self.drivers.lock().iter().find(|d| d.meta.id == id).cloned()
    }
}

/// Re-binds persisted bridge drivers to their native function tables at
/// load time; function pointers cannot be serialized.
pub trait BridgeBinder {
    fn bind_led(&self, id: &str, kind: LedKind) -> Option<LedHal>;
    fn bind_temp_sensor(&self, id: &str) -> Option<TempSensorHal>;
}

/// Adapter front for the bridge backend
pub struct BridgeAdapter {
    inner: Arc<Inner>,
}

impl BridgeAdapter {
    pub fn new(manager: Arc<dyn DriverManager>, store: Option<Arc<dyn KvStore>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                manager,
                store,
                drivers: Mutex::new(Vec::with_capacity(DEFAULT_CAPACITY)),
            }),
        }
    }

    pub fn manager(&self) -> Arc<dyn DriverManager> {
        self.inner.manager.clone()
    }

    /// Register an LED driver of the given capability tier
    pub fn register_led(
        &self,
        meta: DriverMeta,
        kind: LedKind,
        hal: &LedHal,
    ) -> Result<(), AdapterError> {
        let mappings = families::led_mappings(kind, hal)?;
        self.register(meta, DeviceFamily::Led(kind), mappings)
    }

    /// Register a temperature sensor driver
    pub fn register_temp_sensor(
        &self,
        meta: DriverMeta,
        hal: &TempSensorHal,
    ) -> Result<(), AdapterError> {
        let mappings = families::temp_sensor_mappings(hal)?;
        self.register(meta, DeviceFamily::TemperatureSensor, mappings)
    }

    /// Register a driver outside the known families; mappings are added
    /// afterwards via [`add_mapping`](Self::add_mapping)
    pub fn register_custom(&self, meta: DriverMeta) -> Result<(), AdapterError> {
        self.register(meta, DeviceFamily::Custom, Vec::new())
    }

    /// Append one mapping to a registered driver's table
    pub fn add_mapping(&self, id: &str, mapping: Mapping) -> Result<(), AdapterError> {
        let desc = self
            .inner
            .find(id)
            .ok_or_else(|| AdapterError::NotFound(id.to_string()))?;
        desc.mappings.lock().push(mapping);
        Ok(())
    }

    fn register(
        &self,
        meta: DriverMeta,
        family: DeviceFamily,
        mappings: Vec<Mapping>,
    ) -> Result<(), AdapterError> {
        let descriptor = Arc::new(BridgeDescriptor {
            meta: meta.clone(),
            family,
            mappings: Mutex::new(mappings),
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
            ops: Arc::new(BridgeOps::new(Arc::downgrade(&self.inner))),
        };
        if let Err(e) = self.inner.manager.register(info) {
            self.inner.drivers.lock().retain(|d| d.meta.id != meta.id);
            return Err(AdapterError::Downstream(e.to_string()));
        }

        if meta.persistent {
            if let Some(store) = &self.inner.store {
                let mut description = meta.to_description();
                if let Some(obj) = description.as_object_mut() {
                    obj.insert(
                        "family".to_string(),
                        serde_json::to_value(family).unwrap_or_default(),
                    );
                }
                let stored = StoredDriver {
                    backend: BackendKind::Bridge,
                    description,
                };
                // Live registration stands even when the write fails
                if let Ok(bytes) = serde_json::to_vec(&stored) {
                    let _ = store.write(&driver_key(&meta.id), &bytes);
                }
            }
        }

        Ok(())
    }

    pub fn unregister(&self, id: &str) -> Result<(), AdapterError> {
        {
            let drivers = self.inner.drivers.lock();
            if !drivers.iter().any(|d| d.meta.id == id) {
                return Err(AdapterError::NotFound(id.to_string()));
            }
        }
        let _ = self.inner.manager.unregister(id);
        self.inner.drivers.lock().retain(|d| d.meta.id != id);
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<Arc<BridgeDescriptor>> {
        self.inner.find(id)
    }

    pub fn len(&self) -> usize {
        self.inner.drivers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.drivers.lock().is_empty()
    }

    pub fn list(&self) -> Vec<Arc<BridgeDescriptor>> {
        self.inner.drivers.lock().clone()
    }

    /// Re-register every stored bridge driver, re-binding native tables
    /// through `binder`. Entries the binder cannot bind are skipped.
    pub fn load_all(&self, binder: &dyn BridgeBinder) -> Result<usize, AdapterError> {
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
            if stored.backend != BackendKind::Bridge {
                continue;
            }
            let Ok(meta) = DriverMeta::from_description(&stored.description) else {
                continue;
            };
            let family = json::lookup(&stored.description, "family")
                .and_then(|v| serde_json::from_value::<DeviceFamily>(v.clone()).ok());
            let result = match family {
                Some(DeviceFamily::Led(kind)) => match binder.bind_led(&meta.id, kind) {
                    Some(hal) => self.register_led(meta, kind, &hal),
                    None => continue,
                },
                Some(DeviceFamily::TemperatureSensor) => {
                    match binder.bind_temp_sensor(&meta.id) {
                        Some(hal) => self.register_temp_sensor(meta, &hal),
                        None => continue,
                    }
                }
                Some(DeviceFamily::Custom) => self.register_custom(meta),
                None => continue,
            };
            if result.is_ok() {
                loaded += 1;
            }
        }
        Ok(loaded)
    }
}
