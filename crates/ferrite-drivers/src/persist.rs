//! Descriptor persistence
//!
//! A persisted driver is its original JSON description wrapped with a
//! backend tag, stored under `driver_<id>`. Load paths re-register through
//! the identical JSON register path used live, so a restored driver is
//! indistinguishable from a freshly declared one. The store interface has
//! no delete; unregistering leaves the stored record behind.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Store-key prefix shared by both backends
pub const DRIVER_KEY_PREFIX: &str = "driver_";

/// Which backend a stored description belongs to. The two id spaces are
/// separate; the tag keeps a bytecode driver from being resurrected
/// through the bridge path or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Bytecode,
    Bridge,
}

/// Wire form of a persisted descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDriver {
    pub backend: BackendKind,
    pub description: Json,
}

/// Store key for a driver id
pub fn driver_key(id: &str) -> String {
    format!("{}{}", DRIVER_KEY_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_prefix() {
        assert_eq!(driver_key("led0"), "driver_led0");
        assert!(driver_key("x").starts_with(DRIVER_KEY_PREFIX));
    }

    #[test]
    fn test_stored_driver_wire_form() {
        let stored = StoredDriver {
            backend: BackendKind::Bytecode,
            description: json!({"id": "a"}),
        };
        let bytes = serde_json::to_vec(&stored).unwrap();
        let back: StoredDriver = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back.backend, BackendKind::Bytecode);
        assert_eq!(back.description, json!({"id": "a"}));
    }
}
