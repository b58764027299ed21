//! Ferrite driver adapters
//!
//! Two parallel backends satisfy the same six-operation driver interface
//! with code unknown at build time:
//!
//! - the **bytecode backend** registers JSON-declared drivers whose
//!   lifecycle operations are small programs run through `ferrite-vm`;
//! - the **native bridge backend** registers drivers whose operations are
//!   pre-existing compiled functions, selected per call through a typed
//!   per-driver mapping table and per-device-family JSON translation.
//!
//! Both install generic trampolines into the external driver manager. The
//! manager's operations carry no instance parameter, so a trampoline
//! recovers the acting driver by reading `driver_id` from the current
//! execution context and otherwise falls back to the backend's
//! first-registered descriptor. With a single live driver that fallback is
//! correct by coincidence; with several it silently targets the wrong one
//! unless callers set `driver_id`. The fallback is deliberate and pinned
//! by tests; see the `resolve` functions and DESIGN.md before touching it.

pub mod bridge;
pub mod bytecode;
pub mod descriptor;
pub mod error;
pub mod persist;
pub mod tools;

pub(crate) mod util;

pub use bridge::{BridgeAdapter, BridgeBinder, BridgeDescriptor};
pub use bytecode::{BytecodeAdapter, BytecodeDescriptor};
pub use descriptor::DriverMeta;
pub use error::AdapterError;
pub use persist::{driver_key, BackendKind, StoredDriver, DRIVER_KEY_PREFIX};
pub use tools::register_driver_tools;

/// Variable the trampolines consult to learn which driver a call targets
pub const DRIVER_ID_VAR: &str = "driver_id";

/// Default registry capacity
pub const DEFAULT_CAPACITY: usize = 16;
