//! Host collaborator interfaces
//!
//! The driver virtualization subsystem talks to the rest of the firmware
//! through a handful of narrow surfaces: the driver manager it installs
//! trampolines into, a flattened-path JSON reader, a persistent key-value
//! store, the tool registry it exposes JSON operations through, and an
//! external script engine consumed by the third (non-bytecode) backend.
//! This crate renders those surfaces as traits plus the reference
//! implementations the tests and the CLI run against.

pub mod category;
pub mod error;
pub mod json;
pub mod manager;
pub mod script;
pub mod store;
pub mod tools;

pub use category::DriverCategory;
pub use error::HostError;
pub use manager::{DriverInfo, DriverManager, DriverOps, InMemoryDriverManager};
pub use script::ScriptEngine;
pub use store::{FsStore, KvStore, MemoryStore};
pub use tools::{InMemoryToolRegistry, Tool, ToolRegistry};
