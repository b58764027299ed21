//! External script engine surface
//!
//! A third driver backend mirrors the bytecode adapter with the VM replaced
//! by an external script engine. That backend lives outside this subsystem;
//! only the engine surface it consumes is declared here.

use crate::error::HostError;
use std::sync::Arc;

pub type NativeScriptFn =
    Arc<dyn Fn(&serde_json::Value) -> serde_json::Value + Send + Sync>;

pub trait ScriptEngine: Send + Sync {
    fn init(&self) -> Result<(), HostError>;
    fn eval(&self, source: &str) -> Result<serde_json::Value, HostError>;
    fn call_function(
        &self,
        module: &str,
        name: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, HostError>;
    fn register_native_function(
        &self,
        module: &str,
        name: &str,
        func: NativeScriptFn,
    ) -> Result<(), HostError>;
    fn create_module(&self, name: &str) -> Result<(), HostError>;
    fn delete_module(&self, name: &str) -> Result<(), HostError>;
}
