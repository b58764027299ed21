//! Generic trampolines for the bytecode backend
//!
//! One `BytecodeOps` instance serves every driver the backend registers:
//! the driver-manager contract gives the operations no instance parameter,
//! so each call re-resolves the acting descriptor through the current
//! execution context (falling back to the first-registered driver) and
//! runs the matching program through the VM. Operation parameters travel
//! as a JSON blob seeded into the program's variable slot 0.

use super::Inner;
use crate::error::AdapterError;
use crate::util::{ensure_context, fill_bytes, fill_status};
use ferrite_host::DriverOps;
use ferrite_vm::{Program, Value, Vm};
use serde_json::json;
use std::sync::Weak;

/// Status text reported when a driver declares no getStatus program
const STATUS_UNKNOWN: &str = "{\"status\":\"unknown\"}";

pub(crate) struct BytecodeOps {
    inner: Weak<Inner>,
}

impl BytecodeOps {
    pub(crate) fn new(inner: Weak<Inner>) -> Self {
        Self { inner }
    }

    fn run(program: &Program, params: serde_json::Value) -> Result<Value, i32> {
        let mut vm = Vm::new();
        vm.execute_with_args(program, &[Value::Str(params.to_string())])
            .map_err(|e| e.code())
    }

    /// Run an optional program whose absence means automatic success;
    /// a Number result is the status code
    fn run_status_op(program: Option<&Program>, params: serde_json::Value) -> i32 {
        let Some(program) = program else {
            return 0;
        };
        match Self::run(program, params) {
            Ok(Value::Number(n)) => n as i32,
            Ok(_) => 0,
            Err(code) => code,
        }
    }
}

impl DriverOps for BytecodeOps {
    fn init(&self) -> i32 {
        let Some(inner) = self.inner.upgrade() else {
            return AdapterError::NotInitialized.code();
        };
        let _scope = ensure_context();
        let Some(desc) = inner.resolve() else {
            return AdapterError::NotFound("<unresolved>".to_string()).code();
        };
        Self::run_status_op(desc.programs.init.as_ref(), json!({}))
    }

    fn deinit(&self) -> i32 {
        let Some(inner) = self.inner.upgrade() else {
            return AdapterError::NotInitialized.code();
        };
        let _scope = ensure_context();
        let Some(desc) = inner.resolve() else {
            return AdapterError::NotFound("<unresolved>".to_string()).code();
        };
        Self::run_status_op(desc.programs.deinit.as_ref(), json!({}))
    }

    fn read(&self, buf: &mut Vec<u8>, max_size: usize) -> i32 {
        let Some(inner) = self.inner.upgrade() else {
            return AdapterError::NotInitialized.code();
        };
        let _scope = ensure_context();
        let Some(desc) = inner.resolve() else {
            return AdapterError::NotFound("<unresolved>".to_string()).code();
        };
        // Registration guarantees the read program exists
        let Some(program) = desc.programs.read.as_ref() else {
            return AdapterError::Unsupported("read").code();
        };
        match Self::run(program, json!({ "maxSize": max_size })) {
            Ok(Value::Str(s)) => fill_bytes(buf, s.as_bytes(), max_size),
            Ok(Value::Number(n)) => n as i32,
            Ok(_) => 0,
            Err(code) => code,
        }
    }

    fn write(&self, data: &[u8]) -> i32 {
        let Some(inner) = self.inner.upgrade() else {
            return AdapterError::NotInitialized.code();
        };
        let _scope = ensure_context();
        let Some(desc) = inner.resolve() else {
            return AdapterError::NotFound("<unresolved>".to_string()).code();
        };
        let Some(program) = desc.programs.write.as_ref() else {
            return AdapterError::Unsupported("write").code();
        };
        let params = json!({
            "data": String::from_utf8_lossy(data),
            "size": data.len(),
        });
        match Self::run(program, params) {
            Ok(Value::Number(n)) => n as i32,
            Ok(_) => 0,
            Err(code) => code,
        }
    }

    fn control(&self, command: i32, arg: Option<&str>) -> i32 {
        let Some(inner) = self.inner.upgrade() else {
            return AdapterError::NotInitialized.code();
        };
        let _scope = ensure_context();
        let Some(desc) = inner.resolve() else {
            return AdapterError::NotFound("<unresolved>".to_string()).code();
        };
        let Some(program) = desc.programs.control.as_ref() else {
            return AdapterError::Unsupported("control").code();
        };
        let params = match arg {
            Some(arg) => json!({ "command": command, "arg": arg }),
            None => json!({ "command": command }),
        };
        match Self::run(program, params) {
            Ok(Value::Number(n)) => n as i32,
            Ok(_) => 0,
            Err(code) => code,
        }
    }

    fn get_status(&self, buf: &mut String, max_size: usize) -> i32 {
        let Some(inner) = self.inner.upgrade() else {
            return AdapterError::NotInitialized.code();
        };
        let _scope = ensure_context();
        let Some(desc) = inner.resolve() else {
            return AdapterError::NotFound("<unresolved>".to_string()).code();
        };
        let Some(program) = desc.programs.get_status.as_ref() else {
            return fill_status(buf, STATUS_UNKNOWN, max_size);
        };
        match Self::run(program, json!({})) {
            Ok(Value::Str(s)) => fill_status(buf, &s, max_size),
            Ok(value) => fill_status(buf, &value.to_string(), max_size),
            Err(code) => code,
        }
    }
}
