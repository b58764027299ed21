//! Generic trampolines for the bridge backend
//!
//! Resolution follows the same current-context/first-registered rule as
//! the bytecode backend; dispatch then special-cases the two known device
//! families. write() translates `state`/`brightness`/`color` payload keys
//! into the typed setters, control() maps the small integer command codes,
//! and getStatus() assembles a family JSON from whichever getters are
//! mapped. Anything uncovered falls through to a generic buffer call if
//! one is mapped, else reports "not found".

use super::native::{NativeOp, OpRole};
use super::{BridgeDescriptor, DeviceFamily, Inner};
use crate::error::AdapterError;
use crate::util::{ensure_context, fill_bytes, fill_status};
use ferrite_host::DriverOps;
use serde_json::{json, Value as Json};
use std::sync::{Arc, Weak};

// LED command codes
const CMD_LED_ON: i32 = 1;
const CMD_LED_OFF: i32 = 2;
const CMD_LED_TOGGLE: i32 = 3;

// Temperature sensor command codes
const CMD_SENSOR_START_CONVERSION: i32 = 1;
const CMD_SENSOR_SET_RESOLUTION: i32 = 2;

pub(crate) struct BridgeOps {
    inner: Weak<Inner>,
}

impl BridgeOps {
    pub(crate) fn new(inner: Weak<Inner>) -> Self {
        Self { inner }
    }

    fn resolve(&self) -> Result<Arc<BridgeDescriptor>, i32> {
        let inner = self
            .inner
            .upgrade()
            .ok_or(AdapterError::NotInitialized.code())?;
        inner
            .resolve()
            .ok_or(AdapterError::NotFound("<unresolved>".to_string()).code())
    }
}

/// Accepts `{"r":..,"g":..,"b":..[,"w":..]}` or `[r,g,b[,w]]`
fn parse_color(value: &Json) -> Option<(u8, u8, u8, Option<u8>)> {
    let channel = |v: &Json| -> Option<u8> { v.as_u64().map(|n| n.min(255) as u8) };
    if let Some(obj) = value.as_object() {
        let r = channel(obj.get("r")?)?;
        let g = channel(obj.get("g")?)?;
        let b = channel(obj.get("b")?)?;
        let w = obj.get("w").and_then(channel);
        return Some((r, g, b, w));
    }
    if let Some(arr) = value.as_array() {
        if arr.len() < 3 {
            return None;
        }
        let r = channel(&arr[0])?;
        let g = channel(&arr[1])?;
        let b = channel(&arr[2])?;
        let w = arr.get(3).and_then(channel);
        return Some((r, g, b, w));
    }
    None
}

fn led_write(desc: &BridgeDescriptor, payload: &Json) -> Option<i32> {
    let mut handled = false;
    let mut rc = 0;

    if let Some(state) = payload.get("state").and_then(Json::as_bool) {
        if let Some(NativeOp::SetState(f)) = desc.mapping("set_state").map(|m| m.op) {
            rc = f(state);
            handled = true;
        }
    }
    if rc == 0 {
        if let Some(level) = payload.get("brightness").and_then(Json::as_u64) {
            if let Some(NativeOp::SetLevel(f)) = desc.mapping("set_brightness").map(|m| m.op)
            {
                rc = f(level.min(255) as u8);
                handled = true;
            }
        }
    }
    if rc == 0 {
        if let Some((r, g, b, w)) = payload.get("color").and_then(parse_color) {
            match (w, desc.mapping("set_color_w").map(|m| m.op)) {
                (Some(w), Some(NativeOp::SetColorW(f))) => {
                    rc = f(r, g, b, w);
                    handled = true;
                }
                _ => {
                    if let Some(NativeOp::SetColor(f)) = desc.mapping("set_color").map(|m| m.op)
                    {
                        rc = f(r, g, b);
                        handled = true;
                    }
                }
            }
        }
    }

    handled.then_some(rc)
}

fn generic_write(desc: &BridgeDescriptor, data: &[u8]) -> i32 {
    for mapping in desc.mappings_snapshot() {
        if mapping.role == OpRole::Write {
            if let NativeOp::WriteBuffer(f) = mapping.op {
                return f(data);
            }
        }
    }
    AdapterError::NotFound("write".to_string()).code()
}

fn generic_read(desc: &BridgeDescriptor, buf: &mut Vec<u8>, max_size: usize) -> i32 {
    for mapping in desc.mappings_snapshot() {
        if mapping.role == OpRole::Read {
            if let NativeOp::ReadBuffer(f) = mapping.op {
                let mut tmp = vec![0u8; max_size];
                let n = f(&mut tmp);
                if n < 0 {
                    return n;
                }
                let n = (n as usize).min(max_size);
                return fill_bytes(buf, &tmp[..n], max_size);
            }
        }
    }
    AdapterError::NotFound("read".to_string()).code()
}

impl DriverOps for BridgeOps {
    fn init(&self) -> i32 {
        let _scope = ensure_context();
        let desc = match self.resolve() {
            Ok(d) => d,
            Err(code) => return code,
        };
        match desc.mapping_for_role(OpRole::Init).map(|m| m.op) {
            Some(NativeOp::Simple(f)) => f(),
            _ => 0,
        }
    }

    fn deinit(&self) -> i32 {
        let _scope = ensure_context();
        let desc = match self.resolve() {
            Ok(d) => d,
            Err(code) => return code,
        };
        match desc.mapping_for_role(OpRole::Deinit).map(|m| m.op) {
            Some(NativeOp::Simple(f)) => f(),
            _ => 0,
        }
    }

    fn read(&self, buf: &mut Vec<u8>, max_size: usize) -> i32 {
        let _scope = ensure_context();
        let desc = match self.resolve() {
            Ok(d) => d,
            Err(code) => return code,
        };
        if desc.family == DeviceFamily::TemperatureSensor {
            if let Some(NativeOp::ReadScalar(f)) = desc.mapping("read_celsius").map(|m| m.op) {
                let text = format!("{:.2}", f());
                return fill_bytes(buf, text.as_bytes(), max_size);
            }
        }
        generic_read(&desc, buf, max_size)
    }

    fn write(&self, data: &[u8]) -> i32 {
        let _scope = ensure_context();
        let desc = match self.resolve() {
            Ok(d) => d,
            Err(code) => return code,
        };
        if matches!(desc.family, DeviceFamily::Led(_)) {
            if let Ok(payload) = serde_json::from_slice::<Json>(data) {
                if let Some(rc) = led_write(&desc, &payload) {
                    return rc;
                }
            }
        }
        generic_write(&desc, data)
    }

    fn control(&self, command: i32, arg: Option<&str>) -> i32 {
        let _scope = ensure_context();
        let desc = match self.resolve() {
            Ok(d) => d,
            Err(code) => return code,
        };
        match desc.family {
            DeviceFamily::Led(_) => match command {
                CMD_LED_ON | CMD_LED_OFF => {
                    match desc.mapping("set_state").map(|m| m.op) {
                        Some(NativeOp::SetState(f)) => f(command == CMD_LED_ON),
                        _ => AdapterError::Unsupported("control").code(),
                    }
                }
                CMD_LED_TOGGLE => match desc.mapping("toggle").map(|m| m.op) {
                    Some(NativeOp::Simple(f)) => f(),
                    _ => {
                        // No native toggle: emulate through the getter pair
                        match (
                            desc.mapping("get_state").map(|m| m.op),
                            desc.mapping("set_state").map(|m| m.op),
                        ) {
                            (
                                Some(NativeOp::GetState(get)),
                                Some(NativeOp::SetState(set)),
                            ) => set(!get()),
                            _ => AdapterError::Unsupported("toggle").code(),
                        }
                    }
                },
                _ => AdapterError::Unsupported("control").code(),
            },
            DeviceFamily::TemperatureSensor => match command {
                CMD_SENSOR_START_CONVERSION => {
                    match desc.mapping("start_conversion").map(|m| m.op) {
                        Some(NativeOp::Simple(f)) => f(),
                        _ => AdapterError::Unsupported("start_conversion").code(),
                    }
                }
                CMD_SENSOR_SET_RESOLUTION => {
                    let Some(bits) = arg.and_then(|a| a.parse::<u8>().ok()) else {
                        return AdapterError::InvalidArgument(
                            "set-resolution needs a numeric arg".to_string(),
                        )
                        .code();
                    };
                    match desc.mapping("set_resolution").map(|m| m.op) {
                        Some(NativeOp::SetLevel(f)) => f(bits),
                        _ => AdapterError::Unsupported("set_resolution").code(),
                    }
                }
                _ => AdapterError::Unsupported("control").code(),
            },
            DeviceFamily::Custom => match desc.mapping_for_role(OpRole::Control).map(|m| m.op)
            {
                Some(NativeOp::Simple(f)) => f(),
                _ => AdapterError::NotFound("control".to_string()).code(),
            },
        }
    }

    fn get_status(&self, buf: &mut String, max_size: usize) -> i32 {
        let _scope = ensure_context();
        let desc = match self.resolve() {
            Ok(d) => d,
            Err(code) => return code,
        };
        match desc.family {
            DeviceFamily::Led(_) => {
                let mut status = serde_json::Map::new();
                if let Some(NativeOp::GetState(f)) = desc.mapping("get_state").map(|m| m.op) {
                    status.insert("state".to_string(), json!(f()));
                }
                if let Some(NativeOp::GetLevel(f)) =
                    desc.mapping("get_brightness").map(|m| m.op)
                {
                    status.insert("brightness".to_string(), json!(f()));
                }
                if let Some(NativeOp::GetColor(f)) = desc.mapping("get_color").map(|m| m.op) {
                    let (r, g, b) = f();
                    status.insert("color".to_string(), json!({"r": r, "g": g, "b": b}));
                }
                fill_status(buf, &Json::Object(status).to_string(), max_size)
            }
            DeviceFamily::TemperatureSensor => {
                let mut status = serde_json::Map::new();
                if let Some(NativeOp::ReadScalar(f)) =
                    desc.mapping("read_celsius").map(|m| m.op)
                {
                    let rounded = (f() as f64 * 100.0).round() / 100.0;
                    status.insert("temperature".to_string(), json!(rounded));
                }
                if let Some(NativeOp::GetLevel(f)) =
                    desc.mapping("get_resolution").map(|m| m.op)
                {
                    status.insert("resolution".to_string(), json!(f()));
                }
                fill_status(buf, &Json::Object(status).to_string(), max_size)
            }
            DeviceFamily::Custom => match desc.mapping_for_role(OpRole::Status).map(|m| m.op) {
                Some(NativeOp::Status(f)) => f(buf, max_size),
                _ => AdapterError::NotFound("getStatus".to_string()).code(),
            },
        }
    }
}
