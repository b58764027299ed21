//! Typed native operation table
//!
//! The firmware resolved bridge calls through raw function pointers cast
//! per call. Here every mapping carries a tagged variant validated once at
//! registration, so a trampoline can only ever call a function through its
//! real signature.

use std::fmt;

/// One native entry point, tagged by signature
#[derive(Clone, Copy)]
pub enum NativeOp {
    /// No-argument status call (init, deinit, toggle, start-conversion)
    Simple(fn() -> i32),
    SetState(fn(bool) -> i32),
    GetState(fn() -> bool),
    /// Small unsigned scalar setter (brightness, resolution)
    SetLevel(fn(u8) -> i32),
    GetLevel(fn() -> u8),
    SetColor(fn(u8, u8, u8) -> i32),
    GetColor(fn() -> (u8, u8, u8)),
    SetColorW(fn(u8, u8, u8, u8) -> i32),
    SetPixel(fn(u16, u8, u8, u8) -> i32),
    /// Scalar reading (temperature in celsius)
    ReadScalar(fn() -> f32),
    /// Generic buffer read; returns byte count
    ReadBuffer(fn(&mut [u8]) -> i32),
    /// Generic buffer write
    WriteBuffer(fn(&[u8]) -> i32),
    /// Generic status text fill
    Status(fn(&mut String, usize) -> i32),
}

impl NativeOp {
    pub fn kind(&self) -> &'static str {
        match self {
            NativeOp::Simple(_) => "simple",
            NativeOp::SetState(_) => "set_state",
            NativeOp::GetState(_) => "get_state",
            NativeOp::SetLevel(_) => "set_level",
            NativeOp::GetLevel(_) => "get_level",
            NativeOp::SetColor(_) => "set_color",
            NativeOp::GetColor(_) => "get_color",
            NativeOp::SetColorW(_) => "set_color_w",
            NativeOp::SetPixel(_) => "set_pixel",
            NativeOp::ReadScalar(_) => "read_scalar",
            NativeOp::ReadBuffer(_) => "read_buffer",
            NativeOp::WriteBuffer(_) => "write_buffer",
            NativeOp::Status(_) => "status",
        }
    }
}

impl fmt::Debug for NativeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeOp::{}", self.kind())
    }
}

/// Which lifecycle operation a mapping serves. `Helper` entries back the
/// family status assembly and are never dispatched directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpRole {
    Init,
    Deinit,
    Read,
    Write,
    Control,
    Status,
    Helper,
}

/// (operation name, native function, role)
#[derive(Debug, Clone)]
pub struct Mapping {
    pub name: String,
    pub op: NativeOp,
    pub role: OpRole,
}

impl Mapping {
    pub fn new(name: impl Into<String>, op: NativeOp, role: OpRole) -> Self {
        Self {
            name: name.into(),
            op,
            role,
        }
    }
}
