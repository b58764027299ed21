//! Adapter error taxonomy
//!
//! Inside the subsystem these are values; at the driver-manager boundary
//! they become the small negative integers `code()` yields, and at the
//! tool-registry boundary they become structured error strings.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    #[error("adapter not initialized")]
    NotInitialized,

    #[error("driver `{0}` not found")]
    NotFound(String),

    #[error("duplicate driver id `{0}`")]
    DuplicateId(String),

    /// Kept for boundary-code parity with the firmware; Rust allocation
    /// failures abort instead of surfacing here
    #[error("allocation failure")]
    AllocationFailure,

    #[error("driver manager registration failed: {0}")]
    Downstream(String),

    #[error("invalid driver description: {0}")]
    InvalidDescription(String),

    #[error("missing mandatory program `{0}`")]
    MissingMandatoryProgram(&'static str),

    #[error("operation `{0}` not supported")]
    Unsupported(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store failure: {0}")]
    Store(String),
}

impl AdapterError {
    /// Status code at the internal (driver-manager) boundary
    pub fn code(&self) -> i32 {
        match self {
            AdapterError::NotInitialized => -1,
            AdapterError::NotFound(_) => -2,
            AdapterError::DuplicateId(_) => -3,
            AdapterError::AllocationFailure => -4,
            AdapterError::Downstream(_) => -5,
            AdapterError::InvalidDescription(_) => -6,
            AdapterError::MissingMandatoryProgram(_) => -7,
            AdapterError::Unsupported(_) => -8,
            AdapterError::InvalidArgument(_) => -9,
            AdapterError::Store(_) => -10,
        }
    }
}
