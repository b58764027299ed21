//! Host-boundary errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// A driver with this id is already registered with the manager
    #[error("driver `{0}` is already registered")]
    DuplicateDriver(String),

    /// No driver registered under this id
    #[error("driver `{0}` not found")]
    DriverNotFound(String),

    /// A tool with this name is already registered
    #[error("tool `{0}` is already registered")]
    DuplicateTool(String),

    /// Store keys must be single path components
    #[error("invalid store key `{0}`")]
    InvalidKey(String),

    /// Store I/O failure
    #[error("store i/o: {0}")]
    Io(#[from] std::io::Error),
}
