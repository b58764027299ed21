//! Error types for the VM and program validation

use crate::opcode::OpCode;
use std::fmt;

/// VM runtime errors
#[derive(Debug, Clone, PartialEq)]
pub enum VmError {
    /// Allocation failure (kept for boundary-code parity with the firmware;
    /// Rust allocation failures abort instead of surfacing here)
    AllocationFailure,

    /// Evaluation stack overflow
    StackOverflow,

    /// Pop from an empty evaluation stack
    StackUnderflow,

    /// String-pool index out of range
    InvalidStringIndex(usize),

    /// Variable slot index out of range
    InvalidVariableSlot(usize),

    /// Division by zero
    DivisionByZero,

    /// Opcode with no interpreter case reached execution
    UnsupportedOpcode(OpCode),

    /// Instruction carries the wrong operand kind for its opcode
    MalformedInstruction(usize),

    /// Configured step limit was exhausted before the program halted
    StepLimitExceeded(u64),
}

impl VmError {
    /// Numeric code handed across the adapter boundary. VM codes occupy
    /// their own range below the adapter's small negative integers.
    pub fn code(&self) -> i32 {
        match self {
            VmError::AllocationFailure => -201,
            VmError::StackOverflow => -202,
            VmError::StackUnderflow => -203,
            VmError::InvalidStringIndex(_) => -204,
            VmError::InvalidVariableSlot(_) => -205,
            VmError::DivisionByZero => -206,
            VmError::UnsupportedOpcode(_) => -207,
            VmError::MalformedInstruction(_) => -208,
            VmError::StepLimitExceeded(_) => -209,
        }
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::AllocationFailure => write!(f, "allocation failure"),
            VmError::StackOverflow => write!(f, "stack overflow"),
            VmError::StackUnderflow => write!(f, "stack underflow"),
            VmError::InvalidStringIndex(idx) => write!(f, "invalid string pool index: {}", idx),
            VmError::InvalidVariableSlot(idx) => write!(f, "invalid variable slot: {}", idx),
            VmError::DivisionByZero => write!(f, "division by zero"),
            VmError::UnsupportedOpcode(op) => write!(f, "unsupported opcode: {}", op),
            VmError::MalformedInstruction(pc) => {
                write!(f, "malformed instruction at pc {}", pc)
            }
            VmError::StepLimitExceeded(limit) => {
                write!(f, "step limit of {} exceeded", limit)
            }
        }
    }
}

impl std::error::Error for VmError {}

/// Load-time validation errors
///
/// A program failing validation never reaches the interpreter; the adapters
/// reject the driver definition at registration instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidateError {
    /// Instruction uses an opcode with no interpreter case
    UnimplementedOpcode { pc: usize, op: OpCode },

    /// String-pool reference past the end of the pool
    StringIndexOutOfRange { pc: usize, index: usize, len: usize },

    /// Variable slot reference past the declared variable count
    VariableSlotOutOfRange { pc: usize, index: usize, count: usize },

    /// Jump target past the end of the program (the end itself is legal)
    JumpOutOfRange { pc: usize, target: usize, len: usize },

    /// Operand kind does not match the opcode
    OperandMismatch { pc: usize, op: OpCode },
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::UnimplementedOpcode { pc, op } => {
                write!(f, "unimplemented opcode {} at pc {}", op, pc)
            }
            ValidateError::StringIndexOutOfRange { pc, index, len } => {
                write!(
                    f,
                    "string index {} out of range (pool size {}) at pc {}",
                    index, len, pc
                )
            }
            ValidateError::VariableSlotOutOfRange { pc, index, count } => {
                write!(
                    f,
                    "variable slot {} out of range (count {}) at pc {}",
                    index, count, pc
                )
            }
            ValidateError::JumpOutOfRange { pc, target, len } => {
                write!(
                    f,
                    "jump target {} out of range (program length {}) at pc {}",
                    target, len, pc
                )
            }
            ValidateError::OperandMismatch { pc, op } => {
                write!(f, "operand mismatch for {} at pc {}", op, pc)
            }
        }
    }
}

impl std::error::Error for ValidateError {}
