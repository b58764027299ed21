//! Ferrite Virtual Machine
//!
//! This crate implements the stack-based bytecode virtual machine that backs
//! Ferrite's virtualized device drivers. A driver's lifecycle operations
//! (init/deinit/read/write/control/getStatus) are supplied at runtime as
//! small bytecode programs; the registry trampolines hand each program its
//! parameter blob and run it here.
//!
//! # Architecture
//!
//! - A bounded evaluation stack (256 entries) and a fixed array of variable
//!   slots sized from the program's declared variable count.
//! - One instruction per step; jump-family instructions assign the program
//!   counter directly, everything else falls through to `pc + 1`.
//! - Execution ends at `HALT` (returning top-of-stack, or `Null` when the
//!   stack is empty), when the counter walks past the last instruction, or
//!   when a runtime error stops the machine.
//!
//! # Modules
//!
//! - `opcode`: instruction set definitions
//! - `value`: runtime value type
//! - `program`: instructions, the program container and load-time validation
//! - `vm`: the execution engine
//! - `asm`: JSON instruction-list assembler used by driver definitions
//! - `disasm`: one-line-per-instruction program listing
//! - `error`: VM and validation error types

pub mod asm;
pub mod disasm;
pub mod error;
pub mod opcode;
pub mod program;
pub mod value;
pub mod vm;

// Re-export main types
pub use asm::{assemble, AsmError};
pub use disasm::disassemble;
pub use error::{ValidateError, VmError};
pub use opcode::OpCode;
pub use program::{Instruction, Operand, Program};
pub use value::Value;
pub use vm::{Vm, STACK_MAX};

#[cfg(test)]
mod tests;
