//! Program container: instructions, string pool and name tables
//!
//! A `Program` is created once when a driver is defined and lives exactly as
//! long as the descriptor that owns it. The variable-name table exists for
//! tooling and serialization; the interpreter addresses slots purely by
//! index.

use crate::error::ValidateError;
use crate::opcode::OpCode;
use serde::{Deserialize, Serialize};

/// One instruction operand. Its interpretation depends on the opcode:
/// `Index` addresses the string pool, a variable slot, or a jump target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    None,
    Number(f64),
    Index(usize),
    Bool(bool),
}

impl Operand {
    pub fn as_number(self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_index(self) -> Option<usize> {
        match self {
            Operand::Index(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Operand::Bool(b) => Some(b),
            _ => None,
        }
    }
}

/// Opcode plus operand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: OpCode,
    pub operand: Operand,
}

impl Instruction {
    pub fn new(op: OpCode) -> Self {
        Self {
            op,
            operand: Operand::None,
        }
    }

    pub fn with_number(op: OpCode, n: f64) -> Self {
        Self {
            op,
            operand: Operand::Number(n),
        }
    }

    pub fn with_index(op: OpCode, i: usize) -> Self {
        Self {
            op,
            operand: Operand::Index(i),
        }
    }

    pub fn with_bool(op: OpCode, b: bool) -> Self {
        Self {
            op,
            operand: Operand::Bool(b),
        }
    }
}

/// Ordered instruction sequence plus its pools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Bytecode instructions
    pub instructions: Vec<Instruction>,

    /// Index-addressed owned strings
    pub strings: Vec<String>,

    /// Number of variable slots the interpreter allocates
    pub variable_count: usize,

    /// Slot names, for tooling only (may be shorter than `variable_count`)
    pub variable_names: Vec<String>,

    /// Reserved for GET_PROP/SET_PROP
    pub property_names: Vec<String>,

    /// Reserved for CALL
    pub function_names: Vec<String>,
}

/// Operand kind an opcode requires
enum OperandKind {
    None,
    Number,
    Bool,
    StringIndex,
    VariableSlot,
    JumpTarget,
}

fn operand_kind(op: OpCode) -> OperandKind {
    match op {
        OpCode::PushNum => OperandKind::Number,
        OpCode::PushBool => OperandKind::Bool,
        OpCode::PushStr => OperandKind::StringIndex,
        OpCode::PushVar | OpCode::SetVar => OperandKind::VariableSlot,
        OpCode::Jump | OpCode::JumpIf | OpCode::JumpIfNot => OperandKind::JumpTarget,
        _ => OperandKind::None,
    }
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string to the pool, interning duplicates, and return its index
    pub fn add_string(&mut self, s: impl Into<String>) -> usize {
        let s = s.into();
        if let Some(idx) = self.strings.iter().position(|existing| *existing == s) {
            return idx;
        }
        self.strings.push(s);
        self.strings.len() - 1
    }

    pub fn push(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Load-time validation. Rejects unimplemented opcodes, out-of-range
    /// pool/slot/jump references and operand-kind mismatches so the
    /// interpreter can never trip over them mid-run. A jump target equal to
    /// the program length is legal and terminates execution.
    pub fn validate(&self) -> Result<(), ValidateError> {
        for (pc, inst) in self.instructions.iter().enumerate() {
            if !inst.op.is_implemented() {
                return Err(ValidateError::UnimplementedOpcode { pc, op: inst.op });
            }
            match operand_kind(inst.op) {
                OperandKind::None => {}
                OperandKind::Number => {
                    if inst.operand.as_number().is_none() {
                        return Err(ValidateError::OperandMismatch { pc, op: inst.op });
                    }
                }
                OperandKind::Bool => {
                    if inst.operand.as_bool().is_none() {
                        return Err(ValidateError::OperandMismatch { pc, op: inst.op });
                    }
                }
                OperandKind::StringIndex => match inst.operand.as_index() {
                    Some(index) if index < self.strings.len() => {}
                    Some(index) => {
                        return Err(ValidateError::StringIndexOutOfRange {
                            pc,
                            index,
                            len: self.strings.len(),
                        })
                    }
                    None => return Err(ValidateError::OperandMismatch { pc, op: inst.op }),
                },
                OperandKind::VariableSlot => match inst.operand.as_index() {
                    Some(index) if index < self.variable_count => {}
                    Some(index) => {
                        return Err(ValidateError::VariableSlotOutOfRange {
                            pc,
                            index,
                            count: self.variable_count,
                        })
                    }
                    None => return Err(ValidateError::OperandMismatch { pc, op: inst.op }),
                },
                OperandKind::JumpTarget => match inst.operand.as_index() {
                    Some(target) if target <= self.instructions.len() => {}
                    Some(target) => {
                        return Err(ValidateError::JumpOutOfRange {
                            pc,
                            target,
                            len: self.instructions.len(),
                        })
                    }
                    None => return Err(ValidateError::OperandMismatch { pc, op: inst.op }),
                },
            }
        }
        Ok(())
    }
}
