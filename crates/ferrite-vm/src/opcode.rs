//! OpCode definitions for the Ferrite VM
//!
//! Every instruction is an opcode plus one operand whose meaning depends on
//! the opcode: an immediate number, a string-pool index, a bool, a variable
//! slot, or a jump target. Opcodes past the implemented set are declared for
//! bytecode compatibility and rejected at load time by
//! [`Program::validate`](crate::program::Program::validate).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Virtual machine opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OpCode {
    // ===== Stack =====
    /// Push an immediate number (operand: f64)
    PushNum = 0,
    /// Push a string from the pool (operand: pool index)
    PushStr = 1,
    /// Push an immediate bool (operand: bool)
    PushBool = 2,
    /// Discard top of stack
    Pop = 3,

    // ===== Variables =====
    /// Push a copy of a variable slot (operand: slot index)
    PushVar = 10,
    /// Pop top of stack into a variable slot (operand: slot index)
    SetVar = 11,

    // ===== Arithmetic =====
    /// Number+Number, String+String concatenation; any other pairing pushes Null
    Add = 20,
    /// Number-Number; any other pairing pushes Null
    Sub = 21,
    /// Number*Number; any other pairing pushes Null
    Mul = 22,
    /// Number/Number; divisor 0 is a fatal runtime error
    Div = 23,
    /// Declared, not interpreted
    Mod = 24,

    // ===== Comparison =====
    /// Typed equality across Number/Bool/String; anything else compares false
    Eq = 30,
    /// Declared, not interpreted
    Neq = 31,
    /// Declared, not interpreted
    Gt = 32,
    /// Declared, not interpreted
    Lt = 33,
    /// Declared, not interpreted
    Gte = 34,
    /// Declared, not interpreted
    Lte = 35,

    // ===== Logical =====
    /// Declared, not interpreted
    And = 40,
    /// Declared, not interpreted
    Or = 41,
    /// Declared, not interpreted
    Not = 42,

    // ===== Control flow =====
    /// Unconditional jump (operand: target pc)
    Jump = 50,
    /// Pop a condition; jump when it is Bool(true). Non-Bool counts as false
    JumpIf = 51,
    /// Pop a condition; jump when it is not Bool(true)
    JumpIfNot = 52,

    // ===== Calls & structures (reserved) =====
    /// Declared, not interpreted
    Call = 60,
    /// Declared, not interpreted
    Return = 61,
    /// Declared, not interpreted
    GetProp = 62,
    /// Declared, not interpreted
    SetProp = 63,
    /// Declared, not interpreted
    NewArray = 64,
    /// Declared, not interpreted
    NewObject = 65,

    // ===== Termination =====
    /// Stop; return top of stack, or Null when the stack is empty
    Halt = 70,
    /// No-op
    Nop = 71,
}

impl OpCode {
    /// True for opcodes the interpreter executes. Programs referencing any
    /// other opcode are rejected at load time rather than failing mid-run.
    pub fn is_implemented(self) -> bool {
        !matches!(
            self,
            OpCode::Mod
                | OpCode::Neq
                | OpCode::Gt
                | OpCode::Lt
                | OpCode::Gte
                | OpCode::Lte
                | OpCode::And
                | OpCode::Or
                | OpCode::Not
                | OpCode::Call
                | OpCode::Return
                | OpCode::GetProp
                | OpCode::SetProp
                | OpCode::NewArray
                | OpCode::NewObject
        )
    }

    /// Assembler mnemonic for this opcode
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::PushNum => "PUSH_NUM",
            OpCode::PushStr => "PUSH_STR",
            OpCode::PushBool => "PUSH_BOOL",
            OpCode::Pop => "POP",
            OpCode::PushVar => "PUSH_VAR",
            OpCode::SetVar => "SET_VAR",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::Eq => "EQ",
            OpCode::Neq => "NEQ",
            OpCode::Gt => "GT",
            OpCode::Lt => "LT",
            OpCode::Gte => "GTE",
            OpCode::Lte => "LTE",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Not => "NOT",
            OpCode::Jump => "JUMP",
            OpCode::JumpIf => "JUMP_IF",
            OpCode::JumpIfNot => "JUMP_IF_NOT",
            OpCode::Call => "CALL",
            OpCode::Return => "RETURN",
            OpCode::GetProp => "GET_PROP",
            OpCode::SetProp => "SET_PROP",
            OpCode::NewArray => "NEW_ARRAY",
            OpCode::NewObject => "NEW_OBJECT",
            OpCode::Halt => "HALT",
            OpCode::Nop => "NOP",
        }
    }

    /// Parse an assembler mnemonic
    pub fn from_mnemonic(s: &str) -> Option<OpCode> {
        ALL_OPCODES.iter().copied().find(|op| op.mnemonic() == s)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Every declared opcode, implemented or not
pub const ALL_OPCODES: [OpCode; 31] = [
    OpCode::PushNum,
    OpCode::PushStr,
    OpCode::PushBool,
    OpCode::Pop,
    OpCode::PushVar,
    OpCode::SetVar,
    OpCode::Add,
    OpCode::Sub,
    OpCode::Mul,
    OpCode::Div,
    OpCode::Mod,
    OpCode::Eq,
    OpCode::Neq,
    OpCode::Gt,
    OpCode::Lt,
    OpCode::Gte,
    OpCode::Lte,
    OpCode::And,
    OpCode::Or,
    OpCode::Not,
    OpCode::Jump,
    OpCode::JumpIf,
    OpCode::JumpIfNot,
    OpCode::Call,
    OpCode::Return,
    OpCode::GetProp,
    OpCode::SetProp,
    OpCode::NewArray,
    OpCode::NewObject,
    OpCode::Halt,
    OpCode::Nop,
];
