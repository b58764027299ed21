//! JSON instruction-list assembler
//!
//! Driver definitions carry their lifecycle programs as JSON instruction
//! lists rather than compiled blobs. The format is a thin spelling of the
//! instruction set:
//!
//! ```json
//! {
//!   "variables": ["params", "count"],
//!   "code": [
//!     ["PUSH_VAR", "params"],
//!     ["PUSH_STR", " ok"],
//!     ["ADD"],
//!     ["HALT"]
//!   ]
//! }
//! ```
//!
//! A bare array is accepted as shorthand for `{"code": [...]}`. String
//! operands of `PUSH_STR` are interned into the program's pool; variable
//! operands may be a slot index or a name from the `variables` table.

use crate::opcode::OpCode;
use crate::program::{Instruction, Operand, Program};
use serde_json::Value as Json;
use std::fmt;

/// Assembly errors
#[derive(Debug, Clone, PartialEq)]
pub enum AsmError {
    /// Top-level shape is neither an object with `code` nor an array
    NotAProgram,

    /// `code` entry is not an array of `[mnemonic, operand?]`
    BadEntry(usize),

    /// Unknown opcode mnemonic
    UnknownMnemonic(usize, String),

    /// Operand missing or of the wrong JSON type for its opcode
    BadOperand(usize, &'static str),

    /// Variable name not present in the `variables` table
    UnknownVariable(usize, String),
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::NotAProgram => write!(f, "program must be an object with `code` or an array"),
            AsmError::BadEntry(i) => write!(f, "instruction {} is not a [mnemonic, operand?] array", i),
            AsmError::UnknownMnemonic(i, m) => write!(f, "instruction {}: unknown mnemonic `{}`", i, m),
            AsmError::BadOperand(i, what) => write!(f, "instruction {}: expected {} operand", i, what),
            AsmError::UnknownVariable(i, name) => {
                write!(f, "instruction {}: unknown variable `{}`", i, name)
            }
        }
    }
}

impl std::error::Error for AsmError {}

/// Assemble a JSON instruction list into a [`Program`]
pub fn assemble(json: &Json) -> Result<Program, AsmError> {
    let (code, variables, strings) = match json {
        Json::Array(entries) => (entries.as_slice(), &[][..], &[][..]),
        Json::Object(obj) => {
            let code = obj
                .get("code")
                .and_then(Json::as_array)
                .ok_or(AsmError::NotAProgram)?;
            let variables = obj
                .get("variables")
                .and_then(Json::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let strings = obj
                .get("strings")
                .and_then(Json::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            (code.as_slice(), variables, strings)
        }
        _ => return Err(AsmError::NotAProgram),
    };

    let mut program = Program::new();
    program.variable_names = variables
        .iter()
        .filter_map(Json::as_str)
        .map(str::to_string)
        .collect();
    program.variable_count = program.variable_names.len();
    for s in strings.iter().filter_map(Json::as_str) {
        program.add_string(s);
    }

    for (i, entry) in code.iter().enumerate() {
        let parts = entry.as_array().ok_or(AsmError::BadEntry(i))?;
        let mnemonic = parts
            .first()
            .and_then(Json::as_str)
            .ok_or(AsmError::BadEntry(i))?;
        let op = OpCode::from_mnemonic(mnemonic)
            .ok_or_else(|| AsmError::UnknownMnemonic(i, mnemonic.to_string()))?;
        let operand = parts.get(1);

        let inst = match op {
            OpCode::PushNum => {
                let n = operand
                    .and_then(Json::as_f64)
                    .ok_or(AsmError::BadOperand(i, "number"))?;
                Instruction::with_number(op, n)
            }
            OpCode::PushBool => {
                let b = operand
                    .and_then(Json::as_bool)
                    .ok_or(AsmError::BadOperand(i, "bool"))?;
                Instruction::with_bool(op, b)
            }
            OpCode::PushStr => match operand {
                Some(Json::String(s)) => {
                    let idx = program.add_string(s.as_str());
                    Instruction::with_index(op, idx)
                }
                Some(Json::Number(n)) => {
                    let idx = n
                        .as_u64()
                        .ok_or(AsmError::BadOperand(i, "string or pool index"))?;
                    Instruction::with_index(op, idx as usize)
                }
                _ => return Err(AsmError::BadOperand(i, "string or pool index")),
            },
            OpCode::PushVar | OpCode::SetVar => match operand {
                Some(Json::Number(n)) => {
                    let idx = n.as_u64().ok_or(AsmError::BadOperand(i, "slot"))?;
                    Instruction::with_index(op, idx as usize)
                }
                Some(Json::String(name)) => {
                    let idx = program
                        .variable_names
                        .iter()
                        .position(|v| v == name)
                        .ok_or_else(|| AsmError::UnknownVariable(i, name.clone()))?;
                    Instruction::with_index(op, idx)
                }
                _ => return Err(AsmError::BadOperand(i, "slot index or variable name")),
            },
            OpCode::Jump | OpCode::JumpIf | OpCode::JumpIfNot => {
                let target = operand
                    .and_then(Json::as_u64)
                    .ok_or(AsmError::BadOperand(i, "jump target"))?;
                Instruction::with_index(op, target as usize)
            }
            _ => Instruction::new(op),
        };
        program.push(inst);
    }

    Ok(program)
}
