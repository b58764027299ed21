//! Program listing, one instruction per line

use crate::opcode::OpCode;
use crate::program::{Operand, Program};
use std::fmt::Write;

/// Render a program as a human-readable listing. String-pool operands are
/// annotated with the pooled text.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    for (pc, inst) in program.instructions.iter().enumerate() {
        let _ = write!(out, "{:04} {}", pc, inst.op);
        match inst.operand {
            Operand::None => {}
            Operand::Number(n) => {
                let _ = write!(out, " {}", n);
            }
            Operand::Bool(b) => {
                let _ = write!(out, " {}", b);
            }
            Operand::Index(i) => {
                let _ = write!(out, " {}", i);
                if inst.op == OpCode::PushStr {
                    if let Some(s) = program.strings.get(i) {
                        let _ = write!(out, " ; {:?}", s);
                    }
                } else if matches!(inst.op, OpCode::PushVar | OpCode::SetVar) {
                    if let Some(name) = program.variable_names.get(i) {
                        let _ = write!(out, " ; {}", name);
                    }
                }
            }
        }
        out.push('\n');
    }
    out
}
