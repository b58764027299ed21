//! Property tests: well-formed straight-line programs always terminate
//! successfully with the value on top of the stack at HALT.

use crate::program::{Instruction, Program};
use crate::value::Value;
use crate::vm::Vm;
use crate::OpCode;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum PushKind {
    Num(f64),
    Str(String),
    Bool(bool),
    Nop,
}

fn arb_push() -> impl Strategy<Value = PushKind> {
    prop_oneof![
        (-1.0e6..1.0e6f64).prop_map(PushKind::Num),
        "[a-z]{0,8}".prop_map(PushKind::Str),
        any::<bool>().prop_map(PushKind::Bool),
        Just(PushKind::Nop),
    ]
}

fn build(specs: &[PushKind]) -> (Program, Value) {
    let mut p = Program::new();
    let mut top = Value::Null;
    for kind in specs {
        match kind {
            PushKind::Num(n) => {
                p.push(Instruction::with_number(OpCode::PushNum, *n));
                top = Value::Number(*n);
            }
            PushKind::Str(s) => {
                let idx = p.add_string(s.clone());
                p.push(Instruction::with_index(OpCode::PushStr, idx));
                top = Value::Str(s.clone());
            }
            PushKind::Bool(b) => {
                p.push(Instruction::with_bool(OpCode::PushBool, *b));
                top = Value::Bool(*b);
            }
            PushKind::Nop => p.push(Instruction::new(OpCode::Nop)),
        }
    }
    p.push(Instruction::new(OpCode::Halt));
    (p, top)
}

proptest! {
    #[test]
    fn straight_line_programs_halt_with_top_of_stack(specs in prop::collection::vec(arb_push(), 0..200)) {
        let (program, expected) = build(&specs);
        prop_assert!(program.validate().is_ok());
        let result = Vm::new().execute(&program).unwrap();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn binary_number_ops_terminate(a in -1.0e3..1.0e3f64, b in 1.0e-3..1.0e3f64, op in prop_oneof![
        Just(OpCode::Add), Just(OpCode::Sub), Just(OpCode::Mul), Just(OpCode::Div), Just(OpCode::Eq)
    ]) {
        let mut p = Program::new();
        p.push(Instruction::with_number(OpCode::PushNum, a));
        p.push(Instruction::with_number(OpCode::PushNum, b));
        p.push(Instruction::new(op));
        p.push(Instruction::new(OpCode::Halt));
        prop_assert!(p.validate().is_ok());
        // Divisor is bounded away from zero, so every run succeeds
        prop_assert!(Vm::new().execute(&p).is_ok());
    }
}
