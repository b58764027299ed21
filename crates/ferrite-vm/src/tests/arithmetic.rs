use super::helpers::run;
use crate::program::{Instruction, Program};
use crate::value::Value;
use crate::OpCode;

fn two_operand(op: OpCode, lhs: Value, rhs: Value) -> Program {
    let mut p = Program::new();
    for v in [lhs, rhs] {
        match v {
            Value::Number(n) => p.push(Instruction::with_number(OpCode::PushNum, n)),
            Value::Str(s) => {
                let idx = p.add_string(s);
                p.push(Instruction::with_index(OpCode::PushStr, idx));
            }
            Value::Bool(b) => p.push(Instruction::with_bool(OpCode::PushBool, b)),
            _ => unreachable!("unused in these tests"),
        }
    }
    p.push(Instruction::new(op));
    p.push(Instruction::new(OpCode::Halt));
    p
}

#[test]
fn test_number_addition() {
    let p = two_operand(OpCode::Add, Value::Number(3.0), Value::Number(4.0));
    assert_eq!(run(&p).unwrap(), Value::Number(7.0));
}

#[test]
fn test_string_concatenation() {
    let p = two_operand(OpCode::Add, Value::from("a"), Value::from("b"));
    assert_eq!(run(&p).unwrap(), Value::Str("ab".to_string()));
}

#[test]
fn test_mixed_add_yields_null() {
    let p = two_operand(OpCode::Add, Value::Number(1.0), Value::from("x"));
    assert_eq!(run(&p).unwrap(), Value::Null);
}

#[test]
fn test_bool_add_yields_null() {
    let p = two_operand(OpCode::Add, Value::Bool(true), Value::Bool(false));
    assert_eq!(run(&p).unwrap(), Value::Null);
}

#[test]
fn test_subtraction() {
    let p = two_operand(OpCode::Sub, Value::Number(10.0), Value::Number(4.0));
    assert_eq!(run(&p).unwrap(), Value::Number(6.0));
}

#[test]
fn test_subtraction_operand_order() {
    // rhs pops first, lhs second
    let p = two_operand(OpCode::Sub, Value::Number(4.0), Value::Number(10.0));
    assert_eq!(run(&p).unwrap(), Value::Number(-6.0));
}

#[test]
fn test_multiplication() {
    let p = two_operand(OpCode::Mul, Value::Number(6.0), Value::Number(7.0));
    assert_eq!(run(&p).unwrap(), Value::Number(42.0));
}

#[test]
fn test_mixed_sub_and_mul_yield_null() {
    let p = two_operand(OpCode::Sub, Value::from("a"), Value::Number(1.0));
    assert_eq!(run(&p).unwrap(), Value::Null);

    let p = two_operand(OpCode::Mul, Value::from("a"), Value::from("b"));
    assert_eq!(run(&p).unwrap(), Value::Null);
}

#[test]
fn test_division() {
    let p = two_operand(OpCode::Div, Value::Number(20.0), Value::Number(4.0));
    assert_eq!(run(&p).unwrap(), Value::Number(5.0));
}

#[test]
fn test_typed_equality() {
    let p = two_operand(OpCode::Eq, Value::Number(2.0), Value::Number(2.0));
    assert_eq!(run(&p).unwrap(), Value::Bool(true));

    let p = two_operand(OpCode::Eq, Value::from("a"), Value::from("a"));
    assert_eq!(run(&p).unwrap(), Value::Bool(true));

    let p = two_operand(OpCode::Eq, Value::Bool(true), Value::Bool(false));
    assert_eq!(run(&p).unwrap(), Value::Bool(false));
}

#[test]
fn test_cross_type_equality_is_false() {
    let p = two_operand(OpCode::Eq, Value::Number(1.0), Value::Bool(true));
    assert_eq!(run(&p).unwrap(), Value::Bool(false));

    let p = two_operand(OpCode::Eq, Value::from("1"), Value::Number(1.0));
    assert_eq!(run(&p).unwrap(), Value::Bool(false));
}
