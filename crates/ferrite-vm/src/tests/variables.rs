use super::helpers::run;
use crate::program::{Instruction, Program};
use crate::value::Value;
use crate::vm::Vm;

use crate::OpCode;

#[test]
fn test_set_then_get_round_trip() {
    let mut p = Program::new();
    p.variable_count = 1;
    p.push(Instruction::with_number(OpCode::PushNum, 42.0));
    p.push(Instruction::with_index(OpCode::SetVar, 0));
    p.push(Instruction::with_index(OpCode::PushVar, 0));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(42.0));
}

#[test]
fn test_unset_slot_reads_null() {
    let mut p = Program::new();
    p.variable_count = 2;
    p.push(Instruction::with_index(OpCode::PushVar, 1));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Null);
}

#[test]
fn test_retrieved_string_does_not_alias_the_slot() {
    // PUSH_VAR must copy: the retrieved value stays intact even after the
    // slot is overwritten.
    let mut p = Program::new();
    p.variable_count = 1;
    let hello = p.add_string("hello");
    let other = p.add_string("other");
    p.push(Instruction::with_index(OpCode::PushStr, hello));
    p.push(Instruction::with_index(OpCode::SetVar, 0));
    p.push(Instruction::with_index(OpCode::PushVar, 0)); // copy on the stack
    p.push(Instruction::with_index(OpCode::PushStr, other));
    p.push(Instruction::with_index(OpCode::SetVar, 0)); // overwrite the slot
    p.push(Instruction::new(OpCode::Halt)); // return the copy
    assert_eq!(run(&p).unwrap(), Value::Str("hello".to_string()));
}

#[test]
fn test_execute_with_args_seeds_slots() {
    let mut p = Program::new();
    p.variable_count = 2;
    p.push(Instruction::with_index(OpCode::PushVar, 0));
    p.push(Instruction::with_index(OpCode::PushVar, 1));
    p.push(Instruction::new(OpCode::Add));
    p.push(Instruction::new(OpCode::Halt));
    p.validate().unwrap();

    let mut vm = Vm::new();
    let result = vm
        .execute_with_args(&p, &[Value::Number(2.0), Value::Number(5.0)])
        .unwrap();
    assert_eq!(result, Value::Number(7.0));
}

#[test]
fn test_pop_discards_top() {
    let mut p = Program::new();
    p.push(Instruction::with_number(OpCode::PushNum, 1.0));
    p.push(Instruction::with_number(OpCode::PushNum, 2.0));
    p.push(Instruction::new(OpCode::Pop));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(1.0));
}
