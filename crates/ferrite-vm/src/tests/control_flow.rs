use super::helpers::run;
use crate::program::{Instruction, Program};
use crate::value::Value;
use crate::vm::Vm;
use crate::{OpCode, VmError};

#[test]
fn test_halt_returns_top_of_stack() {
    let mut p = Program::new();
    p.push(Instruction::with_number(OpCode::PushNum, 1.0));
    p.push(Instruction::with_number(OpCode::PushNum, 2.0));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(2.0));
}

#[test]
fn test_halt_with_empty_stack_returns_null() {
    let mut p = Program::new();
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Null);
}

#[test]
fn test_running_off_the_end_returns_null() {
    let mut p = Program::new();
    p.push(Instruction::with_number(OpCode::PushNum, 9.0));
    p.push(Instruction::new(OpCode::Nop));
    assert_eq!(run(&p).unwrap(), Value::Null);
}

#[test]
fn test_unconditional_jump_skips_instructions() {
    let mut p = Program::new();
    p.push(Instruction::with_index(OpCode::Jump, 2));
    p.push(Instruction::with_number(OpCode::PushNum, 1.0)); // skipped
    p.push(Instruction::with_number(OpCode::PushNum, 2.0));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(2.0));
}

#[test]
fn test_jump_to_program_end_terminates() {
    let mut p = Program::new();
    p.push(Instruction::with_index(OpCode::Jump, 2));
    p.push(Instruction::with_number(OpCode::PushNum, 1.0));
    assert_eq!(run(&p).unwrap(), Value::Null);
}

#[test]
fn test_jump_if_taken_on_true() {
    let mut p = Program::new();
    p.push(Instruction::with_bool(OpCode::PushBool, true));
    p.push(Instruction::with_index(OpCode::JumpIf, 3));
    p.push(Instruction::with_number(OpCode::PushNum, 1.0)); // skipped
    p.push(Instruction::with_number(OpCode::PushNum, 2.0));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(2.0));
}

#[test]
fn test_jump_if_not_taken_on_false() {
    let mut p = Program::new();
    p.push(Instruction::with_bool(OpCode::PushBool, false));
    p.push(Instruction::with_index(OpCode::JumpIf, 4));
    p.push(Instruction::with_number(OpCode::PushNum, 1.0));
    p.push(Instruction::new(OpCode::Halt));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(1.0));
}

#[test]
fn test_non_bool_condition_counts_as_false() {
    let mut p = Program::new();
    p.push(Instruction::with_number(OpCode::PushNum, 1.0));
    p.push(Instruction::with_index(OpCode::JumpIf, 4));
    p.push(Instruction::with_number(OpCode::PushNum, 5.0));
    p.push(Instruction::new(OpCode::Halt));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(5.0));
}

#[test]
fn test_jump_if_not_inverts() {
    let mut p = Program::new();
    p.push(Instruction::with_bool(OpCode::PushBool, false));
    p.push(Instruction::with_index(OpCode::JumpIfNot, 3));
    p.push(Instruction::new(OpCode::Halt)); // skipped
    p.push(Instruction::with_number(OpCode::PushNum, 3.0));
    p.push(Instruction::new(OpCode::Halt));
    assert_eq!(run(&p).unwrap(), Value::Number(3.0));
}

#[test]
fn test_backward_jump_spins_until_step_limit() {
    // The VM carries no built-in loop bound; a backward JUMP runs until the
    // host-installed step limit trips.
    let mut p = Program::new();
    p.push(Instruction::new(OpCode::Nop));
    p.push(Instruction::with_index(OpCode::Jump, 0));
    p.validate().unwrap();

    let mut vm = Vm::with_step_limit(10_000);
    assert_eq!(vm.execute(&p), Err(VmError::StepLimitExceeded(10_000)));
}

#[test]
fn test_countdown_loop() {
    // slot0 = 3; loop: slot0 = slot0 - 1; if slot0 == 0 halt with slot0
    let mut p = Program::new();
    p.variable_count = 1;
    p.push(Instruction::with_number(OpCode::PushNum, 3.0)); // 0
    p.push(Instruction::with_index(OpCode::SetVar, 0)); // 1
    p.push(Instruction::with_index(OpCode::PushVar, 0)); // 2: loop head
    p.push(Instruction::with_number(OpCode::PushNum, 1.0)); // 3
    p.push(Instruction::new(OpCode::Sub)); // 4
    p.push(Instruction::with_index(OpCode::SetVar, 0)); // 5
    p.push(Instruction::with_index(OpCode::PushVar, 0)); // 6
    p.push(Instruction::with_number(OpCode::PushNum, 0.0)); // 7
    p.push(Instruction::new(OpCode::Eq)); // 8
    p.push(Instruction::with_index(OpCode::JumpIfNot, 2)); // 9
    p.push(Instruction::with_index(OpCode::PushVar, 0)); // 10
    p.push(Instruction::new(OpCode::Halt)); // 11
    assert_eq!(run(&p).unwrap(), Value::Number(0.0));
}
