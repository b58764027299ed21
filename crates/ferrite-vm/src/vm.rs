//! Virtual machine execution engine
//!
//! The VM is purely synchronous and performs no I/O: all device interaction
//! happens in the adapter that invoked it, which keeps programs independently
//! testable. There is no built-in loop bound: a backward JUMP can spin
//! forever unless the host installs a step limit via
//! [`Vm::with_step_limit`].

use crate::error::VmError;
use crate::opcode::OpCode;
use crate::program::Program;
use crate::value::Value;

/// Maximum evaluation stack depth
pub const STACK_MAX: usize = 256;

/// Stack-based bytecode interpreter
pub struct Vm {
    stack: Vec<Value>,
    slots: Vec<Value>,
    step_limit: Option<u64>,
}

impl Vm {
    /// Create a VM with no step limit, matching the firmware behavior
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(STACK_MAX),
            slots: Vec::new(),
            step_limit: None,
        }
    }

    /// Create a VM that fails with [`VmError::StepLimitExceeded`] after
    /// `limit` executed instructions
    pub fn with_step_limit(limit: u64) -> Self {
        Self {
            step_limit: Some(limit),
            ..Self::new()
        }
    }

    /// Execute a program with all variable slots starting at Null
    pub fn execute(&mut self, program: &Program) -> Result<Value, VmError> {
        self.execute_with_args(program, &[])
    }

    /// Execute a program with the leading variable slots seeded from `args`.
    /// The adapters use slot 0 to hand a program its parameter blob.
    pub fn execute_with_args(
        &mut self,
        program: &Program,
        args: &[Value],
    ) -> Result<Value, VmError> {
        self.stack.clear();
        self.slots.clear();
        self.slots
            .resize(program.variable_count.max(args.len()), Value::Null);
        for (slot, arg) in self.slots.iter_mut().zip(args.iter()) {
            *slot = arg.clone();
        }

        let mut pc = 0usize;
        let mut steps = 0u64;

        while pc < program.instructions.len() {
            if let Some(limit) = self.step_limit {
                steps += 1;
                if steps > limit {
                    return Err(VmError::StepLimitExceeded(limit));
                }
            }

            let inst = program.instructions[pc];
            match inst.op {
                OpCode::PushNum => {
                    let n = inst
                        .operand
                        .as_number()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    self.push(Value::Number(n))?;
                }
                OpCode::PushStr => {
                    let idx = inst
                        .operand
                        .as_index()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    let s = program
                        .strings
                        .get(idx)
                        .ok_or(VmError::InvalidStringIndex(idx))?;
                    self.push(Value::Str(s.clone()))?;
                }
                OpCode::PushBool => {
                    let b = inst
                        .operand
                        .as_bool()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    self.push(Value::Bool(b))?;
                }
                OpCode::Pop => {
                    self.pop()?;
                }
                OpCode::PushVar => {
                    let idx = inst
                        .operand
                        .as_index()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    let value = self
                        .slots
                        .get(idx)
                        .ok_or(VmError::InvalidVariableSlot(idx))?
                        .clone();
                    self.push(value)?;
                }
                OpCode::SetVar => {
                    let idx = inst
                        .operand
                        .as_index()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    if idx >= self.slots.len() {
                        return Err(VmError::InvalidVariableSlot(idx));
                    }
                    self.slots[idx] = self.pop()?;
                }
                OpCode::Add => {
                    // Right operand pops first
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    let result = match (lhs, rhs) {
                        (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                        (Value::Str(a), Value::Str(b)) => Value::Str(a + &b),
                        _ => Value::Null,
                    };
                    self.push(result)?;
                }
                OpCode::Sub => {
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    let result = match (lhs, rhs) {
                        (Value::Number(a), Value::Number(b)) => Value::Number(a - b),
                        _ => Value::Null,
                    };
                    self.push(result)?;
                }
                OpCode::Mul => {
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    let result = match (lhs, rhs) {
                        (Value::Number(a), Value::Number(b)) => Value::Number(a * b),
                        _ => Value::Null,
                    };
                    self.push(result)?;
                }
                OpCode::Div => {
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    let result = match (lhs, rhs) {
                        (Value::Number(_), Value::Number(b)) if b == 0.0 => {
                            return Err(VmError::DivisionByZero)
                        }
                        (Value::Number(a), Value::Number(b)) => Value::Number(a / b),
                        _ => Value::Null,
                    };
                    self.push(result)?;
                }
                OpCode::Eq => {
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    let equal = match (lhs, rhs) {
                        (Value::Number(a), Value::Number(b)) => a == b,
                        (Value::Bool(a), Value::Bool(b)) => a == b,
                        (Value::Str(a), Value::Str(b)) => a == b,
                        _ => false,
                    };
                    self.push(Value::Bool(equal))?;
                }
                OpCode::Jump => {
                    pc = inst
                        .operand
                        .as_index()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    continue;
                }
                OpCode::JumpIf => {
                    let target = inst
                        .operand
                        .as_index()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    // Non-Bool conditions count as false
                    if matches!(self.pop()?, Value::Bool(true)) {
                        pc = target;
                        continue;
                    }
                }
                OpCode::JumpIfNot => {
                    let target = inst
                        .operand
                        .as_index()
                        .ok_or(VmError::MalformedInstruction(pc))?;
                    if !matches!(self.pop()?, Value::Bool(true)) {
                        pc = target;
                        continue;
                    }
                }
                OpCode::Halt => {
                    return Ok(self.stack.pop().unwrap_or(Value::Null));
                }
                OpCode::Nop => {}
                other => return Err(VmError::UnsupportedOpcode(other)),
            }
            pc += 1;
        }

        // Walked past the last instruction without HALT
        Ok(Value::Null)
    }

    fn push(&mut self, value: Value) -> Result<(), VmError> {
        if self.stack.len() >= STACK_MAX {
            return Err(VmError::StackOverflow);
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, VmError> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
