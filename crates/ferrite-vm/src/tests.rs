//! Unit tests for the VM crate

mod arithmetic;
mod control_flow;
mod properties;
mod variables;

mod helpers {
    use crate::program::Program;
    use crate::value::Value;
    use crate::vm::Vm;
    use crate::VmError;

    /// Validate and execute a program in a fresh VM
    pub fn run(program: &Program) -> Result<Value, VmError> {
        program.validate().expect("test program must validate");
        Vm::new().execute(program)
    }
}
