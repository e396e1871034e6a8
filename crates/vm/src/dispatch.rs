//! Static opcode to handler table.

use ippcode_common::{Instruction, Opcode};

use crate::error::Fault;
use crate::machine::Machine;
use crate::ops;

/// An instruction implementation.
pub type Handler<'a> = fn(&mut Machine<'a>, &Instruction) -> Result<(), Fault>;

/// Returns the implementation bound to `opcode`.
pub fn handler<'a>(opcode: Opcode) -> Handler<'a> {
    match opcode {
        // Frames and calls
        Opcode::Move => Machine::exec_move,
        Opcode::CreateFrame => Machine::exec_createframe,
        Opcode::PushFrame => Machine::exec_pushframe,
        Opcode::PopFrame => Machine::exec_popframe,
        Opcode::DefVar => Machine::exec_defvar,
        Opcode::Call => Machine::exec_call,
        Opcode::Return => Machine::exec_return,

        // Data stack
        Opcode::Pushs => Machine::exec_pushs,
        Opcode::Pops => Machine::exec_pops,
        Opcode::Clears => Machine::exec_clears,

        // Arithmetic
        Opcode::Add => |m, i| m.binary(i, ops::add),
        Opcode::Sub => |m, i| m.binary(i, ops::sub),
        Opcode::Mul => |m, i| m.binary(i, ops::mul),
        Opcode::Div => |m, i| m.binary(i, ops::div),
        Opcode::IDiv => |m, i| m.binary(i, ops::idiv),
        Opcode::Adds => |m, _| m.binary_stack(ops::add),
        Opcode::Subs => |m, _| m.binary_stack(ops::sub),
        Opcode::Muls => |m, _| m.binary_stack(ops::mul),
        Opcode::Divs => |m, _| m.binary_stack(ops::div),
        Opcode::IDivs => |m, _| m.binary_stack(ops::idiv),

        // Comparison
        Opcode::Lt => |m, i| m.binary(i, ops::lt),
        Opcode::Gt => |m, i| m.binary(i, ops::gt),
        Opcode::Eq => |m, i| m.binary(i, ops::eq),
        Opcode::Lts => |m, _| m.binary_stack(ops::lt),
        Opcode::Gts => |m, _| m.binary_stack(ops::gt),
        Opcode::Eqs => |m, _| m.binary_stack(ops::eq),

        // Logic
        Opcode::And => |m, i| m.binary(i, ops::and),
        Opcode::Or => |m, i| m.binary(i, ops::or),
        Opcode::Not => |m, i| m.unary(i, ops::not),
        Opcode::Ands => |m, _| m.binary_stack(ops::and),
        Opcode::Ors => |m, _| m.binary_stack(ops::or),
        Opcode::Nots => |m, _| m.unary_stack(ops::not),

        // Conversion
        Opcode::Int2Char => |m, i| m.unary(i, ops::int2char),
        Opcode::Stri2Int => |m, i| m.binary(i, ops::stri2int),
        Opcode::Int2Float => |m, i| m.unary(i, ops::int2float),
        Opcode::Float2Int => |m, i| m.unary(i, ops::float2int),
        Opcode::Int2Chars => |m, _| m.unary_stack(ops::int2char),
        Opcode::Stri2Ints => |m, _| m.binary_stack(ops::stri2int),
        Opcode::Int2Floats => |m, _| m.unary_stack(ops::int2float),
        Opcode::Float2Ints => |m, _| m.unary_stack(ops::float2int),

        // I/O
        Opcode::Read => Machine::exec_read,
        Opcode::Write => Machine::exec_write,

        // Strings
        Opcode::Concat => |m, i| m.binary(i, ops::concat),
        Opcode::Strlen => |m, i| m.unary(i, ops::strlen),
        Opcode::GetChar => |m, i| m.binary(i, ops::getchar),
        Opcode::SetChar => Machine::exec_setchar,

        Opcode::Type => Machine::exec_type,

        // Control flow
        Opcode::Label | Opcode::Nop => |_, _| Ok(()),
        Opcode::Jump => Machine::exec_jump,
        Opcode::JumpIfEq => |m, i| m.conditional_jump(i, true),
        Opcode::JumpIfNeq => |m, i| m.conditional_jump(i, false),
        Opcode::JumpIfEqs => |m, i| m.conditional_jump_stack(i, true),
        Opcode::JumpIfNeqs => |m, i| m.conditional_jump_stack(i, false),
        Opcode::Exit => Machine::exec_exit,

        // Debugging
        Opcode::DPrint => Machine::exec_dprint,
        Opcode::Break => Machine::exec_break,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippcode_common::{Operand, Program, Value};

    #[test]
    fn nop_handler_succeeds() {
        let program = Program::new(vec![]).unwrap();
        let mut input: &[u8] = b"";
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let mut machine = Machine::new(&program, &mut input, &mut out, &mut diag);
        let nop = Instruction::new(Opcode::Nop, 1, vec![]);
        assert_eq!(handler(Opcode::Nop)(&mut machine, &nop), Ok(()));
        assert_eq!(machine.pc, None);
    }

    #[test]
    fn label_handler_is_a_no_op() {
        let program = Program::new(vec![]).unwrap();
        let mut input: &[u8] = b"";
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let mut machine = Machine::new(&program, &mut input, &mut out, &mut diag);
        let label = Instruction::new(Opcode::Label, 1, vec![Operand::label(1, "x")]);
        assert_eq!(handler(Opcode::Label)(&mut machine, &label), Ok(()));
        assert!(out.is_empty());
    }

    #[test]
    fn stack_handler_uses_data_stack() {
        let program = Program::new(vec![]).unwrap();
        let mut input: &[u8] = b"";
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let mut machine = Machine::new(&program, &mut input, &mut out, &mut diag);
        machine.data_stack.push(Value::Int(7));
        machine.data_stack.push(Value::Int(2));
        let subs = Instruction::new(Opcode::Subs, 1, vec![]);
        handler(Opcode::Subs)(&mut machine, &subs).unwrap();
        assert_eq!(machine.data_stack.pop(), Ok(Value::Int(5)));
    }
}
