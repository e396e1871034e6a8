//! Instruction handlers.
//!
//! Every handler takes the machine and the instruction being executed.
//! Three-address forms read operands 2 and 3 and store into operand 1;
//! stack forms pop the right operand, then the left, and push the result.

use std::fmt::Write as _;

use ippcode_common::{DataType, Instruction, Operand, OperandKind, Value, VarRef};

use crate::error::Fault;
use crate::machine::{CallRecord, Machine};
use crate::ops;

fn operand<'i>(
    instr: &'i Instruction,
    position: u8,
    expected: &'static str,
) -> Result<&'i Operand, Fault> {
    instr
        .operand(position)
        .ok_or(Fault::Operand { position, expected })
}

fn variable(instr: &Instruction, position: u8) -> Result<&VarRef, Fault> {
    operand(instr, position, "var")?
        .as_var()
        .ok_or(Fault::Operand {
            position,
            expected: "var",
        })
}

fn label(instr: &Instruction) -> Result<&str, Fault> {
    operand(instr, 1, "label")?.as_label().ok_or(Fault::Operand {
        position: 1,
        expected: "label",
    })
}

impl<'a> Machine<'a> {
    // ---- Operand access ----

    /// Value of a variable or literal. `None` for an uninitialized
    /// variable when `allow_uninitialized` is set.
    fn lookup(&self, op: &Operand, allow_uninitialized: bool) -> Result<Option<Value>, Fault> {
        match &op.kind {
            OperandKind::Literal(value) => Ok(Some(value.clone())),
            OperandKind::Variable(var) => Ok(self
                .frames
                .read(var, allow_uninitialized)?
                .cloned()),
            OperandKind::Label(_) | OperandKind::TypeName(_) => Err(Fault::Operand {
                position: op.position,
                expected: "symb",
            }),
        }
    }

    /// Value of the symbol at `position`.
    pub(crate) fn symb(&self, instr: &Instruction, position: u8) -> Result<Value, Fault> {
        let op = operand(instr, position, "symb")?;
        self.lookup(op, false)?
            .ok_or_else(|| Fault::missing(format!("{op} is uninitialized")))
    }

    /// Store into the variable named by operand 1.
    pub(crate) fn assign(&mut self, instr: &Instruction, value: Value) -> Result<(), Fault> {
        let var = variable(instr, 1)?;
        self.frames.write(var, value)
    }

    // ---- Shared shapes ----

    pub(crate) fn unary(
        &mut self,
        instr: &Instruction,
        op: fn(Value) -> Result<Value, Fault>,
    ) -> Result<(), Fault> {
        let a = self.symb(instr, 2)?;
        let result = op(a)?;
        self.assign(instr, result)
    }

    pub(crate) fn binary(
        &mut self,
        instr: &Instruction,
        op: fn(Value, Value) -> Result<Value, Fault>,
    ) -> Result<(), Fault> {
        let a = self.symb(instr, 2)?;
        let b = self.symb(instr, 3)?;
        let result = op(a, b)?;
        self.assign(instr, result)
    }

    pub(crate) fn unary_stack(&mut self, op: fn(Value) -> Result<Value, Fault>) -> Result<(), Fault> {
        let a = self.data_stack.pop()?;
        let result = op(a)?;
        self.data_stack.push(result);
        Ok(())
    }

    pub(crate) fn binary_stack(
        &mut self,
        op: fn(Value, Value) -> Result<Value, Fault>,
    ) -> Result<(), Fault> {
        let b = self.data_stack.pop()?;
        let a = self.data_stack.pop()?;
        let result = op(a, b)?;
        self.data_stack.push(result);
        Ok(())
    }

    // ---- Frames and calls ----

    pub(crate) fn exec_move(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symb(instr, 2)?;
        self.assign(instr, value)
    }

    pub(crate) fn exec_createframe(&mut self, _instr: &Instruction) -> Result<(), Fault> {
        self.frames.create_temporary();
        Ok(())
    }

    pub(crate) fn exec_pushframe(&mut self, _instr: &Instruction) -> Result<(), Fault> {
        self.frames.push_temporary()
    }

    pub(crate) fn exec_popframe(&mut self, _instr: &Instruction) -> Result<(), Fault> {
        self.frames.pop_temporary()
    }

    pub(crate) fn exec_defvar(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let var = variable(instr, 1)?;
        self.frames.declare(var)
    }

    pub(crate) fn exec_call(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let target = label(instr)?;
        let record = CallRecord {
            return_to: self.pc.unwrap_or(self.program.len()),
            function: self.function.take(),
        };
        self.call_stack.push(record);
        self.jump(target)?;
        self.function = Some(target.to_string());
        Ok(())
    }

    pub(crate) fn exec_return(&mut self, _instr: &Instruction) -> Result<(), Fault> {
        let record = self.call_stack.pop()?;
        self.pc = Some(record.return_to);
        self.function = record.function;
        Ok(())
    }

    // ---- Data stack ----

    pub(crate) fn exec_pushs(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symb(instr, 1)?;
        self.data_stack.push(value);
        Ok(())
    }

    pub(crate) fn exec_pops(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.data_stack.pop()?;
        self.assign(instr, value)
    }

    pub(crate) fn exec_clears(&mut self, _instr: &Instruction) -> Result<(), Fault> {
        self.data_stack.clear();
        Ok(())
    }

    // ---- I/O ----

    pub(crate) fn exec_read(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let kind = match &operand(instr, 2, "type")?.kind {
            OperandKind::TypeName(DataType::Nil) => {
                return Err(Fault::bad_value("READ cannot read a nil value"))
            }
            OperandKind::TypeName(kind) => *kind,
            _ => {
                return Err(Fault::Operand {
                    position: 2,
                    expected: "type",
                })
            }
        };
        let value = match self.read_line()?.map(String::from_utf8) {
            Some(Ok(line)) => ops::parse_input(kind, &line),
            Some(Err(_)) | None => Value::Nil,
        };
        let value = match value {
            Value::Nil => Value::Nil,
            parsed => Value::checked(kind, parsed)?,
        };
        self.assign(instr, value)
    }

    pub(crate) fn exec_write(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symb(instr, 1)?;
        self.emit(&value.to_string())
    }

    // ---- Strings and introspection ----

    pub(crate) fn exec_setchar(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let var = variable(instr, 1)?;
        let target = self
            .frames
            .read(var, false)?
            .cloned()
            .ok_or_else(|| Fault::missing(format!("variable {var} is uninitialized")))?;
        let index = self.symb(instr, 2)?;
        let source = self.symb(instr, 3)?;
        let result = ops::setchar(target, index, source)?;
        self.assign(instr, result)
    }

    pub(crate) fn exec_type(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.lookup(operand(instr, 2, "symb")?, true)?;
        self.assign(instr, ops::type_name(value.as_ref()))
    }

    // ---- Control flow ----

    pub(crate) fn exec_jump(&mut self, instr: &Instruction) -> Result<(), Fault> {
        self.jump(label(instr)?)
    }

    /// JUMPIFEQ / JUMPIFNEQ: jump when equality of operands 2 and 3 is `when_equal`.
    pub(crate) fn conditional_jump(
        &mut self,
        instr: &Instruction,
        when_equal: bool,
    ) -> Result<(), Fault> {
        let target = label(instr)?;
        let a = self.symb(instr, 2)?;
        let b = self.symb(instr, 3)?;
        if ops::equals(&a, &b)? == when_equal {
            self.jump(target)?;
        }
        Ok(())
    }

    pub(crate) fn conditional_jump_stack(
        &mut self,
        instr: &Instruction,
        when_equal: bool,
    ) -> Result<(), Fault> {
        let target = label(instr)?;
        let b = self.data_stack.pop()?;
        let a = self.data_stack.pop()?;
        if ops::equals(&a, &b)? == when_equal {
            self.jump(target)?;
        }
        Ok(())
    }

    pub(crate) fn exec_exit(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let code = match self.symb(instr, 1)? {
            Value::Int(n) => u8::try_from(n)
                .ok()
                .filter(|code| *code <= 49)
                .ok_or_else(|| Fault::bad_value(format!("exit code {n} is outside 0..=49")))?,
            other => {
                return Err(Fault::BadTypes {
                    operation: "EXIT",
                    found: other.data_type().name().to_string(),
                })
            }
        };
        self.exit_code = Some(code);
        self.pc = None;
        Ok(())
    }

    // ---- Debugging ----

    pub(crate) fn exec_dprint(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let value = self.symb(instr, 1)?;
        self.emit_diagnostic(&value.to_string())
    }

    pub(crate) fn exec_break(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let report = self.state_report(instr);
        self.emit_diagnostic(&report)
    }

    /// Human-readable dump of the machine state for BREAK.
    fn state_report(&self, instr: &Instruction) -> String {
        use ippcode_common::FrameTag;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "BREAK at order {} (index {}), {} instructions executed",
            instr.order,
            self.current.unwrap_or_default(),
            self.executed
        );
        let _ = writeln!(
            out,
            "  function: {}",
            self.function.as_deref().unwrap_or("<main>")
        );
        for tag in [FrameTag::Global, FrameTag::Local, FrameTag::Temporary] {
            match self.frames.frame(tag) {
                Some(frame) => {
                    let _ = writeln!(out, "  {tag}: {frame}");
                }
                None => {
                    let _ = writeln!(out, "  {tag}: <undefined>");
                }
            }
        }
        let _ = writeln!(out, "  frame stack depth: {}", self.frames.depth());
        let _ = writeln!(out, "  call stack depth: {}", self.call_stack.len());
        let stack: Vec<String> = self
            .data_stack
            .iter()
            .map(|v| format!("{}@{v}", v.data_type()))
            .collect();
        let _ = writeln!(out, "  data stack: [{}]", stack.join(", "));
        out
    }
}
