//! Execution context and run loop.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use ippcode_common::{Instruction, OpClass, Opcode, Program, Value};
use tracing::{debug, trace};

use crate::dispatch;
use crate::error::{Fault, RuntimeError};
use crate::frame::FrameStore;
use crate::stack::Stack;

/// What CALL saves and RETURN restores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// Instruction index to resume at.
    pub return_to: usize,
    /// Function that was executing at the CALL.
    pub function: Option<String>,
}

/// Result of a run that finished without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Code set by EXIT, if the program executed one.
    pub exit_code: Option<u8>,
    /// Number of executed instructions, not counting DPRINT and BREAK.
    pub executed: u64,
}

fn empty_call_stack() -> Fault {
    Fault::missing("call stack is empty")
}

fn empty_data_stack() -> Fault {
    Fault::missing("data stack is empty")
}

/// The IPPcode22 execution engine.
///
/// Idle while `pc` is `None`, running otherwise.
pub struct Machine<'a> {
    pub(crate) program: &'a Program,
    pub(crate) frames: FrameStore,
    pub(crate) data_stack: Stack<Value>,
    pub(crate) call_stack: Stack<CallRecord>,
    /// Index of the next instruction to execute.
    pub(crate) pc: Option<usize>,
    labels: HashMap<String, usize>,
    /// Index of the instruction being executed, for diagnostics.
    pub(crate) current: Option<usize>,
    pub(crate) function: Option<String>,
    pub(crate) input: &'a mut dyn BufRead,
    pub(crate) output: &'a mut dyn Write,
    pub(crate) diagnostics: &'a mut dyn Write,
    pub(crate) exit_code: Option<u8>,
    pub(crate) executed: u64,
}

impl<'a> Machine<'a> {
    pub fn new(
        program: &'a Program,
        input: &'a mut dyn BufRead,
        output: &'a mut dyn Write,
        diagnostics: &'a mut dyn Write,
    ) -> Self {
        Self {
            program,
            frames: FrameStore::new(),
            data_stack: Stack::new(empty_data_stack),
            call_stack: Stack::new(empty_call_stack),
            pc: None,
            labels: HashMap::new(),
            current: None,
            function: None,
            input,
            output,
            diagnostics,
            exit_code: None,
            executed: 0,
        }
    }

    /// Build the label table in one pass over the program.
    ///
    /// Each label maps to the index of the instruction after its LABEL.
    pub fn map_labels(&mut self) -> Result<(), RuntimeError> {
        self.labels.clear();
        let program = self.program;
        for (index, instr) in program.instructions().iter().enumerate() {
            if instr.opcode != Opcode::Label {
                continue;
            }
            let name = instr.label_operand().ok_or_else(|| {
                RuntimeError::at(
                    Fault::Operand {
                        position: 1,
                        expected: "label",
                    },
                    instr,
                )
            })?;
            if self.labels.insert(name.to_string(), index + 1).is_some() {
                let fault = Fault::LabelRedefinition {
                    label: name.to_string(),
                };
                return Err(RuntimeError::at(fault, instr));
            }
        }
        debug!(labels = self.labels.len(), "labels mapped");
        Ok(())
    }

    /// Instruction index a jump to `label` continues at.
    pub fn label_target(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    /// Return to the initial state, positioned at the first instruction.
    pub fn reset(&mut self) {
        self.frames = FrameStore::new();
        self.data_stack.clear();
        self.call_stack.clear();
        self.pc = if self.program.is_empty() { None } else { Some(0) };
        self.current = None;
        self.function = None;
        self.exit_code = None;
        self.executed = 0;
    }

    /// Map labels, reset, and run until the program halts or fails.
    pub fn execute(&mut self) -> Result<Outcome, RuntimeError> {
        self.map_labels()?;
        self.reset();
        debug!(instructions = self.program.len(), "run started");

        while let Some(index) = self.pc {
            self.step(index)?;
        }

        debug!(
            executed = self.executed,
            exit_code = ?self.exit_code,
            "run finished"
        );
        Ok(self.outcome())
    }

    fn step(&mut self, index: usize) -> Result<(), RuntimeError> {
        let program = self.program;
        let Some(instr) = program.get(index) else {
            self.pc = None;
            return Ok(());
        };

        self.current = Some(index);
        // Jumps overwrite this, so they skip the generic advance.
        self.pc = Some(index + 1);
        trace!(index, order = instr.order, instruction = %instr, "execute");

        let handler = dispatch::handler(instr.opcode);
        handler(self, instr).map_err(|fault| RuntimeError::at(fault, instr))?;

        if instr.class() != OpClass::Debug {
            self.executed += 1;
        }
        if matches!(self.pc, Some(next) if next >= program.len()) {
            self.pc = None;
        }
        Ok(())
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            exit_code: self.exit_code,
            executed: self.executed,
        }
    }

    /// The instruction being executed, or the last one executed.
    pub fn current_instruction(&self) -> Option<&'a Instruction> {
        let program = self.program;
        self.current.and_then(|i| program.get(i))
    }

    pub fn current_function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    /// Values on the data stack, bottom first.
    pub fn data_stack(&self) -> impl Iterator<Item = &Value> {
        self.data_stack.iter()
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn is_running(&self) -> bool {
        self.pc.is_some()
    }

    // ---- Helpers shared by the instruction handlers ----

    pub(crate) fn jump(&mut self, label: &str) -> Result<(), Fault> {
        let target = self
            .label_target(label)
            .ok_or_else(|| Fault::UndefinedLabel {
                label: label.to_string(),
            })?;
        self.pc = Some(target);
        Ok(())
    }

    pub(crate) fn emit(&mut self, text: &str) -> Result<(), Fault> {
        self.output
            .write_all(text.as_bytes())
            .map_err(|e| Fault::Output {
                message: e.to_string(),
            })
    }

    pub(crate) fn emit_diagnostic(&mut self, text: &str) -> Result<(), Fault> {
        self.diagnostics
            .write_all(text.as_bytes())
            .map_err(|e| Fault::Output {
                message: e.to_string(),
            })
    }

    /// Next raw input line without its terminator, or `None` at end of input.
    pub(crate) fn read_line(&mut self) -> Result<Option<Vec<u8>>, Fault> {
        let mut line = Vec::new();
        let n = self
            .input
            .read_until(b'\n', &mut line)
            .map_err(|e| Fault::Input {
                message: e.to_string(),
            })?;
        if n == 0 {
            return Ok(None);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
