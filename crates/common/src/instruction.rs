//! A single IPPcode22 instruction record.

use std::fmt;

use crate::opcode::{OpClass, Opcode};
use crate::operand::Operand;

/// An instruction as handed over by the loader.
///
/// Immutable once the [`Program`](crate::Program) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Position in program sequence. Positive and unique within a program.
    pub order: u32,
    /// Arguments, ordered by their 1-based position.
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: Opcode, order: u32, operands: Vec<Operand>) -> Self {
        Self {
            opcode,
            order,
            operands,
        }
    }

    pub fn class(&self) -> OpClass {
        self.opcode.class()
    }

    /// Operand at the 1-based `position`, if present.
    pub fn operand(&self, position: u8) -> Option<&Operand> {
        self.operands.iter().find(|op| op.position == position)
    }

    /// The label this instruction defines or jumps to, if any.
    pub fn label_operand(&self) -> Option<&str> {
        if self.opcode == Opcode::Label || self.opcode.is_jump() {
            self.operand(1).and_then(Operand::as_label)
        } else {
            None
        }
    }
}

/// Renders the instruction as it would appear in source: `ADD GF@x GF@x int@1`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for op in &self.operands {
            write!(f, " {op}")?;
        }
        Ok(())
    }
}
