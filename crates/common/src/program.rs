//! Program representation: an order-sorted, structurally checked
//! instruction sequence.

use crate::error::ProgramError;
use crate::instruction::Instruction;

/// An IPPcode22 program ready for static checking and execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Build a program from instruction records in any order.
    ///
    /// Instructions are sorted by their order number. Fails if an order is
    /// zero, two instructions share an order, or an instruction's operand
    /// positions are not exactly `1..=N`.
    pub fn new(mut instructions: Vec<Instruction>) -> Result<Self, ProgramError> {
        for instr in &mut instructions {
            if instr.order == 0 {
                return Err(ProgramError::ZeroOrder {
                    opcode: instr.opcode.mnemonic(),
                });
            }
            instr.operands.sort_by_key(|op| op.position);
            check_operand_numbering(instr)?;
        }

        instructions.sort_by_key(|instr| instr.order);
        for pair in instructions.windows(2) {
            if pair[0].order == pair[1].order {
                return Err(ProgramError::DuplicateOrder {
                    order: pair[0].order,
                    first: pair[0].opcode.mnemonic(),
                    second: pair[1].opcode.mnemonic(),
                });
            }
        }

        Ok(Self { instructions })
    }

    /// The instructions, in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

fn check_operand_numbering(instr: &Instruction) -> Result<(), ProgramError> {
    for (i, op) in instr.operands.iter().enumerate() {
        let expected = i + 1;
        if usize::from(op.position) != expected {
            return Err(ProgramError::OperandNumbering {
                opcode: instr.opcode.mnemonic(),
                order: instr.order,
                expected,
                found: op.position,
            });
        }
    }
    Ok(())
}
