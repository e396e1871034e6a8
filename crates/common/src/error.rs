//! Errors raised while building the shared program model.

use thiserror::Error;

use crate::value::DataType;

/// Process exit code for malformed program structure.
pub const EXIT_BAD_STRUCTURE: i32 = 32;

/// Process exit code for internal invariant violations.
pub const EXIT_INTERNAL: i32 = 99;

/// Structural problems in an instruction sequence.
///
/// These are the checks an external loader performs before handing the
/// sequence to the interpreter: order numbers and operand numbering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// Order numbers start at 1.
    #[error("instruction {opcode} has order 0 (orders must be positive)")]
    ZeroOrder { opcode: &'static str },

    /// Two instructions share one order number.
    #[error("duplicate order {order} (instructions {first} and {second})")]
    DuplicateOrder {
        order: u32,
        first: &'static str,
        second: &'static str,
    },

    /// Operand positions are not the sequence 1..N.
    #[error("{opcode} (order {order}): operand at slot {found} where slot {expected} was expected")]
    OperandNumbering {
        opcode: &'static str,
        order: u32,
        expected: usize,
        found: u8,
    },
}

impl ProgramError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        EXIT_BAD_STRUCTURE
    }
}

/// A value whose payload disagrees with its declared kind.
///
/// Signals a bug in the interpreter, never a user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal error: cannot store {found} payload in a value of type {expected}")]
pub struct InternalError {
    pub expected: DataType,
    pub found: DataType,
}

impl InternalError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        EXIT_INTERNAL
    }
}
