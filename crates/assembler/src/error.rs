//! Error types for the IPPcode22 loader.

use ippcode_common::ProgramError;
use thiserror::Error;

/// Errors produced while loading source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first non-empty line is not `.IPPcode22`.
    #[error("line {line}: expected the .IPPcode22 header")]
    MissingHeader { line: usize },

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// A token is not a well-formed operand for its slot.
    #[error("line {line}: invalid operand '{token}'")]
    InvalidOperand { line: usize, token: String },

    #[error("line {line}: {opcode} expects {expected} operand(s), found {found}")]
    OperandCount {
        line: usize,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Program(#[from] ProgramError),
}

impl AsmError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AsmError::MissingHeader { .. } => 21,
            AsmError::UnknownOpcode { .. } => 22,
            AsmError::InvalidOperand { .. } | AsmError::OperandCount { .. } => 23,
            AsmError::Program(e) => e.exit_code(),
        }
    }
}
