//! Semantic errors found before execution.
//!
//! Every error carries the order number (`at`) of the instruction it was
//! found in. The verifier collects all of them, in program order.

use ippcode_common::{ArgKind, Opcode, VarRef};
use thiserror::Error;

/// A static semantic problem in a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    // --- Signature ---
    /// Wrong number of operands for the opcode.
    #[error("{} at order {at} takes {expected} operand(s), found {found}", .opcode.mnemonic())]
    ArityMismatch {
        at: u32,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// Operand kind not allowed in its slot.
    #[error(
        "{} at order {at}: operand {position} must be a {expected}, found {found}",
        .opcode.mnemonic()
    )]
    IncompatibleOperand {
        at: u32,
        opcode: Opcode,
        position: u8,
        expected: ArgKind,
        found: &'static str,
    },

    // --- Labels ---
    #[error("label {label} redefined at order {at}")]
    LabelRedefinition { at: u32, label: String },

    /// A jump or CALL names a label no LABEL instruction defines.
    #[error("undefined label {label} used at order {at}")]
    UndefinedLabel { at: u32, label: String },

    // --- Variables ---
    /// Second DEFVAR of the same global variable.
    #[error("variable {var} redefined at order {at}")]
    VariableRedefinition { at: u32, var: VarRef },
}

impl SemanticError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SemanticError::ArityMismatch { .. } => 32,
            SemanticError::IncompatibleOperand { .. }
            | SemanticError::LabelRedefinition { .. }
            | SemanticError::UndefinedLabel { .. }
            | SemanticError::VariableRedefinition { .. } => 52,
        }
    }

    /// Order number of the instruction the error was found in.
    pub fn order(&self) -> u32 {
        match self {
            SemanticError::ArityMismatch { at, .. }
            | SemanticError::IncompatibleOperand { at, .. }
            | SemanticError::LabelRedefinition { at, .. }
            | SemanticError::UndefinedLabel { at, .. }
            | SemanticError::VariableRedefinition { at, .. } => *at,
        }
    }
}
