//! Runtime errors for the IPPcode22 execution engine.
//!
//! Handlers fail with a [`Fault`]. The run loop wraps it into a
//! [`RuntimeError`] that also names the instruction being executed.

use std::fmt;

use ippcode_common::{FrameTag, InternalError, Instruction, Opcode, VarRef};
use thiserror::Error;

/// What went wrong while executing an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Operand kinds the operation is not defined for.
    #[error("bad operand types for {operation}: {found}")]
    BadTypes {
        operation: &'static str,
        found: String,
    },

    /// Variable was never declared in its frame.
    #[error("variable {var} does not exist")]
    VarNotExists { var: VarRef },

    /// The addressed frame is not currently defined.
    #[error("frame {frame} does not exist")]
    FrameNotExists { frame: FrameTag },

    /// Read of an uninitialized variable or pop of an empty stack.
    #[error("missing value: {what}")]
    MissingValue { what: String },

    /// Operand has the right type but an unusable value.
    #[error("bad operand value: {reason}")]
    BadValue { reason: String },

    /// String index out of range or empty replacement string.
    #[error("invalid string operation: {reason}")]
    InvalidStringOp { reason: String },

    /// Two LABEL instructions share a name.
    #[error("label {label} is defined more than once")]
    LabelRedefinition { label: String },

    /// Jump to a label no LABEL instruction defines.
    #[error("label {label} is not defined")]
    UndefinedLabel { label: String },

    /// DEFVAR of a name that already exists in its frame.
    #[error("variable {var} is already defined")]
    VariableRedefinition { var: VarRef },

    /// Operand slot missing or of the wrong kind.
    #[error("operand {position} must be a {expected}")]
    Operand {
        position: u8,
        expected: &'static str,
    },

    /// Reading standard input failed.
    #[error("cannot read input: {message}")]
    Input { message: String },

    /// Writing program output failed.
    #[error("cannot write output: {message}")]
    Output { message: String },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Fault {
    /// Process exit code for this fault.
    pub fn exit_code(&self) -> i32 {
        match self {
            Fault::Input { .. } => 11,
            Fault::Output { .. } => 12,
            Fault::Operand { .. } => 32,
            Fault::LabelRedefinition { .. }
            | Fault::UndefinedLabel { .. }
            | Fault::VariableRedefinition { .. } => 52,
            Fault::BadTypes { .. } => 53,
            Fault::VarNotExists { .. } => 54,
            Fault::FrameNotExists { .. } => 55,
            Fault::MissingValue { .. } => 56,
            Fault::BadValue { .. } => 57,
            Fault::InvalidStringOp { .. } => 58,
            Fault::Internal(e) => e.exit_code(),
        }
    }

    pub(crate) fn bad_value(reason: impl Into<String>) -> Self {
        Fault::BadValue {
            reason: reason.into(),
        }
    }

    pub(crate) fn string_op(reason: impl Into<String>) -> Self {
        Fault::InvalidStringOp {
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Fault::MissingValue { what: what.into() }
    }
}

/// The instruction a runtime error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub opcode: Opcode,
    pub order: u32,
}

impl Site {
    pub fn of(instr: &Instruction) -> Self {
        Self {
            opcode: instr.opcode,
            order: instr.order,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (order {})", self.opcode.mnemonic(), self.order)
    }
}

/// An error that aborted a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{fault}", site_prefix(.site))]
pub struct RuntimeError {
    pub fault: Fault,
    /// `None` when the error was raised outside any instruction.
    pub site: Option<Site>,
}

fn site_prefix(site: &Option<Site>) -> String {
    match site {
        Some(site) => format!("{site}: "),
        None => String::new(),
    }
}

impl RuntimeError {
    pub fn at(fault: Fault, instr: &Instruction) -> Self {
        Self {
            fault,
            site: Some(Site::of(instr)),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.fault.exit_code()
    }
}

impl From<Fault> for RuntimeError {
    fn from(fault: Fault) -> Self {
        Self { fault, site: None }
    }
}
