//! IPPcode22 execution engine.
//!
//! The machine has:
//! - a global frame, an optional temporary frame and a stack of local frames
//! - a data stack for the stack-form instructions
//! - a call stack of return points for CALL and RETURN
//! - a label table built once before the run
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{FrameTag, Instruction, Opcode, Operand, Program, Value, VarRef};
//! use ippcode_vm::run;
//!
//! let x = VarRef::new(FrameTag::Global, "x");
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::DefVar, 1, vec![Operand::variable(1, x.clone())]),
//!     Instruction::new(
//!         Opcode::Add,
//!         2,
//!         vec![
//!             Operand::variable(1, x.clone()),
//!             Operand::literal(2, "5", Value::Int(5)),
//!             Operand::literal(3, "3", Value::Int(3)),
//!         ],
//!     ),
//!     Instruction::new(Opcode::Write, 3, vec![Operand::variable(1, x)]),
//! ])
//! .unwrap();
//!
//! let mut input: &[u8] = b"";
//! let mut output = Vec::new();
//! let mut diagnostics = Vec::new();
//! let outcome = run(&program, &mut input, &mut output, &mut diagnostics).unwrap();
//! assert_eq!(output, b"8");
//! assert_eq!(outcome.exit_code, None);
//! ```

pub mod dispatch;
pub mod error;
pub mod execute;
pub mod frame;
pub mod machine;
pub mod ops;
pub mod stack;

pub use error::{Fault, RuntimeError, Site};
pub use frame::{Frame, FrameStore};
pub use machine::{CallRecord, Machine, Outcome};

use std::io::{BufRead, Write};

use ippcode_common::Program;

/// Execute a program to completion.
///
/// READ consumes lines from `input`, WRITE goes to `output`, and DPRINT
/// and BREAK go to `diagnostics`.
///
/// # Errors
///
/// Returns [`RuntimeError`] for the first failing instruction, or for a
/// duplicate label found before execution starts.
pub fn run<'a>(
    program: &'a Program,
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
    diagnostics: &'a mut dyn Write,
) -> Result<Outcome, RuntimeError> {
    let mut machine = Machine::new(program, input, output, diagnostics);
    machine.execute()
}
