//! IPPcode22 verifier: static semantic checks run before execution.
//!
//! The verifier makes one pass over the ordered program and never executes
//! anything. It collects every error, not just the first, in program order.
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{Instruction, Opcode, Operand, Program};
//! use ippcode_verifier::verify;
//!
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::Label, 1, vec![Operand::label(1, "top")]),
//!     Instruction::new(Opcode::Jump, 2, vec![Operand::label(1, "top")]),
//! ])
//! .unwrap();
//!
//! assert!(verify(&program).is_ok());
//! ```
//!
//! # Checks
//!
//! Per instruction, in order:
//! 1. **Signature**: operand count, then operand kinds
//! 2. **Labels**: duplicate LABEL, jump targets recorded
//! 3. **Globals**: duplicate DEFVAR of a GF variable
//!
//! After the scan, every recorded jump target must be defined.

pub mod context;
pub mod error;
pub mod globals;
pub mod labels;
pub mod signature;

pub use context::ScanContext;
pub use error::SemanticError;

use ippcode_common::Program;
use tracing::debug;

/// Verify a program.
///
/// Returns `Ok(())` if the program passes all checks, or every error
/// found. The first error decides the process exit code.
pub fn verify(program: &Program) -> Result<(), Vec<SemanticError>> {
    let mut ctx = ScanContext::new();
    let mut errors = Vec::new();

    for instr in program.instructions() {
        // Malformed operands would make the remaining checks meaningless.
        if !signature::check_signature(instr, &mut errors) {
            continue;
        }
        labels::record_label(instr, &mut ctx, &mut errors);
        globals::record_global(instr, &mut ctx, &mut errors);
    }
    errors.extend(labels::check_targets(&ctx));

    debug!(
        instructions = program.len(),
        labels = ctx.labels.len(),
        globals = ctx.globals.len(),
        errors = errors.len(),
        "verified"
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
