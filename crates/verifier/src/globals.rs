//! Global variable declarations.
//!
//! Only GF declarations are tracked here. LF and TF contents depend on
//! which frames exist at run time, so their redefinition is left to the
//! execution engine.

use ippcode_common::{FrameTag, Instruction};

use crate::context::ScanContext;
use crate::error::SemanticError;

pub fn record_global(instr: &Instruction, ctx: &mut ScanContext, errors: &mut Vec<SemanticError>) {
    if !instr.opcode.declares_variable() {
        return;
    }
    let Some(var) = instr.operand(1).and_then(|op| op.as_var()) else {
        return;
    };
    if var.frame != FrameTag::Global {
        return;
    }
    if !ctx.globals.insert(var.clone()) {
        errors.push(SemanticError::VariableRedefinition {
            at: instr.order,
            var: var.clone(),
        });
    }
}
