//! Label definitions and jump targets.

use ippcode_common::{Instruction, Opcode};

use crate::context::ScanContext;
use crate::error::SemanticError;

/// Record a LABEL definition or a jump target.
pub fn record_label(instr: &Instruction, ctx: &mut ScanContext, errors: &mut Vec<SemanticError>) {
    let Some(label) = instr.label_operand() else {
        return;
    };

    if instr.opcode == Opcode::Label {
        if ctx.is_defined(label) {
            errors.push(SemanticError::LabelRedefinition {
                at: instr.order,
                label: label.to_string(),
            });
        } else {
            ctx.labels.insert(label.to_string(), instr.order);
        }
    } else {
        ctx.jumps.push((instr.order, label.to_string()));
    }
}

/// Every recorded jump target must name a defined label.
pub fn check_targets(ctx: &ScanContext) -> Vec<SemanticError> {
    ctx.jumps
        .iter()
        .filter(|(_, label)| !ctx.is_defined(label))
        .map(|(at, label)| SemanticError::UndefinedLabel {
            at: *at,
            label: label.clone(),
        })
        .collect()
}
