//! Operand count and operand kind checks against the opcode signatures.

use ippcode_common::Instruction;

use crate::error::SemanticError;

/// Check one instruction's operands against its opcode signature.
///
/// An arity mismatch is reported alone; kinds are only compared when the
/// count is right. Returns `true` when the instruction is well formed, so
/// later checks may rely on its operands.
pub fn check_signature(instr: &Instruction, errors: &mut Vec<SemanticError>) -> bool {
    let signature = instr.opcode.signature();
    if instr.operands.len() != signature.len() {
        errors.push(SemanticError::ArityMismatch {
            at: instr.order,
            opcode: instr.opcode,
            expected: signature.len(),
            found: instr.operands.len(),
        });
        return false;
    }

    let mut ok = true;
    for (operand, expected) in instr.operands.iter().zip(signature) {
        if !expected.accepts(operand) {
            errors.push(SemanticError::IncompatibleOperand {
                at: instr.order,
                opcode: instr.opcode,
                position: operand.position,
                expected: *expected,
                found: operand.describe(),
            });
            ok = false;
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippcode_common::{ArgKind, FrameTag, Opcode, Operand, Value, VarRef};

    fn gf(position: u8, name: &str) -> Operand {
        Operand::variable(position, VarRef::new(FrameTag::Global, name))
    }

    #[test]
    fn well_formed_instruction_passes() {
        let instr = Instruction::new(
            Opcode::Move,
            1,
            vec![gf(1, "x"), Operand::literal(2, "1", Value::Int(1))],
        );
        let mut errors = Vec::new();
        assert!(check_signature(&instr, &mut errors));
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_operand_is_arity_mismatch() {
        let instr = Instruction::new(Opcode::Add, 4, vec![gf(1, "x"), gf(2, "y")]);
        let mut errors = Vec::new();
        assert!(!check_signature(&instr, &mut errors));
        assert_eq!(
            errors,
            vec![SemanticError::ArityMismatch {
                at: 4,
                opcode: Opcode::Add,
                expected: 3,
                found: 2,
            }]
        );
    }

    #[test]
    fn literal_in_var_slot_is_incompatible() {
        let instr = Instruction::new(
            Opcode::Move,
            2,
            vec![
                Operand::literal(1, "5", Value::Int(5)),
                Operand::literal(2, "1", Value::Int(1)),
            ],
        );
        let mut errors = Vec::new();
        assert!(!check_signature(&instr, &mut errors));
        assert_eq!(
            errors,
            vec![SemanticError::IncompatibleOperand {
                at: 2,
                opcode: Opcode::Move,
                position: 1,
                expected: ArgKind::Var,
                found: "int",
            }]
        );
    }

    #[test]
    fn every_bad_slot_is_reported() {
        let instr = Instruction::new(
            Opcode::JumpIfEq,
            3,
            vec![gf(1, "x"), Operand::label(2, "l"), gf(3, "y")],
        );
        let mut errors = Vec::new();
        check_signature(&instr, &mut errors);
        assert_eq!(errors.len(), 2);
    }
}
