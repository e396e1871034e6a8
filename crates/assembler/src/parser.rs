//! Parser for IPPcode22 tokens to instructions.
//!
//! Each opcode's signature decides how its operand tokens are read: a bare
//! word is a label in a label slot and a type name in a type slot.

use ippcode_common::{literal, ArgKind, DataType, Instruction, Opcode, Operand};

use crate::error::AsmError;
use crate::lexer::{is_identifier, Token};

/// Parse the tokens of one non-empty line into an instruction with the
/// given order number.
pub(crate) fn parse_line(
    tokens: &[Token],
    line_num: usize,
    order: u32,
) -> Result<Instruction, AsmError> {
    let (first, args) = match tokens.split_first() {
        Some(split) => split,
        None => {
            return Err(AsmError::UnknownOpcode {
                line: line_num,
                token: String::new(),
            })
        }
    };

    let opcode = match first {
        Token::Ident(word) => Opcode::from_mnemonic(word),
        _ => None,
    }
    .ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: describe(first),
    })?;

    let signature = opcode.signature();
    if args.len() != signature.len() {
        return Err(AsmError::OperandCount {
            line: line_num,
            opcode: opcode.mnemonic(),
            expected: signature.len(),
            found: args.len(),
        });
    }

    let operands = args
        .iter()
        .zip(signature)
        .enumerate()
        .map(|(i, (token, kind))| parse_operand(token, *kind, (i + 1) as u8, line_num))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Instruction::new(opcode, order, operands))
}

fn parse_operand(
    token: &Token,
    kind: ArgKind,
    position: u8,
    line_num: usize,
) -> Result<Operand, AsmError> {
    let operand = match (kind, token) {
        (ArgKind::Var | ArgKind::Symb, Token::Var(var)) => {
            Some(Operand::variable(position, var.clone()))
        }
        (ArgKind::Symb, Token::Literal { kind, text }) => {
            parse_literal_operand(*kind, text, position)
        }
        (ArgKind::Literal(want), Token::Literal { kind, text }) if *kind == want => {
            parse_literal_operand(*kind, text, position)
        }
        (ArgKind::Label, Token::Ident(name)) if is_identifier(name) => {
            Some(Operand::label(position, name.as_str()))
        }
        (ArgKind::Type, Token::Ident(name)) => {
            DataType::from_name(name).map(|ty| Operand::type_name(position, ty))
        }
        _ => None,
    };

    operand.ok_or_else(|| AsmError::InvalidOperand {
        line: line_num,
        token: describe(token),
    })
}

fn parse_literal_operand(kind: DataType, text: &str, position: u8) -> Option<Operand> {
    let value = literal::parse_literal(kind, text)?;
    Some(Operand::literal(position, text, value))
}

/// The token as it appeared in the source, for diagnostics.
fn describe(token: &Token) -> String {
    match token {
        Token::Header => crate::lexer::HEADER.to_string(),
        Token::Var(var) => var.to_string(),
        Token::Literal { kind, text } => format!("{kind}@{text}"),
        Token::Ident(word) => word.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_line;
    use ippcode_common::{FrameTag, OperandKind, Value, VarRef};

    fn parse(line: &str) -> Result<Instruction, AsmError> {
        let tokens = tokenize_line(line, 1).unwrap();
        parse_line(&tokens, 1, 1)
    }

    #[test]
    fn three_address_instruction() {
        let instr = parse("ADD GF@x GF@x int@1").unwrap();
        assert_eq!(instr.opcode, Opcode::Add);
        assert_eq!(instr.operands.len(), 3);
        assert_eq!(
            instr.operand(1).and_then(Operand::as_var),
            Some(&VarRef::new(FrameTag::Global, "x"))
        );
        assert_eq!(
            instr.operand(3).map(|op| &op.kind),
            Some(&OperandKind::Literal(Value::Int(1)))
        );
    }

    #[test]
    fn mnemonic_is_case_insensitive() {
        assert_eq!(parse("createframe").unwrap().opcode, Opcode::CreateFrame);
    }

    #[test]
    fn string_escapes_decoded() {
        let instr = parse("WRITE string@a\\032b").unwrap();
        assert_eq!(
            instr.operand(1).map(|op| &op.kind),
            Some(&OperandKind::Literal(Value::Str("a b".into())))
        );
    }

    #[test]
    fn label_slot_reads_bare_word() {
        let instr = parse("JUMPIFEQ end GF@a nil@nil").unwrap();
        assert_eq!(instr.label_operand(), Some("end"));
    }

    #[test]
    fn type_slot_reads_type_name() {
        let instr = parse("READ GF@a float").unwrap();
        assert_eq!(
            instr.operand(2).map(|op| &op.kind),
            Some(&OperandKind::TypeName(DataType::Float))
        );
    }

    #[test]
    fn unknown_opcode() {
        assert!(matches!(
            parse("FOOBAR GF@x"),
            Err(AsmError::UnknownOpcode { token, .. }) if token == "FOOBAR"
        ));
    }

    #[test]
    fn operand_count_mismatch() {
        assert_eq!(
            parse("MOVE GF@x").unwrap_err(),
            AsmError::OperandCount {
                line: 1,
                opcode: "MOVE",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn literal_in_var_slot_is_invalid() {
        assert!(matches!(
            parse("DEFVAR int@1"),
            Err(AsmError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn malformed_literals_are_invalid() {
        for line in ["WRITE int@abc", "WRITE bool@yes", "WRITE nil@0", "WRITE string@\\1"] {
            assert!(
                matches!(parse(line), Err(AsmError::InvalidOperand { .. })),
                "{line} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_type_name_is_invalid() {
        assert!(parse("READ GF@a number").is_err());
    }
}
