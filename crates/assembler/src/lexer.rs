//! Tokenizer for IPPcode22 source text.

use ippcode_common::{DataType, FrameTag, VarRef};

use crate::error::AsmError;

/// The language header every source must start with.
pub(crate) const HEADER: &str = ".IPPcode22";

/// A single token from a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// The `.IPPcode22` header, in any letter case.
    Header,
    /// `GF@name`, `LF@name` or `TF@name`.
    Var(VarRef),
    /// `type@text`, with the text still undecoded.
    Literal { kind: DataType, text: String },
    /// A bare word: opcode mnemonic, label or type name.
    Ident(String),
}

/// Whether `text` is a valid variable or label name.
pub(crate) fn is_identifier(text: &str) -> bool {
    const SPECIAL: &[char] = &['_', '-', '$', '&', '%', '*', '!', '?'];
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || SPECIAL.contains(&c) => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || SPECIAL.contains(&c))
}

/// Tokenize a single source line.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `#` and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    line.split_whitespace()
        .map(|word| classify(word, line_num))
        .collect()
}

fn classify(word: &str, line_num: usize) -> Result<Token, AsmError> {
    if word.eq_ignore_ascii_case(HEADER) {
        return Ok(Token::Header);
    }

    let Some((prefix, rest)) = word.split_once('@') else {
        return Ok(Token::Ident(word.to_string()));
    };

    let invalid = || AsmError::InvalidOperand {
        line: line_num,
        token: word.to_string(),
    };

    if let Some(frame) = FrameTag::from_prefix(prefix) {
        if !is_identifier(rest) {
            return Err(invalid());
        }
        return Ok(Token::Var(VarRef::new(frame, rest)));
    }

    let kind = DataType::from_name(prefix).ok_or_else(invalid)?;
    Ok(Token::Literal {
        kind,
        text: rest.to_string(),
    })
}
