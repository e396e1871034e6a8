//! IPPcode22 source loader.
//!
//! Turns assembly text into an ordered [`Program`]. The translation is
//! mechanical: one instruction per line, order numbers 1, 2, 3, ... in
//! source order.
//!
//! # Usage
//!
//! ```
//! use ippcode_assembler::assemble;
//!
//! let text = ".IPPcode22\nDEFVAR GF@x\nMOVE GF@x int@42\nWRITE GF@x\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 3);
//! assert_eq!(program.instructions()[2].to_string(), "WRITE GF@x");
//! ```
//!
//! # Syntax
//!
//! - the first non-empty line is `.IPPcode22` (any letter case)
//! - `#` starts a comment that runs to the end of the line
//! - operands are `GF@x`/`LF@x`/`TF@x` variables, `type@value` literals,
//!   and bare labels or type names where the opcode expects them

pub mod error;

mod lexer;
mod parser;

pub use error::AsmError;

use ippcode_common::Program;
use lexer::{tokenize_line, Token};
use parser::parse_line;

/// Load source text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut instructions = Vec::new();
    let mut seen_header = false;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        if tokens.is_empty() {
            continue;
        }

        if !seen_header {
            if tokens != [Token::Header] {
                return Err(AsmError::MissingHeader { line: line_num });
            }
            seen_header = true;
            continue;
        }

        let order = instructions.len() as u32 + 1;
        instructions.push(parse_line(&tokens, line_num, order)?);
    }

    if !seen_header {
        return Err(AsmError::MissingHeader { line: 1 });
    }

    Ok(Program::new(instructions)?)
}
