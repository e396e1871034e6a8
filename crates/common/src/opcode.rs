//! Opcode catalogue for the IPPcode22 instruction set.
//!
//! Every opcode has a fixed operand signature. The signature table is
//! what the static checker validates instructions against, and what the
//! source loader uses to tell labels from type names.

use crate::operand::ArgKind;

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and calls
    Move,
    CreateFrame,
    PushFrame,
    PopFrame,
    DefVar,
    Call,
    Return,

    // Data stack
    Pushs,
    Pops,
    Clears,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Adds,
    Subs,
    Muls,
    Divs,
    IDivs,

    // Comparison
    Lt,
    Gt,
    Eq,
    Lts,
    Gts,
    Eqs,

    // Logic
    And,
    Or,
    Not,
    Ands,
    Ors,
    Nots,

    // Conversion
    Int2Char,
    Stri2Int,
    Int2Float,
    Float2Int,
    Int2Chars,
    Stri2Ints,
    Int2Floats,
    Float2Ints,

    // I/O
    Read,
    Write,

    // Strings
    Concat,
    Strlen,
    GetChar,
    SetChar,

    // Introspection
    Type,

    // Control flow
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    JumpIfEqs,
    JumpIfNeqs,
    Exit,

    // Debugging
    DPrint,
    Break,

    Nop,
}

/// All opcodes, in definition order.
pub const ALL_OPCODES: [Opcode; 57] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Clears,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::IDiv,
    Opcode::Adds,
    Opcode::Subs,
    Opcode::Muls,
    Opcode::Divs,
    Opcode::IDivs,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::Lts,
    Opcode::Gts,
    Opcode::Eqs,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Ands,
    Opcode::Ors,
    Opcode::Nots,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Int2Float,
    Opcode::Float2Int,
    Opcode::Int2Chars,
    Opcode::Stri2Ints,
    Opcode::Int2Floats,
    Opcode::Float2Ints,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::JumpIfEqs,
    Opcode::JumpIfNeqs,
    Opcode::Exit,
    Opcode::DPrint,
    Opcode::Break,
    Opcode::Nop,
];

/// How the execution engine treats an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// Defines a jump target; a no-op when executed.
    Label,
    /// Side-channel output only; not counted as executed.
    Debug,
    Executable,
}

use ArgKind::{Label as L, Symb as S, Type as T, Var as V};

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Clears => "CLEARS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::IDiv => "IDIV",
            Opcode::Adds => "ADDS",
            Opcode::Subs => "SUBS",
            Opcode::Muls => "MULS",
            Opcode::Divs => "DIVS",
            Opcode::IDivs => "IDIVS",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::Lts => "LTS",
            Opcode::Gts => "GTS",
            Opcode::Eqs => "EQS",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Ands => "ANDS",
            Opcode::Ors => "ORS",
            Opcode::Nots => "NOTS",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Int2Float => "INT2FLOAT",
            Opcode::Float2Int => "FLOAT2INT",
            Opcode::Int2Chars => "INT2CHARS",
            Opcode::Stri2Ints => "STRI2INTS",
            Opcode::Int2Floats => "INT2FLOATS",
            Opcode::Float2Ints => "FLOAT2INTS",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::JumpIfEqs => "JUMPIFEQS",
            Opcode::JumpIfNeqs => "JUMPIFNEQS",
            Opcode::Exit => "EXIT",
            Opcode::DPrint => "DPRINT",
            Opcode::Break => "BREAK",
            Opcode::Nop => "NOP",
        }
    }

    /// Looks up an opcode by mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(text: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(text))
            .copied()
    }

    /// The ordered argument kinds this opcode requires.
    pub fn signature(&self) -> &'static [ArgKind] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Clears
            | Opcode::Adds
            | Opcode::Subs
            | Opcode::Muls
            | Opcode::Divs
            | Opcode::IDivs
            | Opcode::Lts
            | Opcode::Gts
            | Opcode::Eqs
            | Opcode::Ands
            | Opcode::Ors
            | Opcode::Nots
            | Opcode::Int2Chars
            | Opcode::Stri2Ints
            | Opcode::Int2Floats
            | Opcode::Float2Ints
            | Opcode::Break
            | Opcode::Nop => &[],

            Opcode::DefVar | Opcode::Pops => &[V],
            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::DPrint => &[S],
            Opcode::Call
            | Opcode::Label
            | Opcode::Jump
            | Opcode::JumpIfEqs
            | Opcode::JumpIfNeqs => &[L],

            Opcode::Move
            | Opcode::Not
            | Opcode::Int2Char
            | Opcode::Int2Float
            | Opcode::Float2Int
            | Opcode::Strlen
            | Opcode::Type => &[V, S],

            Opcode::Read => &[V, T],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::IDiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[V, S, S],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[L, S, S],
        }
    }

    /// Number of operands this opcode takes.
    pub fn arity(&self) -> usize {
        self.signature().len()
    }

    pub fn class(&self) -> OpClass {
        match self {
            Opcode::Label => OpClass::Label,
            Opcode::DPrint | Opcode::Break => OpClass::Debug,
            _ => OpClass::Executable,
        }
    }

    /// Whether the first operand names a label this instruction may jump to.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Opcode::Call
                | Opcode::Jump
                | Opcode::JumpIfEq
                | Opcode::JumpIfNeq
                | Opcode::JumpIfEqs
                | Opcode::JumpIfNeqs
        )
    }

    /// Whether the instruction declares the variable in its first operand.
    pub fn declares_variable(&self) -> bool {
        matches!(self, Opcode::DefVar)
    }
}
