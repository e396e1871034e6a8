//! Instruction operands and the argument kinds opcodes expect.

use std::fmt;

use crate::value::{DataType, Value};

/// Which variable frame a variable reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTag {
    Global,
    Local,
    Temporary,
}

impl FrameTag {
    /// Returns the source prefix (`GF`, `LF`, `TF`).
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameTag::Global => "GF",
            FrameTag::Local => "LF",
            FrameTag::Temporary => "TF",
        }
    }

    /// Looks up a frame by its source prefix.
    pub fn from_prefix(prefix: &str) -> Option<FrameTag> {
        match prefix {
            "GF" => Some(FrameTag::Global),
            "LF" => Some(FrameTag::Local),
            "TF" => Some(FrameTag::Temporary),
            _ => None,
        }
    }
}

impl fmt::Display for FrameTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A reference to a named variable in a frame, e.g. `GF@counter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub frame: FrameTag,
    pub name: String,
}

impl VarRef {
    pub fn new(frame: FrameTag, name: impl Into<String>) -> Self {
        Self {
            frame,
            name: name.into(),
        }
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame, self.name)
    }
}

/// What an operand denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandKind {
    Variable(VarRef),
    Literal(Value),
    Label(String),
    TypeName(DataType),
}

/// A positioned instruction argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// 1-based argument slot.
    pub position: u8,
    /// The operand as written in the source, without its type prefix.
    pub content: String,
    pub kind: OperandKind,
}

impl Operand {
    pub fn new(position: u8, content: impl Into<String>, kind: OperandKind) -> Self {
        Self {
            position,
            content: content.into(),
            kind,
        }
    }

    pub fn variable(position: u8, var: VarRef) -> Self {
        let content = var.to_string();
        Self::new(position, content, OperandKind::Variable(var))
    }

    pub fn literal(position: u8, content: impl Into<String>, value: Value) -> Self {
        Self::new(position, content, OperandKind::Literal(value))
    }

    pub fn label(position: u8, name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(position, name.clone(), OperandKind::Label(name))
    }

    pub fn type_name(position: u8, ty: DataType) -> Self {
        Self::new(position, ty.name(), OperandKind::TypeName(ty))
    }

    /// Short name of the operand's kind, as used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            OperandKind::Variable(_) => "var",
            OperandKind::Literal(v) => v.data_type().name(),
            OperandKind::Label(_) => "label",
            OperandKind::TypeName(_) => "type",
        }
    }

    /// Returns the variable reference, if this operand is a variable.
    pub fn as_var(&self) -> Option<&VarRef> {
        match &self.kind {
            OperandKind::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// Returns the label name, if this operand is a label.
    pub fn as_label(&self) -> Option<&str> {
        match &self.kind {
            OperandKind::Label(name) => Some(name),
            _ => None,
        }
    }
}

/// Source-like rendering: `GF@x`, `int@5`, `string@a\032b`, `loop`, `int`.
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OperandKind::Variable(var) => write!(f, "{var}"),
            OperandKind::Literal(v) => write!(f, "{}@{}", v.data_type().name(), self.content),
            OperandKind::Label(name) => f.write_str(name),
            OperandKind::TypeName(ty) => f.write_str(ty.name()),
        }
    }
}

/// The kind of argument an opcode expects in one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// A variable.
    Var,
    /// A variable or a literal of any type.
    Symb,
    Label,
    /// A type name (`int`, `string`, ...).
    Type,
    /// A literal of exactly this type.
    Literal(DataType),
}

impl ArgKind {
    /// Whether `operand` may appear in a slot of this kind.
    pub fn accepts(&self, operand: &Operand) -> bool {
        match (self, &operand.kind) {
            (ArgKind::Var, OperandKind::Variable(_)) => true,
            (ArgKind::Symb, OperandKind::Variable(_) | OperandKind::Literal(_)) => true,
            (ArgKind::Label, OperandKind::Label(_)) => true,
            (ArgKind::Type, OperandKind::TypeName(_)) => true,
            (ArgKind::Literal(want), OperandKind::Literal(v)) => v.data_type() == *want,
            _ => false,
        }
    }

    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ArgKind::Var => "var",
            ArgKind::Symb => "symb",
            ArgKind::Label => "label",
            ArgKind::Type => "type",
            ArgKind::Literal(ty) => ty.name(),
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
