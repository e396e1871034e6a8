//! IPPcode22 common types.
//!
//! This crate provides the data model shared by the loader, the static
//! checker and the execution engine:
//!
//! - [`Value`] and [`DataType`]: typed scalar values
//! - [`Operand`]: variable, literal, label or type-name arguments
//! - [`Opcode`]: the closed instruction vocabulary with operand signatures
//! - [`Instruction`]: opcode, order number and operands
//! - [`Program`]: an order-sorted, structurally checked instruction sequence
//! - [`literal`]: the textual literal syntax used by the loader and READ

pub mod error;
pub mod instruction;
pub mod literal;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::{InternalError, ProgramError};
pub use instruction::Instruction;
pub use opcode::{OpClass, Opcode};
pub use operand::{ArgKind, FrameTag, Operand, OperandKind, VarRef};
pub use program::Program;
pub use value::{DataType, Value};
