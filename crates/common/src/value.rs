//! Runtime value representation for the IPPcode22 interpreter.
//!
//! Values are what variables hold and what lives on the data stack.

use std::fmt;

use crate::error::InternalError;

/// The kind of a [`Value`].
///
/// Also used as the payload of type-name operands (`READ GF@x int`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Nil,
    Bool,
    Int,
    Str,
    Float,
}

/// All data types, in definition order.
pub const ALL_DATA_TYPES: [DataType; 5] = [
    DataType::Nil,
    DataType::Bool,
    DataType::Int,
    DataType::Str,
    DataType::Float,
];

impl DataType {
    /// Returns the source-language name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Nil => "nil",
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Str => "string",
            DataType::Float => "float",
        }
    }

    /// Looks up a type by its source-language name (case-sensitive).
    pub fn from_name(name: &str) -> Option<DataType> {
        ALL_DATA_TYPES.iter().find(|t| t.name() == name).copied()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed scalar value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The single value of type nil.
    Nil,
    Bool(bool),
    /// Signed 64-bit integer. Arithmetic wraps on overflow.
    Int(i64),
    Str(String),
    /// IEEE 754 double.
    Float(f64),
}

// Floats compare by bit pattern so Value can implement Eq. The EQ family
// of instructions compares numerically; see the VM's ops module.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Returns the kind of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Nil => DataType::Nil,
            Value::Bool(_) => DataType::Bool,
            Value::Int(_) => DataType::Int,
            Value::Str(_) => DataType::Str,
            Value::Float(_) => DataType::Float,
        }
    }

    /// Construct a value of the given kind, checking the payload matches.
    ///
    /// A mismatch means the caller computed the payload for the wrong type,
    /// which is an interpreter bug and reported as [`InternalError`].
    pub fn checked(kind: DataType, payload: Value) -> Result<Value, InternalError> {
        let found = payload.data_type();
        if found == kind {
            Ok(payload)
        } else {
            Err(InternalError {
                expected: kind,
                found,
            })
        }
    }

    /// Returns the integer payload, if this is an Int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a Str.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

/// The printable rendering used by WRITE and DPRINT.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Float(x) => f.write_str(&format_hex_float(*x)),
        }
    }
}

/// Format a float in C `%a` notation, e.g. `0x1.8p+1` for 3.0.
pub fn format_hex_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    let sign = if x.is_sign_negative() { "-" } else { "" };
    if x.is_infinite() {
        return format!("{sign}inf");
    }

    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7FF) as i32;
    let mantissa = bits & ((1u64 << 52) - 1);

    if biased == 0 && mantissa == 0 {
        return format!("{sign}0x0p+0");
    }

    // Subnormals keep a leading 0 and the minimum exponent.
    let (lead, exponent) = if biased == 0 {
        (0, -1022)
    } else {
        (1, biased - 1023)
    };

    let digits = format!("{mantissa:013x}");
    let digits = digits.trim_end_matches('0');
    let exp_sign = if exponent < 0 { '-' } else { '+' };

    if digits.is_empty() {
        format!("{sign}0x{lead}p{exp_sign}{}", exponent.abs())
    } else {
        format!("{sign}0x{lead}.{digits}p{exp_sign}{}", exponent.abs())
    }
}
