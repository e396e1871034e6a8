//! Pure operations on values.
//!
//! Shared by the three-address instructions and their stack forms. Int and
//! Float never mix: converting between them takes INT2FLOAT or FLOAT2INT.

use ippcode_common::{DataType, Value};

use crate::error::Fault;

fn bad_types(operation: &'static str, operands: &[&Value]) -> Fault {
    let found = operands
        .iter()
        .map(|v| v.data_type().name())
        .collect::<Vec<_>>()
        .join(" and ");
    Fault::BadTypes { operation, found }
}

fn numeric(
    operation: &'static str,
    a: Value,
    b: Value,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, Fault> {
    match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(int_op(*x, *y))),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(float_op(*x, *y))),
        _ => Err(bad_types(operation, &[&a, &b])),
    }
}

pub fn add(a: Value, b: Value) -> Result<Value, Fault> {
    numeric("ADD", a, b, i64::wrapping_add, |x, y| x + y)
}

pub fn sub(a: Value, b: Value) -> Result<Value, Fault> {
    numeric("SUB", a, b, i64::wrapping_sub, |x, y| x - y)
}

pub fn mul(a: Value, b: Value) -> Result<Value, Fault> {
    numeric("MUL", a, b, i64::wrapping_mul, |x, y| x * y)
}

/// Float division. A divisor of exactly zero is an error.
pub fn div(a: Value, b: Value) -> Result<Value, Fault> {
    match (&a, &b) {
        (Value::Float(_), Value::Float(y)) if *y == 0.0 => Err(Fault::bad_value("division by zero")),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x / y)),
        _ => Err(bad_types("DIV", &[&a, &b])),
    }
}

/// Integer division rounding toward negative infinity.
pub fn idiv(a: Value, b: Value) -> Result<Value, Fault> {
    match (&a, &b) {
        (Value::Int(_), Value::Int(0)) => Err(Fault::bad_value("division by zero")),
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(floor_div(*x, *y))),
        _ => Err(bad_types("IDIV", &[&a, &b])),
    }
}

fn floor_div(x: i64, y: i64) -> i64 {
    let q = x.wrapping_div(y);
    if x.wrapping_rem(y) != 0 && ((x < 0) != (y < 0)) {
        q - 1
    } else {
        q
    }
}

/// Equality. Nil compares equal only to Nil and never fails.
pub fn equals(a: &Value, b: &Value) -> Result<bool, Fault> {
    match (a, b) {
        (Value::Nil, _) | (_, Value::Nil) => Ok(a.is_nil() && b.is_nil()),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::Int(x), Value::Int(y)) => Ok(x == y),
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        (Value::Float(x), Value::Float(y)) => Ok(x == y),
        _ => Err(bad_types("EQ", &[a, b])),
    }
}

/// Strict less-than over two values of the same non-nil kind.
pub fn less(a: &Value, b: &Value) -> Result<bool, Fault> {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => Ok(x < y),
        (Value::Int(x), Value::Int(y)) => Ok(x < y),
        (Value::Str(x), Value::Str(y)) => Ok(x < y),
        (Value::Float(x), Value::Float(y)) => Ok(x < y),
        _ => Err(bad_types("LT", &[a, b])),
    }
}

pub fn lt(a: Value, b: Value) -> Result<Value, Fault> {
    less(&a, &b).map(Value::Bool)
}

pub fn gt(a: Value, b: Value) -> Result<Value, Fault> {
    less(&b, &a)
        .map(Value::Bool)
        .map_err(|_| bad_types("GT", &[&a, &b]))
}

pub fn eq(a: Value, b: Value) -> Result<Value, Fault> {
    equals(&a, &b).map(Value::Bool)
}

pub fn and(a: Value, b: Value) -> Result<Value, Fault> {
    match (&a, &b) {
        (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(*x && *y)),
        _ => Err(bad_types("AND", &[&a, &b])),
    }
}

pub fn or(a: Value, b: Value) -> Result<Value, Fault> {
    match (&a, &b) {
        (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(*x || *y)),
        _ => Err(bad_types("OR", &[&a, &b])),
    }
}

pub fn not(a: Value) -> Result<Value, Fault> {
    match a {
        Value::Bool(x) => Ok(Value::Bool(!x)),
        other => Err(bad_types("NOT", &[&other])),
    }
}

/// Character with the given Unicode code point.
pub fn int2char(a: Value) -> Result<Value, Fault> {
    match a {
        Value::Int(code) => u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .map(|c| Value::Str(c.to_string()))
            .ok_or_else(|| Fault::string_op(format!("{code} is not a Unicode code point"))),
        other => Err(bad_types("INT2CHAR", &[&other])),
    }
}

/// Code point of the character at an index.
pub fn stri2int(a: Value, b: Value) -> Result<Value, Fault> {
    match (&a, &b) {
        (Value::Str(s), Value::Int(i)) => {
            let c = char_at(s, *i)?;
            Ok(Value::Int(i64::from(u32::from(c))))
        }
        _ => Err(bad_types("STRI2INT", &[&a, &b])),
    }
}

pub fn int2float(a: Value) -> Result<Value, Fault> {
    match a {
        Value::Int(n) => Ok(Value::Float(n as f64)),
        other => Err(bad_types("INT2FLOAT", &[&other])),
    }
}

/// Truncate toward zero. NaN, infinities and out-of-range values fail.
pub fn float2int(a: Value) -> Result<Value, Fault> {
    match a {
        Value::Float(x) => {
            let t = x.trunc();
            // 2^63 is exactly representable; i64::MIN as f64 is -2^63.
            if t.is_finite() && t >= i64::MIN as f64 && t < 9_223_372_036_854_775_808.0 {
                Ok(Value::Int(t as i64))
            } else {
                Err(Fault::bad_value(format!(
                    "{} has no integer value",
                    Value::Float(x)
                )))
            }
        }
        other => Err(bad_types("FLOAT2INT", &[&other])),
    }
}

pub fn concat(a: Value, b: Value) -> Result<Value, Fault> {
    match (a, b) {
        (Value::Str(mut x), Value::Str(y)) => {
            x.push_str(&y);
            Ok(Value::Str(x))
        }
        (a, b) => Err(bad_types("CONCAT", &[&a, &b])),
    }
}

/// Length in characters.
pub fn strlen(a: Value) -> Result<Value, Fault> {
    match a {
        Value::Str(s) => {
            let len = s.chars().count();
            Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
        }
        other => Err(bad_types("STRLEN", &[&other])),
    }
}

/// One-character string at an index.
pub fn getchar(a: Value, b: Value) -> Result<Value, Fault> {
    match (&a, &b) {
        (Value::Str(s), Value::Int(i)) => Ok(Value::Str(char_at(s, *i)?.to_string())),
        _ => Err(bad_types("GETCHAR", &[&a, &b])),
    }
}

/// Replace the character at `index` of `target` with the first character of `source`.
pub fn setchar(target: Value, index: Value, source: Value) -> Result<Value, Fault> {
    match (&target, &index, &source) {
        (Value::Str(t), Value::Int(i), Value::Str(s)) => {
            let replacement = s
                .chars()
                .next()
                .ok_or_else(|| Fault::string_op("replacement string is empty"))?;
            let at = char_index(t, *i)?;
            let out: String = t
                .chars()
                .enumerate()
                .map(|(pos, c)| if pos == at { replacement } else { c })
                .collect();
            Ok(Value::Str(out))
        }
        _ => Err(bad_types("SETCHAR", &[&target, &index, &source])),
    }
}

/// Name of a value's type, or the empty string for an uninitialized variable.
pub fn type_name(value: Option<&Value>) -> Value {
    let name = value.map(|v| v.data_type().name()).unwrap_or("");
    Value::Str(name.to_string())
}

/// Convert a line read by READ to `kind`. Unparsable input yields Nil.
pub fn parse_input(kind: DataType, line: &str) -> Value {
    use ippcode_common::literal;

    let parsed = match kind {
        DataType::Int => literal::parse_int(line.trim()).map(Value::Int),
        DataType::Float => literal::parse_float(line.trim()).map(Value::Float),
        DataType::Bool => {
            let word = line.trim().to_ascii_lowercase();
            literal::parse_bool(&word).map(Value::Bool)
        }
        DataType::Str => Some(Value::Str(line.to_string())),
        DataType::Nil => None,
    };
    parsed.unwrap_or(Value::Nil)
}

fn char_index(s: &str, index: i64) -> Result<usize, Fault> {
    let len = s.chars().count();
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(Fault::string_op(format!(
            "index {index} out of range for string of length {len}"
        ))),
    }
}

fn char_at(s: &str, index: i64) -> Result<char, Fault> {
    let i = char_index(s, index)?;
    s.chars()
        .nth(i)
        .ok_or_else(|| Fault::string_op(format!("index {index} out of range")))
}
