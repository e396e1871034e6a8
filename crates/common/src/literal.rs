//! Literal syntax shared by the source loader and the READ instruction.
//!
//! ```text
//! int     [+-]? ( decimal | 0x hex | 0o octal | 0 octal ), '_' between digits
//! float   C hex float (0x1.8p+1) or decimal (1.5, 2e10)
//! bool    true | false
//! string  any text, \ddd is the character with decimal code ddd
//! nil     nil
//! ```

use crate::value::{DataType, Value};

/// Parse a literal of the given type from its textual form.
///
/// Returns `None` if the text is not a well-formed literal of that type.
pub fn parse_literal(kind: DataType, text: &str) -> Option<Value> {
    match kind {
        DataType::Nil => (text == "nil").then_some(Value::Nil),
        DataType::Bool => parse_bool(text).map(Value::Bool),
        DataType::Int => parse_int(text).map(Value::Int),
        DataType::Str => decode_string(text).map(Value::Str),
        DataType::Float => parse_float(text).map(Value::Float),
    }
}

/// Parse `true` or `false`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse an integer literal.
pub fn parse_int(text: &str) -> Option<i64> {
    let (negative, body) = split_sign(text);

    let (radix, digits) = if let Some(rest) = strip_prefix_ci(body, "0x") {
        (16, rest)
    } else if let Some(rest) = strip_prefix_ci(body, "0o") {
        (8, rest)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };

    let digits = strip_separators(digits)?;
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i128::from_str_radix(&digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

/// Parse a float literal in C hex-float or decimal notation.
pub fn parse_float(text: &str) -> Option<f64> {
    let (negative, body) = split_sign(text);

    let magnitude = if let Some(rest) = strip_prefix_ci(body, "0x") {
        parse_hex_float_body(rest)?
    } else {
        let decimal_chars =
            |c: char| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-');
        if body.is_empty() || !body.chars().all(decimal_chars) {
            return None;
        }
        body.parse::<f64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Replace `\ddd` escapes with the characters they denote.
///
/// A backslash not followed by exactly three decimal digits, or a code
/// that is not a Unicode scalar value, makes the literal invalid.
pub fn decode_string(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut code = 0u32;
        for _ in 0..3 {
            let digit = chars.next()?.to_digit(10)?;
            code = code * 10 + digit;
        }
        out.push(char::from_u32(code)?);
    }

    Some(out)
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn strip_prefix_ci<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Remove `_` separators. A separator must sit between two digits.
fn strip_separators(digits: &str) -> Option<String> {
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    Some(digits.chars().filter(|&c| c != '_').collect())
}

/// Parse the part of a hex float after `0x`: `H*(.H*)?([pP][+-]?D+)?`.
fn parse_hex_float_body(body: &str) -> Option<f64> {
    let (mantissa, exponent) = match body.find(|c: char| c == 'p' || c == 'P') {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for c in int_part.chars().chain(frac_part.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }

    let mut exp: i32 = match exponent {
        Some(e) => {
            let (neg, digits) = split_sign(e);
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let n: i32 = digits.parse().ok()?;
            if neg {
                -n
            } else {
                n
            }
        }
        None => 0,
    };
    exp = exp.checked_sub(4 * i32::try_from(frac_part.len()).ok()?)?;

    Some(scale_by_power_of_two(value, exp))
}

fn scale_by_power_of_two(mut value: f64, mut exp: i32) -> f64 {
    // powi stays exact only inside the normal exponent range.
    while exp > 1000 {
        value *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        value *= 2f64.powi(-1000);
        exp += 1000;
    }
    value * 2f64.powi(exp)
}
