//! Literal values carried by hyperparameter occurrences.
//!
//! [`Value`] models the constants a literal evaluator can produce from a
//! default-value expression, plus [`Value::NotLiteral`], the marker recorded
//! when a default exists but cannot be reduced to a constant. Runtime
//! overrides use the same type, so parsed and assigned values compare
//! directly.

mod dict;

use std::fmt::{self, Write as _};

use serde::{Serialize, Serializer};

pub use dict::Dict;

/// A literal constant, or the marker for a default that is not literal.
#[derive(Clone, Debug)]
pub enum Value {
    /// The `None` constant.
    None,
    /// A boolean constant.
    Bool(bool),
    /// A signed integer constant.
    Int(i64),
    /// A floating point constant.
    Float(f64),
    /// A text string constant.
    Str(String),
    /// A byte string constant.
    Bytes(Vec<u8>),
    /// A list display.
    List(Vec<Self>),
    /// A tuple display.
    Tuple(Vec<Self>),
    /// A set display. Equality ignores element order.
    Set(Vec<Self>),
    /// A dict display. Equality ignores entry order.
    Dict(Dict),
    /// A default that could not be evaluated, holding its source text.
    NotLiteral(String),
}

impl Value {
    /// Returns the string slice when the value is [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the mapping when the value is [`Value::Dict`].
    #[must_use]
    pub const fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::NotLiteral`].
    #[must_use]
    pub const fn is_not_literal(&self) -> bool {
        matches!(self, Self::NotLiteral(_))
    }

    /// Python truthiness, used when interpreting dict annotations.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(flag) => *flag,
            Self::Int(number) => *number != 0,
            Self::Float(number) => *number != 0.0,
            Self::Str(text) => !text.is_empty(),
            Self::Bytes(bytes) => !bytes.is_empty(),
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => !items.is_empty(),
            Self::Dict(dict) => !dict.is_empty(),
            Self::NotLiteral(_) => true,
        }
    }

    /// Renders the value as a mapping key: strings verbatim, anything else as
    /// its `repr`.
    #[must_use]
    pub fn key_string(&self) -> String {
        match self {
            Self::Str(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

fn unordered_eq(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().all(|item| right.contains(item))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) | (Self::NotLiteral(a), Self::NotLiteral(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => unordered_eq(a, b),
            (Self::Dict(a), Self::Dict(b)) => a == b,
            _ => false,
        }
    }
}

/// Python's float `repr`: the shortest round-trip digits, positional for
/// decimal exponents in `-4..16`, scientific with a signed two-digit
/// exponent otherwise.
fn write_float_repr(f: &mut fmt::Formatter<'_>, number: f64) -> fmt::Result {
    if number.is_nan() {
        return f.write_str("nan");
    }
    if number.is_infinite() {
        return f.write_str(if number.is_sign_negative() { "-inf" } else { "inf" });
    }
    let scientific = format!("{number:e}");
    let (signed_mantissa, exponent_text) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent_text.parse().unwrap_or(0);
    let (sign, mantissa) = signed_mantissa
        .strip_prefix('-')
        .map_or(("", signed_mantissa), |rest| ("-", rest));
    if !(-4..16).contains(&exponent) {
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        let magnitude = exponent.unsigned_abs();
        return write!(f, "{sign}{mantissa}e{exponent_sign}{magnitude:02}");
    }
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let body = if exponent >= 0 {
        let whole_len = usize::try_from(exponent).unwrap_or(0) + 1;
        let mut whole: String = digits.chars().take(whole_len).collect();
        while whole.len() < whole_len {
            whole.push('0');
        }
        let fraction: String = digits.chars().skip(whole_len).collect();
        let fraction_text = if fraction.is_empty() { "0" } else { fraction.as_str() };
        format!("{whole}.{fraction_text}")
    } else {
        let zeros = usize::try_from(exponent.unsigned_abs())
            .unwrap_or(1)
            .saturating_sub(1);
        format!("0.{}{digits}", "0".repeat(zeros))
    };
    write!(f, "{sign}{body}")
}

fn write_str_repr(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    f.write_char(quote)?;
    for ch in text.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn write_bytes_repr(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("b'")?;
    for byte in bytes {
        match byte {
            b'\\' => f.write_str("\\\\")?,
            b'\'' => f.write_str("\\'")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x20..=0x7e => f.write_char(char::from(*byte))?,
            other => write!(f, "\\x{other:02x}")?,
        }
    }
    f.write_char('\'')
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (position, item) in items.iter().enumerate() {
        if position > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Python-style `repr`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(number) => write!(f, "{number}"),
            Self::Float(number) => write_float_repr(f, *number),
            Self::Str(text) => write_str_repr(f, text),
            Self::Bytes(bytes) => write_bytes_repr(f, bytes),
            Self::List(items) => {
                f.write_char('[')?;
                write_items(f, items)?;
                f.write_char(']')
            }
            Self::Tuple(items) => {
                f.write_char('(')?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::Set(items) if items.is_empty() => f.write_str("set()"),
            Self::Set(items) => {
                f.write_char('{')?;
                write_items(f, items)?;
                f.write_char('}')
            }
            Self::Dict(dict) => write!(f, "{dict}"),
            Self::NotLiteral(source) => write!(f, "<not literal: {source}>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::None => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(number) => serializer.serialize_i64(*number),
            Self::Float(number) => serializer.serialize_f64(*number),
            Self::Str(text) | Self::NotLiteral(text) => serializer.serialize_str(text),
            Self::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => {
                serializer.collect_seq(items)
            }
            Self::Dict(dict) => dict.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Int(i64::from(number))
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Int(number)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Str(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Self::Dict(dict)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float))
                .unwrap_or_else(|| Self::NotLiteral(number.to_string())),
            serde_json::Value::String(text) => Self::Str(text),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Dict(
                map.into_iter()
                    .map(|(key, value)| (Self::Str(key), Self::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests;
