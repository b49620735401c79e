//! # Runtime Value Representation
//!
//! `Value<'a>` is the decoded form of one record column. Text and blob
//! variants use `Cow` so the common case borrows straight from the cell
//! payload (and, transitively, from the mapped file), while callers that
//! need to retain a value past its record can convert to the owned form.
//!
//! | Variant | Rust type      | Serial types          |
//! |---------|----------------|-----------------------|
//! | Null    | -              | 0                     |
//! | Int     | `i64`          | 1..=6, 8, 9           |
//! | Float   | `f64`          | 7                     |
//! | Blob    | `Cow<[u8]>`    | even N >= 12          |
//! | Text    | `Cow<str>`     | odd N >= 13           |

use std::borrow::Cow;
use std::fmt;

/// One decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Int(i64),
    Float(f64),
    Blob(Cow<'a, [u8]>),
    Text(Cow<'a, str>),
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Blob(_) => "blob",
            Value::Text(_) => "text",
        }
    }

    /// Converts borrowed payloads into owned ones, detaching the value
    /// from the record it was decoded from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Int(v) => Value::Int(v),
            Value::Float(v) => Value::Float(v),
            Value::Blob(b) => Value::Blob(Cow::Owned(b.into_owned())),
            Value::Text(s) => Value::Text(Cow::Owned(s.into_owned())),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => {
                f.write_str("x'")?;
                for byte in b.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                f.write_str("'")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Text(Cow::Borrowed("abc")).to_string(), "abc");
        assert_eq!(
            Value::Blob(Cow::Borrowed(&[0xDE, 0xAD][..])).to_string(),
            "x'dead'"
        );
    }

    #[test]
    fn into_owned_preserves_content() {
        let bytes = vec![1u8, 2, 3];
        let value = Value::Blob(Cow::Borrowed(&bytes[..]));
        let owned = value.into_owned();
        assert_eq!(owned, Value::Blob(Cow::Owned(vec![1, 2, 3])));
    }
}
