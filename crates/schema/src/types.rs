//! Bitset of JSON value types, used both by the schema compiler (to
//! represent a `type` keyword) and by `dataset::Column` (to represent the
//! subset of {number, integer, string, bool} a tabular column admits).

use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Hash, Eq, PartialEq, Default)]
pub struct Set(u16);

pub const INVALID: Set = Set(0b0000000);
pub const ARRAY: Set = Set(0b0000001);
pub const BOOLEAN: Set = Set(0b0000010);
pub const FRACTIONAL: Set = Set(0b0000100);
pub const INTEGER: Set = Set(0b0001000);
pub const NULL: Set = Set(0b0010000);
pub const OBJECT: Set = Set(0b0100000);
pub const STRING: Set = Set(0b1000000);

/// Composite for JSON Schema's "number", which admits both integers and
/// fractional values.
pub const INT_OR_FRAC: Set = Set(INTEGER.0 | FRACTIONAL.0);
pub const ANY: Set =
    Set(ARRAY.0 | BOOLEAN.0 | FRACTIONAL.0 | INTEGER.0 | NULL.0 | OBJECT.0 | STRING.0);

impl std::ops::BitOr for Set {
    type Output = Self;
    #[inline]
    fn bitor(self, other: Self) -> Self::Output {
        Set(self.0 | other.0)
    }
}

impl std::ops::BitAnd for Set {
    type Output = Self;
    #[inline]
    fn bitand(self, other: Self) -> Self::Output {
        Set(self.0 & other.0)
    }
}

impl Set {
    pub fn overlaps(&self, other: Set) -> bool {
        (*self & other).0 != 0
    }

    pub fn is_single(&self) -> bool {
        self.0.count_ones() == 1
    }

    /// The type-set of a decoded JSON value.
    pub fn of(v: &Value) -> Set {
        match v {
            Value::Null => NULL,
            Value::Bool(_) => BOOLEAN,
            Value::String(_) => STRING,
            Value::Array(_) => ARRAY,
            Value::Object(_) => OBJECT,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    INTEGER
                } else {
                    FRACTIONAL
                }
            }
        }
    }

    /// Parse a `type` keyword string ("number", "integer", "string",
    /// "boolean", "array", "object", "null") into its Set.
    pub fn from_keyword(name: &str) -> Option<Set> {
        Some(match name {
            "array" => ARRAY,
            "boolean" => BOOLEAN,
            "integer" => INTEGER,
            "null" => NULL,
            "number" => INT_OR_FRAC,
            "object" => OBJECT,
            "string" => STRING,
            _ => return None,
        })
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        write!(f, "{{")?;
        for (set, name) in [
            (ARRAY, "array"),
            (BOOLEAN, "boolean"),
            (INTEGER, "integer"),
            (FRACTIONAL, "fractional"),
            (NULL, "null"),
            (OBJECT, "object"),
            (STRING, "string"),
        ] {
            if self.overlaps(set) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detects_value_types() {
        assert_eq!(Set::of(&serde_json::json!(1)), INTEGER);
        assert_eq!(Set::of(&serde_json::json!(1.5)), FRACTIONAL);
        assert_eq!(Set::of(&serde_json::json!("s")), STRING);
        assert_eq!(Set::of(&serde_json::json!(true)), BOOLEAN);
        assert_eq!(Set::of(&serde_json::json!(null)), NULL);
    }

    #[test]
    fn number_keyword_is_integer_or_fractional() {
        let number = Set::from_keyword("number").unwrap();
        assert!(number.overlaps(INTEGER));
        assert!(number.overlaps(FRACTIONAL));
        assert!(!number.overlaps(STRING));
    }
}
