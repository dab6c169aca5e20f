//! Tagged attribute values and the weak-equality comparison
//!
//! Persisted entities expose their attributes as a dynamic bag, so desired
//! and actual values meet here as [`AttrValue`] variants. The comparison
//! used by the reconciler is [`weak_eq`], which deliberately replicates the
//! loose cross-type equality of the target platform rather than Rust's
//! strict `PartialEq`. It lives behind this one helper so the semantics can
//! be tested in isolation and tightened later without touching the
//! reconciliation algorithm.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value: scalar, list, or nested map
///
/// Deserializes untagged, so plain YAML/JSON values map onto the expected
/// variant. Integers win over floats when the input is integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Absent / null value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
    /// Ordered list of values
    List(Vec<AttrValue>),
    /// Nested mapping (string keys only)
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Truthiness under the target platform's rules
    ///
    /// Empty string, `"0"`, zero numbers, null, and empty collections are
    /// false; everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            AttrValue::Null => false,
            AttrValue::Bool(b) => *b,
            AttrValue::Int(n) => *n != 0,
            AttrValue::Float(f) => *f != 0.0,
            AttrValue::Str(s) => !s.is_empty() && s != "0",
            AttrValue::List(items) => !items.is_empty(),
            AttrValue::Map(entries) => !entries.is_empty(),
        }
    }

    /// Numeric interpretation of the value, if it has one
    fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Int(n) => Some(*n as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::Str(s) => numeric_string(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, "<null>"),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(n) => write!(f, "{}", n),
            AttrValue::Float(x) => write!(f, "{}", x),
            AttrValue::Str(s) => write!(f, "{}", s),
            AttrValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            AttrValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Parse a string the way the target platform treats numeric strings
///
/// Leading/trailing whitespace is tolerated; anything that does not parse
/// as a finite number in full is non-numeric. `"nan"` and `"inf"` parse as
/// `f64` but are not numeric strings on the platform, and letting them
/// through would make `"nan"` unequal to itself (breaking idempotence) and
/// collapse distinct spellings like `"inf"`/`"infinity"`.
fn numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Loose cross-type equality matching the target platform's `==`
///
/// The rules, in order:
/// - numeric string vs. number compares numerically (`"1"` equals `1`,
///   `"1"` equals `"01"`);
/// - a non-numeric string vs. a number compares the number's string form;
/// - bool vs. anything compares the other side's truthiness;
/// - null equals the empty string, zero, `false`, and empty collections;
/// - lists compare element-wise, maps compare by key set, both weakly;
/// - a list never equals a map unless both are empty.
///
/// This can suppress legitimate saves when types differ only cosmetically
/// (`"0"` vs. `0`). Preserved deliberately; see the workspace design notes.
pub fn weak_eq(a: &AttrValue, b: &AttrValue) -> bool {
    use AttrValue::*;

    match (a, b) {
        (Null, Null) => true,
        (Null, other) | (other, Null) => !other.truthy() && !matches!(other, Str(s) if s == "0"),
        (Bool(x), other) | (other, Bool(x)) => *x == other.truthy(),
        (Str(x), Str(y)) => match (numeric_string(x), numeric_string(y)) {
            (Some(nx), Some(ny)) => nx == ny,
            _ => x == y,
        },
        (List(xs), List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| weak_eq(x, y))
        }
        (Map(xs), Map(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| weak_eq(x, y)))
        }
        (List(xs), Map(ys)) | (Map(ys), List(xs)) => xs.is_empty() && ys.is_empty(),
        (List(_) | Map(_), _) | (_, List(_) | Map(_)) => false,
        // Remaining pairs are numeric or string-vs-numeric.
        (x, y) => match (x.as_number(), y.as_number()) {
            (Some(nx), Some(ny)) => nx == ny,
            // Non-numeric string against a number: compare string forms.
            _ => x.to_string() == y.to_string(),
        },
    }
}
