//! Sort direction and value comparison.

use std::cmp::Ordering;

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compares two values with a total order.
///
/// - Same-typed values use their natural order (numbers numerically,
///   strings lexicographically, `false < true`).
/// - Values of different types order by type: booleans, then numbers,
///   then strings.
/// - `None` sorts after every present value.
///
/// Callers that want a mixed-type column ordered by text should use
/// [`compare_as_text`] for every pair of that column instead.
pub fn compare_values<'a>(a: &Value<'a>, b: &Value<'a>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (a, b) => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compares two values by their text form. `None` still sorts last.
pub fn compare_as_text<'a>(a: &Value<'a>, b: &Value<'a>) -> Ordering {
    match (a, b) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Greater,
        (_, Value::None) => Ordering::Less,
        (a, b) => a.to_text().cmp(&b.to_text()),
    }
}

fn type_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::None => 3,
    }
}
