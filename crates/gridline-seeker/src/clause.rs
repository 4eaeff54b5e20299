//! Clause types for query predicates.
//!
//! A [`Clause`] represents a single filter predicate: a field name,
//! an operator, and a comparison value.

use std::fmt;

use regex::Regex;

use crate::error::{Result, SeekerError};
use crate::op::Op;
use crate::value::{Number, Value};

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use gridline_seeker::{Clause, Op, ClauseValue, Value, Number};
///
/// let clause = Clause::new("postId", Op::Eq, 3i64);
/// assert!(clause.matches(&Value::Number(Number::I64(3))));
///
/// let parsed = Clause::parse("name~lorem").unwrap();
/// assert_eq!(parsed.op, Op::Contains);
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Parses a clause written as `<field><op><value>`.
    ///
    /// Supported operators: `=`, `!=`, `>`, `>=`, `<`, `<=`, `~` (contains),
    /// `^=` (starts with), `$=` (ends with) and `=~` (regex).
    ///
    /// For `=` and `!=` the value is read as a number when it parses as one,
    /// then as a boolean (`true`/`false`), and otherwise as a string.
    /// Ordering operators require a numeric value.
    pub fn parse(expr: &str) -> Result<Clause> {
        let (at, op) =
            Op::find_in(expr).ok_or_else(|| SeekerError::InvalidClause(expr.to_string()))?;

        let field = expr[..at].trim();
        if field.is_empty() {
            return Err(SeekerError::InvalidClause(expr.to_string()));
        }
        let raw = expr[at + op.symbol().len()..].trim();

        let value = match op {
            Op::Regex => ClauseValue::Regex(Regex::new(raw)?),
            Op::StartsWith | Op::EndsWith | Op::Contains => ClauseValue::String(raw.to_string()),
            Op::Eq | Op::Ne => match (Number::parse(raw), raw) {
                (Some(n), _) => ClauseValue::Number(n),
                (None, "true") => ClauseValue::Bool(true),
                (None, "false") => ClauseValue::Bool(false),
                (None, s) => ClauseValue::String(s.to_string()),
            },
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => match Number::parse(raw) {
                Some(n) => ClauseValue::Number(n),
                None => {
                    return Err(SeekerError::InvalidOperatorForType {
                        op: op.as_str(),
                        value_type: "string",
                    })
                }
            },
        };

        Ok(Clause {
            field: field.to_string(),
            op,
            value,
        })
    }

    /// Evaluates this clause against a field value.
    ///
    /// Returns `false` if the value doesn't match or if the types are
    /// incompatible. A missing field never matches.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (ClauseValue::String(pattern), Value::String(s)) => self.match_string(s, pattern),
            (ClauseValue::Regex(regex), Value::String(s)) => {
                self.op == Op::Regex && regex.is_match(s)
            }
            (ClauseValue::Number(clause_num), Value::Number(field_num)) => {
                self.match_number(*field_num, *clause_num)
            }
            (ClauseValue::Bool(clause_bool), Value::Bool(field_bool)) => {
                self.match_bool(*field_bool, *clause_bool)
            }
            (_, Value::None) => false,
            _ => false,
        }
    }

    fn match_string(&self, field: &str, pattern: &str) -> bool {
        match self.op {
            Op::Eq => field == pattern,
            Op::Ne => field != pattern,
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            _ => false,
        }
    }

    fn match_number(&self, field: Number, clause: Number) -> bool {
        match field.compare(clause) {
            Some(ordering) => self.op.eval_ordering(ordering),
            None => false,
        }
    }

    fn match_bool(&self, field: bool, clause: bool) -> bool {
        match self.op {
            Op::Eq => field == clause,
            Op::Ne => field != clause,
            _ => false,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.op.symbol(), self.value)
    }
}

/// Owned value for storage in a clause.
///
/// Unlike [`Value`], which borrows from the source record, `ClauseValue`
/// owns its data so it can be stored in filter definitions.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Compiled regular expression.
    Regex(Regex),
}

impl fmt::Display for ClauseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseValue::String(s) => write!(f, "{}", s),
            ClauseValue::Number(n) => write!(f, "{}", n),
            ClauseValue::Bool(b) => write!(f, "{}", b),
            ClauseValue::Regex(r) => write!(f, "{}", r.as_str()),
        }
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl From<i32> for ClauseValue {
    fn from(n: i32) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<u32> for ClauseValue {
    fn from(n: u32) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<u64> for ClauseValue {
    fn from(n: u64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<f64> for ClauseValue {
    fn from(n: f64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}
