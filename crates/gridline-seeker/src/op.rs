//! Comparison operators and their textual tokens.

use std::cmp::Ordering;
use std::fmt;

/// Comparison operator for a query clause.
///
/// | Op | Token | Applies to |
/// |----|-------|------------|
/// | `Eq`, `Ne` | `=`, `!=` | every type |
/// | `StartsWith`, `EndsWith`, `Contains` | `^=`, `$=`, `~` | strings |
/// | `Regex` | `=~` | strings |
/// | `Gt`, `Gte`, `Lt`, `Lte` | `>`, `>=`, `<`, `<=` | numbers |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    StartsWith,
    EndsWith,
    Contains,
    Regex,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Op {
    /// Operators in the order [`Op::find_in`] tries their tokens.
    ///
    /// Two-character tokens come first so `>=` wins over `>` and `=~`
    /// over `=` at the same position.
    const SCAN_ORDER: [Op; 10] = [
        Op::Ne,
        Op::Gte,
        Op::Lte,
        Op::Regex,
        Op::StartsWith,
        Op::EndsWith,
        Op::Eq,
        Op::Gt,
        Op::Lt,
        Op::Contains,
    ];

    /// Whether two values that compare as `ordering` satisfy this operator.
    ///
    /// String-only operators never do.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering.is_eq(),
            Op::Ne => ordering.is_ne(),
            Op::Gt => ordering.is_gt(),
            Op::Gte => ordering.is_ge(),
            Op::Lt => ordering.is_lt(),
            Op::Lte => ordering.is_le(),
            Op::StartsWith | Op::EndsWith | Op::Contains | Op::Regex => false,
        }
    }

    /// The token used in clause text, e.g. `>=`.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::StartsWith => "^=",
            Op::EndsWith => "$=",
            Op::Contains => "~",
            Op::Regex => "=~",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
        }
    }

    /// Short lowercase name, used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Contains => "contains",
            Op::Regex => "regex",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
        }
    }

    /// Finds the leftmost operator token in `expr`.
    ///
    /// Returns its byte offset and the operator.
    pub fn find_in(expr: &str) -> Option<(usize, Op)> {
        expr.char_indices().find_map(|(i, _)| {
            Op::SCAN_ORDER
                .iter()
                .find(|op| expr[i..].starts_with(op.symbol()))
                .map(|op| (i, *op))
        })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
