//! Conjunctive record predicates.

use crate::clause::{Clause, ClauseValue};
use crate::op::Op;
use crate::value::Value;

/// A predicate that holds when every one of its clauses matches.
///
/// An empty query matches everything.
///
/// # Example
///
/// ```
/// use gridline_seeker::{Clause, Number, Op, Query, Value};
///
/// let query = Query::new()
///     .and("postId", Op::Eq, 5i64)
///     .and_clause(Clause::parse("email$=.biz").unwrap());
///
/// fn accessor<'a>(row: &'a (i64, String), field: &str) -> Value<'a> {
///     match field {
///         "postId" => Value::Number(Number::I64(row.0)),
///         "email" => Value::String(&row.1),
///         _ => Value::None,
///     }
/// }
///
/// assert!(query.matches(&(5, "Lew@alysha.biz".to_string()), accessor));
/// assert!(!query.matches(&(5, "Lew@alysha.tv".to_string()), accessor));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    /// Adds a clause built from its parts.
    pub fn and(self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and_clause(Clause::new(field, op, value))
    }

    /// Adds an already-built clause.
    pub fn and_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Tests `item`, reading each clause's field through `accessor`.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.clauses
            .iter()
            .all(|clause| clause.matches(&accessor(item, &clause.field)))
    }
}
