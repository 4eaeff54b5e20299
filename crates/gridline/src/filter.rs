//! Record filtering.
//!
//! Three predicates, all ANDed:
//!
//! - an exact numeric match on one designated field
//! - a case-insensitive substring search over every field value
//! - any number of `field OP value` clauses
//!
//! Malformed input never fails: numeric filter text that does not parse
//! simply turns that predicate off. Filtering keeps the relative order of
//! the input.

use gridline_seeker::{Clause, Number, Op, Query, Seekable};

use crate::record::{Record, ID_FIELD};

/// Active filter predicates.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    /// Field the exact filter compares against.
    pub exact_field: String,
    /// Value the exact field must equal. `None` disables the predicate.
    pub exact_value: Option<Number>,
    /// Substring every match must contain. Blank text is a no-op.
    pub search_text: Option<String>,
    /// Additional clauses, all of which must match.
    pub clauses: Vec<Clause>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec::new(ID_FIELD)
    }
}

impl FilterSpec {
    /// An inactive filter whose exact predicate targets `exact_field`.
    pub fn new(exact_field: impl Into<String>) -> Self {
        FilterSpec {
            exact_field: exact_field.into(),
            exact_value: None,
            search_text: None,
            clauses: Vec::new(),
        }
    }

    pub fn with_exact(mut self, value: impl Into<Number>) -> Self {
        self.exact_value = Some(value.into());
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.set_search(text);
        self
    }

    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Sets the exact filter from user text.
    ///
    /// Returns whether the predicate is now active. Blank or non-numeric
    /// text disables it.
    pub fn set_exact_text(&mut self, text: &str) -> bool {
        self.exact_value = Number::parse(text);
        self.exact_value.is_some()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_text = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
    }

    /// Returns `true` if any predicate would remove records.
    pub fn is_active(&self) -> bool {
        self.exact_value.is_some() || self.search_text.is_some() || !self.clauses.is_empty()
    }

    /// Compiles the predicates into a matcher that can be reused across
    /// records.
    pub fn matcher(&self) -> RecordMatcher {
        let query = self
            .clauses
            .iter()
            .cloned()
            .fold(Query::new(), |q, clause| q.and_clause(clause));
        let query = match self.exact_value {
            Some(value) => query.and(&self.exact_field, Op::Eq, value),
            None => query,
        };
        RecordMatcher {
            query,
            needle: self.search_text.as_ref().map(|t| t.to_lowercase()),
        }
    }
}

/// A [`FilterSpec`] compiled once for testing many records.
#[derive(Debug, Clone)]
pub struct RecordMatcher {
    query: Query,
    needle: Option<String>,
}

impl RecordMatcher {
    /// Tests a single record against every predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.query.matches(record, Record::accessor)
            && self
                .needle
                .as_deref()
                .map_or(true, |n| record.search_text().contains(n))
    }
}

/// Returns the records matching `filter`, in input order.
pub fn apply_filters<'a, I>(records: I, filter: &FilterSpec) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let matcher = filter.matcher();
    records
        .into_iter()
        .filter(|record| matcher.matches(record))
        .collect()
}
