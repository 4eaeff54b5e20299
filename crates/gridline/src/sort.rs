//! Single-key sorting.
//!
//! [`SortState`] tracks one active key and direction. [`sort_records`]
//! produces a stably ordered copy of a record sequence; ties keep their
//! input order.
//!
//! Values of one type compare naturally. When a column holds more than one
//! kind of present value (numbers and strings, say) every pair in that
//! column compares by text instead, so the ordering stays total. Missing
//! and null values sort last ascending, first descending.

use std::cmp::Ordering;
use std::fmt;

use gridline_seeker::{compare_as_text, compare_values, Dir, Value};

use crate::record::Record;

/// The active sort key and direction.
///
/// `key = None` keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<String>,
    pub dir: Dir,
}

impl SortState {
    /// No active key.
    pub fn unsorted() -> Self {
        SortState::default()
    }

    pub fn by(key: impl Into<String>, dir: Dir) -> Self {
        SortState {
            key: Some(key.into()),
            dir,
        }
    }

    /// Next state after a header click on `key`.
    ///
    /// The same key while ascending flips to descending. Anything else,
    /// including the same key while descending, sorts ascending on `key`.
    pub fn handle_sort(&self, key: &str) -> SortState {
        match (&self.key, self.dir) {
            (Some(current), Dir::Asc) if current == key => SortState::by(key, Dir::Desc),
            _ => SortState::by(key, Dir::Asc),
        }
    }

    /// Direction indicator for a column header, if it is the active key.
    pub fn indicator(&self, key: &str) -> Option<Dir> {
        match &self.key {
            Some(current) if current == key => Some(self.dir),
            _ => None,
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} {}", key, self.dir),
            None => write!(f, "unsorted"),
        }
    }
}

/// Returns `records` ordered by `state`.
///
/// The sort is stable. An unsorted state returns the input unchanged.
pub fn sort_records<'a>(mut records: Vec<&'a Record>, state: &SortState) -> Vec<&'a Record> {
    let Some(key) = state.key.as_deref() else {
        return records;
    };

    let compare: for<'v> fn(&Value<'v>, &Value<'v>) -> Ordering = if is_mixed(&records, key) {
        compare_as_text
    } else {
        compare_values
    };

    records.sort_by(|a, b| state.dir.apply(compare(&a.value(key), &b.value(key))));
    records
}

/// Whether the present values of `key` span more than one type.
fn is_mixed(records: &[&Record], key: &str) -> bool {
    let mut kinds = records.iter().filter_map(|r| kind(&r.value(key)));
    match kinds.next() {
        Some(first) => kinds.any(|k| k != first),
        None => false,
    }
}

fn kind(value: &Value<'_>) -> Option<u8> {
    match value {
        Value::Bool(_) => Some(0),
        Value::Number(_) => Some(1),
        Value::String(_) => Some(2),
        Value::None => None,
    }
}
