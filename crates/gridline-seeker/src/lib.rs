//! Seeker - predicate and ordering primitives for record collections.
//!
//! Seeker evaluates filter clauses and sort orderings against any collection,
//! as long as you can hand it an accessor that maps a field name to a
//! [`Value`]. It supports:
//!
//! - Scalar field types: strings, numbers, booleans, and missing values
//! - Rich operators: equality, comparison, string matching, regex
//! - Conjunctive queries: a record matches when every clause does
//! - A total ordering over values, with a text ordering for mixed columns
//!
//! # Quick Start
//!
//! ```rust
//! use gridline_seeker::{Number, Op, Query, Value};
//!
//! struct Comment {
//!     post_id: i64,
//!     name: String,
//! }
//!
//! fn accessor<'a>(c: &'a Comment, field: &str) -> Value<'a> {
//!     match field {
//!         "postId" => Value::Number(Number::I64(c.post_id)),
//!         "name" => Value::String(&c.name),
//!         _ => Value::None,
//!     }
//! }
//!
//! let comments = vec![
//!     Comment { post_id: 1, name: "first".into() },
//!     Comment { post_id: 2, name: "second".into() },
//!     Comment { post_id: 2, name: "third".into() },
//! ];
//!
//! let query = Query::new()
//!     .and("postId", Op::Eq, 2i64)
//!     .and("name", Op::Ne, "third");
//!
//! let names: Vec<&str> = comments
//!     .iter()
//!     .filter(|c| query.matches(*c, accessor))
//!     .map(|c| c.name.as_str())
//!     .collect();
//! assert_eq!(names, vec!["second"]);
//! ```
//!
//! # Ordering
//!
//! [`compare_values`] is a total order: same-typed values use their natural
//! order, mixed types order by type, and missing values sort last.
//! [`compare_as_text`] orders by text form for columns whose values do not
//! share a single type.

mod clause;
mod error;
mod op;
mod ordering;
mod query;
mod traits;
mod value;

pub use clause::{Clause, ClauseValue};
pub use error::{Result, SeekerError};
pub use op::Op;
pub use ordering::{compare_as_text, compare_values, Dir};
pub use query::Query;
pub use traits::Seekable;
pub use value::{Number, Value};
