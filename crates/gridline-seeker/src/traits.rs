//! Field access trait.
//!
//! [`Seekable`] lets a type expose its fields to [`Query`](crate::Query)
//! without writing a free accessor function.

use crate::value::Value;

/// Trait for types that can be queried using Seeker.
///
/// # Example
///
/// ```
/// use gridline_seeker::{Number, Op, Query, Seekable, Value};
///
/// struct Comment {
///     post_id: u32,
///     body: String,
/// }
///
/// impl Seekable for Comment {
///     fn seeker_field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "postId" => Value::Number(Number::U64(self.post_id as u64)),
///             "body" => Value::String(&self.body),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let query = Query::new().and("postId", Op::Eq, 2u32);
/// let comment = Comment { post_id: 2, body: "b".into() };
/// assert!(query.matches(&comment, Comment::accessor));
/// ```
pub trait Seekable {
    /// Returns the value of a field for comparison, or [`Value::None`] if
    /// the field doesn't exist.
    fn seeker_field_value(&self, field: &str) -> Value<'_>;

    /// Returns an accessor function suitable for [`Query::matches`](crate::Query::matches).
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.seeker_field_value(field)
    }
}
