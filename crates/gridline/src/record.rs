//! Records and datasets.
//!
//! A [`Record`] is one flat row of input: an ordered map from field name to a
//! scalar JSON value. Field order is the order of the source object, which is
//! what column derivation samples. Every record carries an `id` that is unique
//! within its [`Dataset`].
//!
//! Datasets are immutable. Deleting or adding a row produces a new dataset,
//! so derived views never observe a half-updated collection.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use gridline_seeker::{Dir, Number, Seekable, Value};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::error::{DatasetError, RecordError};
use crate::sort::{sort_records, SortState};

/// Name of the field that identifies a row.
pub const ID_FIELD: &str = "id";

/// Identity of a row, taken from its `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    fn from_json(value: &JsonValue) -> Result<Self, RecordError> {
        match value {
            JsonValue::Number(n) => n
                .as_i64()
                .map(RecordId::Int)
                .ok_or_else(|| RecordError::InvalidId(n.to_string())),
            JsonValue::String(s) => Ok(RecordId::Text(s.clone())),
            other => Err(RecordError::InvalidId(other.to_string())),
        }
    }

    /// Returns the integer id, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordId::Int(n) => Some(*n),
            RecordId::Text(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parses user text: integers become [`RecordId::Int`], anything else text.
impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<RecordId> for JsonValue {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Int(n) => JsonValue::from(n),
            RecordId::Text(s) => JsonValue::String(s),
        }
    }
}

/// One row of input data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, JsonValue>")]
pub struct Record {
    id: RecordId,
    fields: Map<String, JsonValue>,
}

impl Record {
    /// Validates a field map into a record.
    pub fn new(fields: Map<String, JsonValue>) -> Result<Self, RecordError> {
        let id = fields
            .get(ID_FIELD)
            .ok_or(RecordError::MissingId)
            .and_then(RecordId::from_json)?;

        if let Some((name, _)) = fields
            .iter()
            .find(|(_, v)| matches!(v, JsonValue::Array(_) | JsonValue::Object(_)))
        {
            return Err(RecordError::NonScalarField(name.clone()));
        }

        Ok(Record { id, fields })
    }

    /// Validates an arbitrary JSON value into a record.
    pub fn from_json(value: JsonValue) -> Result<Self, RecordError> {
        match value {
            JsonValue::Object(fields) => Record::new(fields),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// Iterates fields in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in source order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    /// Returns the field as a comparison value.
    pub fn value(&self, field: &str) -> Value<'_> {
        self.fields.get(field).map_or(Value::None, json_to_value)
    }

    /// Text form of a field for display and export.
    ///
    /// Missing and null fields render as the empty string.
    pub fn cell_text(&self, field: &str) -> String {
        self.value(field).to_text().into_owned()
    }

    /// Lowercased concatenation of every field value, joined by a space.
    ///
    /// This is what free-text search runs against. Hidden columns are
    /// included.
    pub fn search_text(&self) -> String {
        self.fields
            .values()
            .map(|v| json_to_value(v).to_text())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// `key: value` lines for every field, in source order.
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}: {}", k, json_to_value(v).to_text()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<Map<String, JsonValue>> for Record {
    type Error = RecordError;

    fn try_from(fields: Map<String, JsonValue>) -> Result<Self, Self::Error> {
        Record::new(fields)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl Seekable for Record {
    fn seeker_field_value(&self, field: &str) -> Value<'_> {
        self.value(field)
    }
}

/// Converts a scalar JSON value into a comparison value.
pub(crate) fn json_to_value(value: &JsonValue) -> Value<'_> {
    match value {
        JsonValue::String(s) => Value::String(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                n.as_f64().map_or(Value::None, |f| Value::Number(Number::F64(f)))
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => Value::None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// An immutable, validated collection of records with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset, rejecting duplicate ids.
    pub fn new(records: Vec<Record>) -> Result<Self, DatasetError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(DatasetError::DuplicateId(record.id().clone()));
            }
        }
        Ok(Dataset { records })
    }

    /// Validates a sequence of JSON values.
    pub fn from_values(values: Vec<JsonValue>) -> Result<Self, DatasetError> {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Record::from_json(value).map_err(|source| DatasetError::Record { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Dataset::new(records)
    }

    /// Parses a JSON array of flat objects.
    pub fn from_json_str(input: &str) -> Result<Self, DatasetError> {
        let values: Vec<JsonValue> = serde_json::from_str(input)?;
        Dataset::from_values(values)
    }

    /// Reads a JSON array of flat objects.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let values: Vec<JsonValue> = serde_json::from_reader(reader)?;
        Dataset::from_values(values)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// The record whose fields define the column set.
    pub fn sample(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Returns a copy without the record with this id.
    ///
    /// An unknown id yields an identical dataset.
    pub fn without(&self, id: &RecordId) -> Dataset {
        Dataset {
            records: self
                .records
                .iter()
                .filter(|r| r.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// Returns a copy with `record` appended.
    pub fn with(&self, record: Record) -> Result<Dataset, DatasetError> {
        if self.contains(record.id()) {
            return Err(DatasetError::DuplicateId(record.id().clone()));
        }
        let mut records = self.records.clone();
        records.push(record);
        Ok(Dataset { records })
    }

    /// The id a newly added row should get: one past the largest integer id.
    pub fn next_id(&self) -> i64 {
        self.records
            .iter()
            .filter_map(|r| r.id().as_int())
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Returns a copy permanently reordered by one field.
    ///
    /// Unlike the view's sort state, this changes the input order itself.
    pub fn reordered_by(&self, field: &str, dir: Dir) -> Dataset {
        let state = SortState::by(field, dir);
        let records = sort_records(self.records.iter().collect(), &state)
            .into_iter()
            .cloned()
            .collect();
        Dataset { records }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: JsonValue) -> Record {
        Record::from_json(value).unwrap()
    }

    #[test]
    fn record_keeps_field_order() {
        let r = record(json!({"postId": 1, "id": 3, "name": "x", "email": "a@b"}));
        let names: Vec<&str> = r.field_names().collect();
        assert_eq!(names, vec!["postId", "id", "name", "email"]);
        assert_eq!(r.id(), &RecordId::Int(3));
    }

    #[test]
    fn record_requires_id() {
        assert_eq!(
            Record::from_json(json!({"name": "x"})).unwrap_err(),
            RecordError::MissingId
        );
        assert_eq!(
            Record::from_json(json!({"id": 1.5})).unwrap_err(),
            RecordError::InvalidId("1.5".into())
        );
        assert_eq!(
            Record::from_json(json!({"id": null})).unwrap_err(),
            RecordError::InvalidId("null".into())
        );
    }

    #[test]
    fn record_rejects_nested_values() {
        assert_eq!(
            Record::from_json(json!({"id": 1, "tags": ["a"]})).unwrap_err(),
            RecordError::NonScalarField("tags".into())
        );
        assert!(matches!(
            Record::from_json(json!([1, 2])),
            Err(RecordError::NotAnObject("an array"))
        ));
    }

    #[test]
    fn text_id() {
        let r = record(json!({"id": "abc"}));
        assert_eq!(r.id(), &RecordId::Text("abc".into()));
        assert_eq!(r.id().to_string(), "abc");
    }

    #[test]
    fn record_id_from_str() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::Int(42));
        assert_eq!(" x ".parse::<RecordId>().unwrap(), RecordId::Text("x".into()));
    }

    #[test]
    fn cell_text_renders_missing_as_empty() {
        let r = record(json!({"id": 1, "name": null, "score": 2.5, "ok": true}));
        assert_eq!(r.cell_text("name"), "");
        assert_eq!(r.cell_text("absent"), "");
        assert_eq!(r.cell_text("score"), "2.5");
        assert_eq!(r.cell_text("ok"), "true");
        assert_eq!(r.cell_text("id"), "1");
    }

    #[test]
    fn search_text_joins_all_values() {
        let r = record(json!({"id": 7, "name": "Alpha", "email": "X@Y.com", "note": null}));
        assert_eq!(r.search_text(), "7 alpha x@y.com ");
    }

    #[test]
    fn summary_lists_fields() {
        let r = record(json!({"id": 1, "name": "A"}));
        assert_eq!(r.summary(), "id: 1\nname: A");
    }

    #[test]
    fn seekable_values() {
        let r = record(json!({"id": 1, "name": "A", "big": 18446744073709551615u64}));
        assert_eq!(r.seeker_field_value("id"), Value::Number(Number::I64(1)));
        assert_eq!(r.seeker_field_value("name"), Value::String("A"));
        assert_eq!(
            r.seeker_field_value("big"),
            Value::Number(Number::U64(u64::MAX))
        );
        assert_eq!(r.seeker_field_value("nope"), Value::None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let r = record(json!({"id": 1, "name": "A"}));
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"id":1,"name":"A"}"#);
    }

    #[test]
    fn deserializes_with_validation() {
        let r: Record = serde_json::from_str(r#"{"id": 2, "name": "B"}"#).unwrap();
        assert_eq!(r.id(), &RecordId::Int(2));
        assert!(serde_json::from_str::<Record>(r#"{"name": "B"}"#).is_err());
    }

    #[test]
    fn dataset_from_json() {
        let ds = Dataset::from_json_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(!ds.is_empty());
        assert_eq!(ds.sample().unwrap().id(), &RecordId::Int(1));
    }

    #[test]
    fn dataset_rejects_duplicates() {
        let err = Dataset::from_json_str(r#"[{"id": 1}, {"id": 1}]"#).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateId(RecordId::Int(1))));
    }

    #[test]
    fn dataset_reports_bad_record_index() {
        let err = Dataset::from_json_str(r#"[{"id": 1}, {"name": "x"}]"#).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Record {
                index: 1,
                source: RecordError::MissingId
            }
        ));
        assert_eq!(err.to_string(), "record 1: missing `id` field");
    }

    #[test]
    fn dataset_rejects_non_array() {
        assert!(matches!(
            Dataset::from_json_str(r#"{"id": 1}"#),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn without_leaves_original_untouched() {
        let ds = Dataset::from_json_str(r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#).unwrap();
        let smaller = ds.without(&RecordId::Int(2));

        assert_eq!(ds.len(), 3);
        let ids: Vec<_> = smaller.iter().map(|r| r.id().clone()).collect();
        assert_eq!(ids, vec![RecordId::Int(1), RecordId::Int(3)]);
        assert_eq!(ds.without(&RecordId::Int(9)), ds);
    }

    #[test]
    fn with_appends_and_checks_ids() {
        let ds = Dataset::from_json_str(r#"[{"id": 1}]"#).unwrap();
        let bigger = ds.with(record(json!({"id": 2}))).unwrap();
        assert_eq!(bigger.len(), 2);
        assert!(ds.with(record(json!({"id": 1}))).is_err());
    }

    #[test]
    fn next_id_is_one_past_max() {
        assert_eq!(Dataset::default().next_id(), 1);
        let ds = Dataset::from_json_str(r#"[{"id": 4}, {"id": "x"}, {"id": 9}]"#).unwrap();
        assert_eq!(ds.next_id(), 10);
    }

    #[test]
    fn reordered_by_changes_input_order() {
        let ds = Dataset::from_json_str(
            r#"[{"id": 1, "postId": 1}, {"id": 2, "postId": 3}, {"id": 3, "postId": 2}]"#,
        )
        .unwrap();
        let ids: Vec<_> = ds
            .reordered_by("postId", Dir::Desc)
            .iter()
            .map(|r| r.id().clone())
            .collect();
        assert_eq!(ids, vec![RecordId::Int(2), RecordId::Int(3), RecordId::Int(1)]);
    }
}
