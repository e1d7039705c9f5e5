//! Per-table descriptor shared by the generic repository.

use crate::model::coerce::{coerce_numeric_fields, NumericField};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Backend-assigned record identifier.
pub type RecordId = i64;

/// One record in the backend's generic wire shape.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "Id";
pub const NAME_FIELD: &str = "Name";
pub const TAGS_FIELD: &str = "Tags";

/// Describes how one backend table maps onto a typed read model and draft.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Caller input for create/update; every attribute is resupplied.
    type Draft: Serialize + Send + Sync;

    const TABLE: &'static str;
    /// Field selection sent with every read.
    const FIELDS: &'static [&'static str];
    const NUMERIC_FIELDS: &'static [NumericField];

    const NOT_FOUND_MESSAGE: &'static str;
    const FETCH_FAILED_MESSAGE: &'static str;
    const DELETE_FAILED_MESSAGE: &'static str;

    fn id(&self) -> RecordId;

    /// Value written to the `Name` column.
    fn display_name(draft: &Self::Draft) -> String;

    /// Builds the wire record for `draft`: serialized attributes, synthesized
    /// `Name`, numeric columns coerced.
    fn to_record(draft: &Self::Draft) -> Result<Record, serde_json::Error> {
        let mut record = match serde_json::to_value(draft)? {
            Value::Object(map) => map,
            _ => Record::new(),
        };
        record.insert(
            NAME_FIELD.to_string(),
            Value::String(Self::display_name(draft)),
        );
        coerce_numeric_fields(&mut record, Self::NUMERIC_FIELDS);
        Ok(record)
    }

    fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record))
    }
}

pub(crate) fn empty_if_none<S: serde::Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
