//! Column declarations a backend validates writes against.

use crate::client::protocol::FieldError;
use crate::model::entity::{ID_FIELD, NAME_FIELD, TAGS_FIELD};
use crate::model::{Entity, NumericKind, Record};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Any JSON value.
    Text,
    Integer,
    Float,
}

/// Known columns of one backend table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: BTreeMap<String, ColumnKind>,
}

impl TableSchema {
    /// Starts a schema holding only the system `Name` and `Tags` columns.
    pub fn new(name: impl Into<String>) -> Self {
        let mut columns = BTreeMap::new();
        columns.insert(NAME_FIELD.to_string(), ColumnKind::Text);
        columns.insert(TAGS_FIELD.to_string(), ColumnKind::Text);
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.insert(name.into(), kind);
        self
    }

    /// Derives a schema from an entity descriptor: every selected field is a
    /// column, numeric fields keep their kind.
    pub fn for_entity<E: Entity>() -> Self {
        let mut schema = Self::new(E::TABLE);
        for field in E::FIELDS {
            schema = schema.column(*field, ColumnKind::Text);
        }
        for field in E::NUMERIC_FIELDS {
            let kind = match field.kind {
                NumericKind::Integer => ColumnKind::Integer,
                NumericKind::Float => ColumnKind::Float,
            };
            schema = schema.column(field.name, kind);
        }
        schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns.get(name).copied()
    }

    /// Returns one error per offending field; `Id` is ignored.
    pub fn validate(&self, record: &Record) -> Vec<FieldError> {
        record
            .iter()
            .filter(|(field, _)| field.as_str() != ID_FIELD)
            .filter_map(|(field, value)| match self.column_kind(field) {
                None => Some(FieldError::new(field.as_str(), "Unknown field")),
                Some(ColumnKind::Text) => None,
                Some(ColumnKind::Integer) if !is_integer(value) => {
                    Some(FieldError::new(field.as_str(), "Invalid integer value"))
                }
                Some(ColumnKind::Float) if !value.is_number() => {
                    Some(FieldError::new(field.as_str(), "Invalid number"))
                }
                Some(_) => None,
            })
            .collect()
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(number) => {
            number.is_i64() || number.is_u64() || number.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        _ => false,
    }
}
