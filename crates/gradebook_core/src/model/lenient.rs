//! Tolerant field decoding for read models.
//!
//! Backend rows are not guaranteed to match the read model: a text column can
//! hold any JSON value, and numeric columns can arrive as text. Each decoder
//! keeps what it can and falls back to `None` instead of failing the row.

use crate::model::coerce::{coerce_value, NumericKind};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strings pass through; other non-null values keep their JSON text.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }))
}

pub(crate) fn name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

/// Same prefix rules as draft coercion; anything else reads as `None`.
pub(crate) fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| coerce_value(&value, NumericKind::Integer).as_i64()))
}

pub(crate) fn float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| coerce_value(&value, NumericKind::Float).as_f64()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::name")]
        name: String,
        #[serde(default, deserialize_with = "super::text")]
        label: Option<String>,
        #[serde(default, deserialize_with = "super::integer")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "super::float")]
        ratio: Option<f64>,
    }

    #[test]
    fn odd_shapes_degrade_instead_of_failing() {
        let row: Row = serde_json::from_value(json!({
            "name": null,
            "label": ["honor", "band"],
            "count": "12 pupils",
            "ratio": true
        }))
        .unwrap();

        assert_eq!(row.name, "");
        assert_eq!(row.label.as_deref(), Some(r#"["honor","band"]"#));
        assert_eq!(row.count, Some(12));
        assert_eq!(row.ratio, None);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let row: Row = serde_json::from_value(json!({ "label": 7 })).unwrap();

        assert_eq!(row.name, "");
        assert_eq!(row.label.as_deref(), Some("7"));
        assert_eq!(row.count, None);
        assert_eq!(row.ratio, None);
    }
}
