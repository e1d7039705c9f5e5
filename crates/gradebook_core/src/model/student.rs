//! Student table.

use crate::model::coerce::{NumberInput, NumericField};
use crate::model::entity::{empty_if_none, Entity, RecordId};
use crate::model::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub grade_level: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub enrollment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(rename = "Tags", default, deserialize_with = "lenient::text")]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    /// Written to `Name`.
    #[serde(skip_serializing)]
    pub name: String,
    pub email: String,
    pub phone: String,
    pub grade_level: NumberInput,
    pub section: String,
    pub enrollment_date: String,
    #[serde(serialize_with = "empty_if_none")]
    pub photo_url: Option<String>,
    pub status: String,
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Entity for Student {
    type Draft = StudentDraft;

    const TABLE: &'static str = "student";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "email",
        "phone",
        "gradeLevel",
        "section",
        "enrollmentDate",
        "photoUrl",
        "status",
        "Tags",
    ];
    const NUMERIC_FIELDS: &'static [NumericField] = &[NumericField::integer("gradeLevel")];

    const NOT_FOUND_MESSAGE: &'static str = "Student not found";
    const FETCH_FAILED_MESSAGE: &'static str = "Failed to fetch students";
    const DELETE_FAILED_MESSAGE: &'static str = "Failed to delete student";

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(draft: &StudentDraft) -> String {
        draft.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{Student, StudentDraft};
    use crate::model::entity::Entity;
    use serde_json::{json, Value};

    #[test]
    fn student_record_uses_caller_name_and_nulls_bad_numbers() {
        let record = Student::to_record(&StudentDraft {
            name: "Ada Lovelace".to_string(),
            grade_level: "abc".into(),
            ..StudentDraft::default()
        })
        .unwrap();

        assert_eq!(record["Name"], json!("Ada Lovelace"));
        assert!(!record.contains_key("name"));
        assert_eq!(record["gradeLevel"], Value::Null);
        assert_eq!(record["photoUrl"], json!(""));
    }

    #[test]
    fn read_model_keeps_non_text_tags_as_json() {
        let student = Student::from_record(
            json!({ "Id": 1, "Name": "Ada", "Tags": ["honor"], "gradeLevel": 5 })
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap();

        assert_eq!(student.tags.as_deref(), Some(r#"["honor"]"#));
        assert_eq!(student.grade_level, Some(5));
    }
}
