//! Attendance table.
//!
//! Records are logically keyed by `(studentId, date)` for upserts; the key is
//! not enforced as unique by this crate.

use crate::model::coerce::{NumberInput, NumericField};
use crate::model::entity::{empty_if_none, Entity, RecordId};
use crate::model::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: Option<String>,
    #[serde(rename = "Tags", default, deserialize_with = "lenient::text")]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDraft {
    pub student_id: NumberInput,
    pub date: String,
    pub status: String,
    #[serde(serialize_with = "empty_if_none")]
    pub reason: Option<String>,
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Entity for Attendance {
    type Draft = AttendanceDraft;

    const TABLE: &'static str = "attendance";
    const FIELDS: &'static [&'static str] =
        &["Name", "studentId", "date", "status", "reason", "Tags"];
    const NUMERIC_FIELDS: &'static [NumericField] = &[NumericField::integer("studentId")];

    const NOT_FOUND_MESSAGE: &'static str = "Attendance record not found";
    const FETCH_FAILED_MESSAGE: &'static str = "Failed to fetch attendance";
    const DELETE_FAILED_MESSAGE: &'static str = "Failed to delete attendance record";

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(draft: &AttendanceDraft) -> String {
        format!("Attendance - {}", draft.date)
    }
}

#[cfg(test)]
mod tests {
    use super::{Attendance, AttendanceDraft};
    use crate::model::entity::Entity;
    use serde_json::json;

    #[test]
    fn attendance_record_synthesizes_name_and_defaults_reason() {
        let record = Attendance::to_record(&AttendanceDraft {
            student_id: "42".into(),
            date: "2024-01-01".to_string(),
            status: "present".to_string(),
            ..AttendanceDraft::default()
        })
        .unwrap();

        assert_eq!(record["Name"], json!("Attendance - 2024-01-01"));
        assert_eq!(record["studentId"], json!(42));
        assert_eq!(record["reason"], json!(""));
        assert!(!record.contains_key("Tags"));
        assert!(!record.contains_key("Id"));
    }

    #[test]
    fn read_model_accepts_student_id_sent_as_text() {
        let attendance: Attendance = serde_json::from_value(json!({
            "Id": 9,
            "studentId": "42",
            "date": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(attendance.student_id, Some(42));
        assert_eq!(attendance.status, None);
    }
}
