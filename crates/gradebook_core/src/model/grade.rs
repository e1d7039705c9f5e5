//! Grade table. `Name` is synthesized as `"{subject} - {gradeType}"`.

use crate::model::coerce::{NumberInput, NumericField};
use crate::model::entity::{Entity, RecordId};
use crate::model::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub max_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub grade_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub student_id: Option<i64>,
    #[serde(rename = "Tags", default, deserialize_with = "lenient::text")]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDraft {
    pub subject: String,
    pub score: NumberInput,
    pub max_score: NumberInput,
    pub grade_type: String,
    pub semester: String,
    pub date: String,
    pub student_id: NumberInput,
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Entity for Grade {
    type Draft = GradeDraft;

    const TABLE: &'static str = "grade";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "subject",
        "score",
        "maxScore",
        "gradeType",
        "semester",
        "date",
        "studentId",
        "Tags",
    ];
    const NUMERIC_FIELDS: &'static [NumericField] = &[
        NumericField::float("score"),
        NumericField::float("maxScore"),
        NumericField::integer("studentId"),
    ];

    const NOT_FOUND_MESSAGE: &'static str = "Grade not found";
    const FETCH_FAILED_MESSAGE: &'static str = "Failed to fetch grades";
    const DELETE_FAILED_MESSAGE: &'static str = "Failed to delete grade";

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(draft: &GradeDraft) -> String {
        format!("{} - {}", draft.subject, draft.grade_type)
    }
}
