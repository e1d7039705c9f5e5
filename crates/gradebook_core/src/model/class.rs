//! Class table.

use crate::model::coerce::{NumberInput, NumericField};
use crate::model::entity::{Entity, RecordId};
use crate::model::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub grade_level: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub capacity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub teacher_id: Option<String>,
    #[serde(rename = "Tags", default, deserialize_with = "lenient::text")]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDraft {
    #[serde(skip_serializing)]
    pub name: String,
    pub grade_level: NumberInput,
    pub section: String,
    pub capacity: NumberInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Entity for Class {
    type Draft = ClassDraft;

    const TABLE: &'static str = "class";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "gradeLevel",
        "section",
        "capacity",
        "teacherId",
        "Tags",
    ];
    const NUMERIC_FIELDS: &'static [NumericField] = &[
        NumericField::integer("gradeLevel"),
        NumericField::integer("capacity"),
    ];

    const NOT_FOUND_MESSAGE: &'static str = "Class not found";
    const FETCH_FAILED_MESSAGE: &'static str = "Failed to fetch classes";
    const DELETE_FAILED_MESSAGE: &'static str = "Failed to delete class";

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(draft: &ClassDraft) -> String {
        draft.name.clone()
    }
}
