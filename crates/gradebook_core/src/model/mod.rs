//! Entity model for the gradebook tables.
//!
//! # Responsibility
//! - Describe each backend table once (`Entity`): name, field selection,
//!   numeric columns and display-name synthesis.
//! - Provide typed read models and caller-facing drafts per table.
//!
//! # Invariants
//! - `Id` is assigned by the backend and never written by drafts.
//! - Numeric draft inputs are coerced before transmission, never validated.

pub mod attendance;
pub mod class;
pub mod coerce;
pub mod entity;
pub mod grade;
mod lenient;
pub mod student;

use crate::client::schema::TableSchema;

pub use attendance::{Attendance, AttendanceDraft};
pub use class::{Class, ClassDraft};
pub use coerce::{NumberInput, NumericField, NumericKind};
pub use entity::{Entity, Record, RecordId};
pub use grade::{Grade, GradeDraft};
pub use student::{Student, StudentDraft};

/// Schemas for every gradebook table, for seeding a local backend.
pub fn table_schemas() -> Vec<TableSchema> {
    vec![
        TableSchema::for_entity::<Student>(),
        TableSchema::for_entity::<Class>(),
        TableSchema::for_entity::<Grade>(),
        TableSchema::for_entity::<Attendance>(),
    ]
}
