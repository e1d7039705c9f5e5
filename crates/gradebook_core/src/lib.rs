//! Typed record repositories for a school gradebook backend.
//!
//! Each table (student, class, grade, attendance) is described once by an
//! `Entity` and served by the generic `Repository`, which talks to any
//! injected `RecordClient`.

pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use client::{ClientError, ClientResult, RecordClient, SqliteRecordClient, TableSchema};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    table_schemas, Attendance, AttendanceDraft, Class, ClassDraft, Entity, Grade, GradeDraft,
    NumberInput, Record, RecordId, Student, StudentDraft,
};
pub use notify::{LogNotifier, MemoryNotifier, Notifier, NullNotifier};
pub use repo::{
    AttendanceRepository, ClassRepository, GradeRepository, Operation, RepoError, RepoResult,
    Repository, StudentRepository,
};
pub use service::gradebook_service::GradebookService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
