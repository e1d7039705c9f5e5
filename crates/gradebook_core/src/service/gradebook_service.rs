//! Gradebook facade.
//!
//! # Responsibility
//! - Build the four table repositories around one shared client and notifier.
//! - Offer the attendance-marking use case on top of the upsert.

use crate::client::RecordClient;
use crate::model::Attendance;
use crate::notify::Notifier;
use crate::repo::{
    AttendanceRepository, ClassRepository, GradeRepository, RepoResult, StudentRepository,
};
use std::sync::Arc;

pub struct GradebookService<C: RecordClient + ?Sized> {
    students: StudentRepository<C>,
    classes: ClassRepository<C>,
    grades: GradeRepository<C>,
    attendance: AttendanceRepository<C>,
}

impl<C: RecordClient + ?Sized> GradebookService<C> {
    pub fn new(client: Arc<C>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            students: StudentRepository::new(Arc::clone(&client), Arc::clone(&notifier)),
            classes: ClassRepository::new(Arc::clone(&client), Arc::clone(&notifier)),
            grades: GradeRepository::new(Arc::clone(&client), Arc::clone(&notifier)),
            attendance: AttendanceRepository::new(client, notifier),
        }
    }

    pub fn students(&self) -> &StudentRepository<C> {
        &self.students
    }

    pub fn classes(&self) -> &ClassRepository<C> {
        &self.classes
    }

    pub fn grades(&self) -> &GradeRepository<C> {
        &self.grades
    }

    pub fn attendance(&self) -> &AttendanceRepository<C> {
        &self.attendance
    }

    /// Records `status` for a student on `date`, replacing any earlier mark
    /// for the same day.
    pub async fn mark_attendance(
        &self,
        student_id: i64,
        date: &str,
        status: &str,
        reason: Option<&str>,
    ) -> RepoResult<Option<Attendance>> {
        self.attendance
            .update_by_student_and_date(student_id, date, status, reason)
            .await
    }
}
