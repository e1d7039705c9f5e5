//! Attendance upsert keyed by `(studentId, date)`.
//!
//! The sequence is query-then-write. Upserts issued through the same
//! repository instance are serialized; writers in other processes (or other
//! repository instances) can still race and create duplicate rows for one
//! key, since the backend has no conditional write.

use crate::client::protocol::Filter;
use crate::client::RecordClient;
use crate::model::{Attendance, AttendanceDraft, NumberInput};
use crate::repo::error::RepoResult;
use crate::repo::record_repo::Repository;
use log::{error, info};

impl<C: RecordClient + ?Sized> Repository<Attendance, C> {
    /// Updates the attendance record of `student_id` on `date`, or creates it
    /// when none exists. `reason` defaults to an empty string.
    ///
    /// When several records share the key, the first one returned by the
    /// backend is updated.
    pub async fn update_by_student_and_date(
        &self,
        student_id: i64,
        date: &str,
        status: &str,
        reason: Option<&str>,
    ) -> RepoResult<Option<Attendance>> {
        let _guard = self.upsert_lock.lock().await;

        let draft = AttendanceDraft {
            student_id: NumberInput::Integer(student_id),
            date: date.to_string(),
            status: status.to_string(),
            reason: Some(reason.unwrap_or_default().to_string()),
            tags: None,
        };

        let existing = self
            .find_where(vec![
                Filter::equal_to("studentId", student_id),
                Filter::equal_to("date", date),
            ])
            .await
            .inspect_err(|err| {
                error!(
                    "event=attendance_upsert module=repo status=error student_id={student_id} date={date} error={err}"
                );
            })?;

        match existing.first() {
            Some(current) => {
                info!(
                    "event=attendance_upsert module=repo status=update id={} student_id={student_id} date={date}",
                    current.id
                );
                self.update(current.id, &draft).await
            }
            None => {
                info!(
                    "event=attendance_upsert module=repo status=create student_id={student_id} date={date}"
                );
                self.create(&draft).await
            }
        }
    }
}
