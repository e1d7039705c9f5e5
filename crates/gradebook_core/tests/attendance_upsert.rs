use gradebook_core::client::protocol::Filter;
use gradebook_core::{
    table_schemas, AttendanceRepository, GradebookService, MemoryNotifier, SqliteRecordClient,
};
use std::sync::Arc;

fn repository() -> AttendanceRepository<SqliteRecordClient> {
    let client = Arc::new(SqliteRecordClient::open_in_memory(table_schemas()).unwrap());
    AttendanceRepository::new(client, Arc::new(MemoryNotifier::new()))
}

async fn rows_for(
    repo: &AttendanceRepository<SqliteRecordClient>,
    student_id: i64,
    date: &str,
) -> usize {
    repo.find_where(vec![
        Filter::equal_to("studentId", student_id),
        Filter::equal_to("date", date),
    ])
    .await
    .unwrap()
    .len()
}

#[tokio::test]
async fn upsert_creates_once_then_updates_same_record() {
    let repo = repository();

    let created = repo
        .update_by_student_and_date(42, "2024-01-01", "present", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.status.as_deref(), Some("present"));
    assert_eq!(created.reason.as_deref(), Some(""));
    assert_eq!(created.name, "Attendance - 2024-01-01");

    let updated = repo
        .update_by_student_and_date(42, "2024-01-01", "absent", Some("sick"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status.as_deref(), Some("absent"));
    assert_eq!(updated.reason.as_deref(), Some("sick"));

    assert_eq!(rows_for(&repo, 42, "2024-01-01").await, 1);
    assert_eq!(repo.get_all().await.len(), 1);
}

#[tokio::test]
async fn upsert_keys_on_both_student_and_date() {
    let repo = repository();

    let first = repo
        .update_by_student_and_date(42, "2024-01-01", "present", None)
        .await
        .unwrap()
        .unwrap();
    let next_day = repo
        .update_by_student_and_date(42, "2024-01-02", "late", None)
        .await
        .unwrap()
        .unwrap();
    let other_student = repo
        .update_by_student_and_date(7, "2024-01-01", "present", None)
        .await
        .unwrap()
        .unwrap();

    assert_ne!(first.id, next_day.id);
    assert_ne!(first.id, other_student.id);
    assert_eq!(repo.get_all().await.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_upserts_through_one_repository_do_not_duplicate() {
    let repo = Arc::new(repository());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                let status = if i % 2 == 0 { "present" } else { "late" };
                repo.update_by_student_and_date(42, "2024-01-01", status, None)
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap().unwrap();
    }

    assert_eq!(rows_for(&repo, 42, "2024-01-01").await, 1);
}

#[tokio::test]
async fn service_marks_attendance_through_the_shared_client() {
    let client = Arc::new(SqliteRecordClient::open_in_memory(table_schemas()).unwrap());
    let service = GradebookService::new(client, Arc::new(MemoryNotifier::new()));

    let first = service
        .mark_attendance(5, "2024-03-04", "present", None)
        .await
        .unwrap()
        .unwrap();
    let second = service
        .mark_attendance(5, "2024-03-04", "excused", Some("field trip"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id);
    let stored = service.attendance().get_by_id(first.id).await.unwrap();
    assert_eq!(stored.status.as_deref(), Some("excused"));
    assert!(service.students().get_all().await.is_empty());
    assert!(service.classes().get_all().await.is_empty());
    assert!(service.grades().get_all().await.is_empty());
}
