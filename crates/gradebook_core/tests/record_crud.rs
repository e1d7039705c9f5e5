use gradebook_core::client::protocol::{Filter, MutationParams};
use gradebook_core::{
    table_schemas, AttendanceDraft, ClassDraft, ClassRepository, GradeDraft, GradeRepository,
    MemoryNotifier, NumberInput, RecordClient, RepoError, SqliteRecordClient, StudentDraft,
    StudentRepository,
};
use serde_json::json;
use std::sync::Arc;

fn backend() -> Arc<SqliteRecordClient> {
    Arc::new(SqliteRecordClient::open_in_memory(table_schemas()).unwrap())
}

fn student(name: &str, grade_level: &str) -> StudentDraft {
    StudentDraft {
        name: name.to_string(),
        email: format!("{}@school.test", name.to_lowercase()),
        phone: "555-0100".to_string(),
        grade_level: grade_level.into(),
        section: "A".to_string(),
        enrollment_date: "2024-09-01".to_string(),
        photo_url: None,
        status: "active".to_string(),
        tags: None,
    }
}

#[tokio::test]
async fn create_then_get_by_id_roundtrip() {
    let notifier = Arc::new(MemoryNotifier::new());
    let repo = StudentRepository::new(backend(), notifier.clone());

    let created = repo.create(&student("Ada", "5")).await.unwrap().unwrap();
    assert_eq!(created.name, "Ada");
    assert_eq!(created.grade_level, Some(5));
    assert_eq!(created.photo_url.as_deref(), Some(""));

    let loaded = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(loaded, created);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn get_by_id_for_missing_record_is_not_found() {
    let repo = StudentRepository::new(backend(), Arc::new(MemoryNotifier::new()));

    let err = repo.get_by_id(404).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, RepoError::NotFound { id: 404, .. }));
    assert_eq!(err.to_string(), "Student not found");
}

#[tokio::test]
async fn create_with_non_numeric_input_returns_none_and_reports_field_errors() {
    let notifier = Arc::new(MemoryNotifier::new());
    let repo = StudentRepository::new(backend(), notifier.clone());

    let created = repo.create(&student("Bob", "abc")).await.unwrap();
    assert!(created.is_none());
    assert_eq!(notifier.messages(), vec!["gradeLevel: Invalid integer value"]);
    assert!(repo.get_all().await.is_empty());
}

#[tokio::test]
async fn get_all_returns_every_record_in_id_order() {
    let repo = ClassRepository::new(backend(), Arc::new(MemoryNotifier::new()));

    for (name, capacity) in [("7A", "30"), ("7B", "28 seats")] {
        repo.create(&ClassDraft {
            name: name.to_string(),
            grade_level: NumberInput::Integer(7),
            section: name[1..].to_string(),
            capacity: capacity.into(),
            teacher_id: Some("T-1".to_string()),
            tags: None,
        })
        .await
        .unwrap()
        .unwrap();
    }

    let classes = repo.get_all().await;
    let summary: Vec<(&str, Option<i64>)> = classes
        .iter()
        .map(|class| (class.name.as_str(), class.capacity))
        .collect();
    assert_eq!(summary, vec![("7A", Some(30)), ("7B", Some(28))]);
    assert!(classes[0].id < classes[1].id);
}

#[tokio::test]
async fn get_all_keeps_rows_written_with_other_value_types() {
    let client = backend();
    let notifier = Arc::new(MemoryNotifier::new());
    let repo = ClassRepository::new(client.clone(), notifier.clone());
    repo.create(&ClassDraft {
        name: "7A".to_string(),
        grade_level: NumberInput::Integer(7),
        section: "A".to_string(),
        capacity: NumberInput::Integer(30),
        teacher_id: Some("T-1".to_string()),
        tags: None,
    })
    .await
    .unwrap()
    .unwrap();

    let written = client
        .create_record(
            "class",
            &MutationParams::single(
                json!({
                    "Name": "7B",
                    "gradeLevel": 7,
                    "section": "B",
                    "capacity": 28,
                    "teacherId": 12,
                    "Tags": ["lab"]
                })
                .as_object()
                .cloned()
                .unwrap(),
            ),
        )
        .await
        .unwrap();
    assert!(written.success);

    let classes = repo.get_all().await;
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[1].name, "7B");
    assert_eq!(classes[1].teacher_id.as_deref(), Some("12"));
    assert_eq!(classes[1].tags.as_deref(), Some(r#"["lab"]"#));
    assert!(notifier.messages().is_empty());

    let loaded = repo.get_by_id(classes[1].id).await.unwrap();
    assert_eq!(loaded, classes[1]);
}

#[tokio::test]
async fn update_replaces_every_attribute_and_keeps_id() {
    let repo = GradeRepository::new(backend(), Arc::new(MemoryNotifier::new()));
    let draft = GradeDraft {
        subject: "Math".to_string(),
        score: "45".into(),
        max_score: "50".into(),
        grade_type: "Quiz".to_string(),
        semester: "Fall".to_string(),
        date: "2024-10-01".to_string(),
        student_id: NumberInput::Integer(42),
        tags: Some("midterm".to_string()),
    };
    let created = repo.create(&draft).await.unwrap().unwrap();
    assert_eq!(created.name, "Math - Quiz");
    assert_eq!(created.score, Some(45.0));
    assert_eq!(created.max_score, Some(50.0));

    let revised = GradeDraft {
        score: NumberInput::Float(48.5),
        grade_type: "Retake".to_string(),
        tags: None,
        ..draft
    };
    let updated = repo.update(created.id, &revised).await.unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Math - Retake");
    assert_eq!(updated.score, Some(48.5));
    assert_eq!(updated.tags, None);

    let loaded = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(loaded, updated);
}

#[tokio::test]
async fn update_of_unknown_id_returns_none_and_notifies() {
    let notifier = Arc::new(MemoryNotifier::new());
    let repo = StudentRepository::new(backend(), notifier.clone());

    let updated = repo.update(77, &student("Ghost", "3")).await.unwrap();
    assert!(updated.is_none());
    assert_eq!(notifier.messages(), vec!["Record 77 not found"]);
}

#[tokio::test]
async fn delete_removes_record_and_fails_for_unknown_id() {
    let notifier = Arc::new(MemoryNotifier::new());
    let repo = StudentRepository::new(backend(), notifier.clone());
    let created = repo.create(&student("Cleo", "6")).await.unwrap().unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert!(repo.get_by_id(created.id).await.unwrap_err().is_not_found());

    let err = repo.delete(created.id).await.unwrap_err();
    assert!(matches!(err, RepoError::PartialBatch { failed: 1, .. }));
    assert_eq!(err.to_string(), "Failed to delete student");
    assert_eq!(
        notifier.messages(),
        vec![format!("Record {} not found", created.id)]
    );
}

#[tokio::test]
async fn tables_are_isolated_from_each_other() {
    let client = backend();
    let notifier = Arc::new(MemoryNotifier::new());
    let students = StudentRepository::new(client.clone(), notifier.clone());
    let classes = ClassRepository::new(client, notifier);

    let created = students.create(&student("Dan", "4")).await.unwrap().unwrap();
    assert!(classes.get_all().await.is_empty());
    assert!(classes.get_by_id(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn find_where_filters_on_every_clause() {
    let repo = gradebook_core::AttendanceRepository::new(backend(), Arc::new(MemoryNotifier::new()));
    for (student_id, date) in [(1, "2024-01-01"), (1, "2024-01-02"), (2, "2024-01-01")] {
        repo.create(&AttendanceDraft {
            student_id: NumberInput::Integer(student_id),
            date: date.to_string(),
            status: "present".to_string(),
            ..AttendanceDraft::default()
        })
        .await
        .unwrap()
        .unwrap();
    }

    let rows = repo
        .find_where(vec![
            Filter::equal_to("studentId", 1),
            Filter::equal_to("date", "2024-01-01"),
        ])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Attendance - 2024-01-01");
    assert_eq!(rows[0].reason.as_deref(), Some(""));

    let others = repo
        .find_where(vec![Filter::not_equal_to("studentId", 1)])
        .await
        .unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].student_id, Some(2));
}

#[tokio::test]
async fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradebook.sqlite3");

    let id = {
        let client = Arc::new(SqliteRecordClient::open(&path, table_schemas()).unwrap());
        let repo = StudentRepository::new(client, Arc::new(MemoryNotifier::new()));
        repo.create(&student("Eve", "8")).await.unwrap().unwrap().id
    };

    let client = Arc::new(SqliteRecordClient::open(&path, table_schemas()).unwrap());
    let repo = StudentRepository::new(client, Arc::new(MemoryNotifier::new()));
    let loaded = repo.get_by_id(id).await.unwrap();
    assert_eq!(loaded.name, "Eve");
    assert_eq!(loaded.grade_level, Some(8));
}
