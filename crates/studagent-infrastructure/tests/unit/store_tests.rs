//! In-memory collaborator tests

use std::io::Write;

use studagent_domain::repositories::{DocumentStore, ProfileRepository};
use studagent_domain::{
    Error, FeatureCategory, GenerationPayload, GenerationTask, StudySummary, TaskKind, TaskStatus,
};
use studagent_infrastructure::stores::{InMemoryDocumentStore, InMemoryProfileRepository};

fn summary() -> GenerationPayload {
    GenerationPayload::Summary(StudySummary {
        title: "Cells".to_string(),
        summary: "Cells divide.".to_string(),
        ..StudySummary::default()
    })
}

async fn store_with_tasks() -> (InMemoryDocumentStore, Vec<GenerationTask>) {
    let store = InMemoryDocumentStore::new();
    store.put_document("doc-1", "Cells divide.").await;
    let hash = GenerationTask::hash_input("Cells divide.");
    let tasks: Vec<GenerationTask> = TaskKind::ORDERED
        .iter()
        .map(|kind| GenerationTask::new("doc-1", *kind, hash.clone()))
        .collect();
    store.replace_tasks("doc-1", &tasks).await.unwrap();
    (store, tasks)
}

#[tokio::test]
async fn test_document_text_and_missing_document() {
    let store = InMemoryDocumentStore::new();
    store.put_document("doc-1", "text").await;
    assert_eq!(store.document_text("doc-1").await.unwrap(), "text");
    assert!(matches!(
        store.document_text("doc-2").await,
        Err(Error::NotFound { .. })
    ));
    assert!(store.tasks_for_document("doc-2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_task_lifecycle_round_trips_through_rows() {
    let (store, mut tasks) = store_with_tasks().await;
    let task = &mut tasks[0];

    task.start().unwrap();
    store
        .set_task_status(task.id(), task.to_status_update())
        .await
        .unwrap();
    store
        .set_generation_output(task.id(), &summary())
        .await
        .unwrap();
    task.succeed(summary(), "mistral-7b").unwrap();
    store
        .set_task_status(task.id(), task.to_status_update())
        .await
        .unwrap();

    let stored = store.tasks_for_document("doc-1").await.unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].status(), TaskStatus::Succeeded);
    assert_eq!(stored[0].output(), Some(&summary()));
    assert_eq!(stored[0].provider(), Some("mistral-7b"));
    assert_eq!(stored[0].attempts(), 1);
    assert_eq!(stored[0], *task);
    assert_eq!(stored[1].status(), TaskStatus::Pending);
}

#[tokio::test]
async fn test_output_is_hidden_until_success_and_dropped_on_failure() {
    let (store, mut tasks) = store_with_tasks().await;
    let task = &mut tasks[0];

    task.start().unwrap();
    store
        .set_task_status(task.id(), task.to_status_update())
        .await
        .unwrap();
    store
        .set_generation_output(task.id(), &summary())
        .await
        .unwrap();

    // Running rows never expose output
    let running = store.tasks_for_document("doc-1").await.unwrap();
    assert_eq!(running[0].status(), TaskStatus::Running);
    assert!(running[0].output().is_none());

    task.fail("All providers exhausted", None).unwrap();
    store
        .set_task_status(task.id(), task.to_status_update())
        .await
        .unwrap();

    let failed = store.tasks_for_document("doc-1").await.unwrap();
    assert_eq!(failed[0].status(), TaskStatus::Failed);
    assert_eq!(failed[0].error(), Some("All providers exhausted"));
    assert!(failed[0].output().is_none());
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let (store, _) = store_with_tasks().await;
    let err = store
        .set_generation_output("missing", &summary())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_replace_tasks_rejects_foreign_tasks() {
    let store = InMemoryDocumentStore::new();
    let foreign = GenerationTask::new("doc-2", TaskKind::Quiz, "h");
    let err = store.replace_tasks("doc-1", &[foreign]).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_replace_and_remove_document() {
    let (store, _) = store_with_tasks().await;
    let fresh = vec![GenerationTask::new("doc-1", TaskKind::Summary, "other")];
    store.replace_tasks("doc-1", &fresh).await.unwrap();

    let stored = store.tasks_for_document("doc-1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].input_hash(), "other");

    assert!(store.remove_document("doc-1").await);
    assert_eq!(store.document_count().await, 0);
    assert!(store.tasks_for_document("doc-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_profiles_load_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"entity_id": "s1", "features": {{"interest": ["  Machine   Learning ", "Chess"]}}}},
            {{"entity_id": "m1", "features": {{"skill": {{"tokens": ["rust"], "weight": 2.0}}}}}}
        ]"#
    )
    .unwrap();

    let repo = InMemoryProfileRepository::from_json_file(file.path())
        .await
        .unwrap();
    assert_eq!(repo.entity_ids().await, ["m1", "s1"]);

    let s1 = repo.feature_vector("s1").await.unwrap();
    let interests = s1.tokens(FeatureCategory::Interest).unwrap();
    assert!(interests.contains("machine learning"));
    assert!(interests.contains("chess"));

    assert!(matches!(
        repo.feature_vector("nobody").await,
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_profiles_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = InMemoryProfileRepository::from_json_file(dir.path().join("none.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
