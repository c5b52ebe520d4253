//! Document pipeline tests

use std::sync::Arc;
use std::sync::atomic::Ordering;

use studagent_application::services::{DocumentPipeline, PipelineConfig};
use studagent_domain::repositories::DocumentStore;
use studagent_domain::{
    Capability, DocumentStatus, Error, Flashcard, GenerationPayload, GenerationTask, StudySummary,
    TaskKind, TaskStatus,
};

use crate::support::{MemoryStore, ScriptedGenerator};

const SUMMARY: &str = r#"{"title": "Cells", "summary": "Cells are the unit of life.", "key_points": ["membranes"]}"#;
const CARDS: &str = r#"```json
[{"q": "What is a cell?", "a": "The unit of life"}, {"q": "What bounds it?", "a": "A membrane"}]
```"#;
const QUIZ: &str = r#"{"questions": [{"question": "Unit of life?", "options": ["cell", "atom", "organ", "tissue"], "answer": "cell", "explanation": "By definition", "difficulty": "easy"}]}"#;

fn full_generator() -> ScriptedGenerator {
    ScriptedGenerator::new()
        .answer(Capability::Summarize, SUMMARY)
        .answer(Capability::GenerateFlashcards, CARDS)
        .answer(Capability::GenerateQuiz, QUIZ)
}

fn pipeline(generator: ScriptedGenerator, store: Arc<MemoryStore>) -> (DocumentPipeline, Arc<ScriptedGenerator>) {
    let generator = Arc::new(generator);
    (
        DocumentPipeline::new(generator.clone(), store, PipelineConfig::default()),
        generator,
    )
}

#[tokio::test]
async fn test_full_run_completes_in_order() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "Cells are small."));
    let (pipeline, generator) = pipeline(full_generator(), store.clone());

    let result = pipeline.run("d1").await.unwrap();

    assert_eq!(result.status, DocumentStatus::Complete);
    assert_eq!(
        generator.calls(),
        vec![
            Capability::Summarize,
            Capability::GenerateFlashcards,
            Capability::GenerateQuiz
        ]
    );
    let kinds: Vec<_> = result.tasks.iter().map(|t| t.kind()).collect();
    assert_eq!(kinds, vec![TaskKind::Summary, TaskKind::Flashcards, TaskKind::Quiz]);
    match result.task(TaskKind::Flashcards).and_then(|t| t.output()) {
        Some(GenerationPayload::Flashcards(cards)) => assert_eq!(cards.len(), 2),
        other => panic!("unexpected flashcards output: {other:?}"),
    }

    let stored = store.tasks_for_document("d1").await.unwrap();
    assert!(stored.iter().all(|t| t.status() == TaskStatus::Succeeded));
    assert!(stored.iter().all(|t| t.provider() == Some("stub")));
}

#[tokio::test]
async fn test_empty_text_is_rejected_before_tasks_exist() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "   \n "));
    let (pipeline, generator) = pipeline(full_generator(), store.clone());

    let err = pipeline.run("d1").await.unwrap_err();

    assert!(err.is_validation());
    assert!(generator.calls().is_empty());
    assert!(store.tasks_for_document("d1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_document_is_not_found() {
    let store = Arc::new(MemoryStore::default());
    let (pipeline, _) = pipeline(full_generator(), store);
    assert!(matches!(
        pipeline.run("nope").await,
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_failed_summary_does_not_stop_siblings() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "Cells are small."));
    let generator = ScriptedGenerator::new()
        .exhaust(Capability::Summarize)
        .answer(Capability::GenerateFlashcards, CARDS)
        .answer(Capability::GenerateQuiz, QUIZ);
    let (pipeline, _) = pipeline(generator, store.clone());

    let result = pipeline.run("d1").await.unwrap();

    assert_eq!(result.status, DocumentStatus::Complete);
    let summary = result.task(TaskKind::Summary).unwrap();
    assert_eq!(summary.status(), TaskStatus::Failed);
    assert!(summary.error().unwrap().contains("All providers"));
    let succeeded = result
        .tasks
        .iter()
        .filter(|t| t.status() == TaskStatus::Succeeded)
        .count();
    assert_eq!(succeeded, 2);
}

#[tokio::test]
async fn test_all_tasks_failing_marks_document_failed() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "Cells are small."));
    let generator = ScriptedGenerator::new()
        .exhaust(Capability::Summarize)
        .exhaust(Capability::GenerateFlashcards)
        .exhaust(Capability::GenerateQuiz);
    let (pipeline, _) = pipeline(generator, store);

    let result = pipeline.run("d1").await.unwrap();
    assert_eq!(result.status, DocumentStatus::Failed);
}

#[tokio::test]
async fn test_unparseable_flashcards_fail_the_task() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "Cells are small."));
    let generator = ScriptedGenerator::new()
        .answer(Capability::Summarize, "Plain prose summary.")
        .answer(Capability::GenerateFlashcards, "Sorry, no cards today.")
        .answer(Capability::GenerateQuiz, QUIZ);
    let (pipeline, _) = pipeline(generator, store);

    let result = pipeline.run("d1").await.unwrap();

    let summary = result.task(TaskKind::Summary).unwrap();
    assert_eq!(summary.status(), TaskStatus::Succeeded);
    match summary.output() {
        Some(GenerationPayload::Summary(s)) => assert_eq!(s.summary, "Plain prose summary."),
        other => panic!("unexpected summary output: {other:?}"),
    }
    let cards = result.task(TaskKind::Flashcards).unwrap();
    assert_eq!(cards.status(), TaskStatus::Failed);
    assert_eq!(cards.provider(), Some("stub"));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "Cells are small."));
    let (pipeline, generator) = pipeline(full_generator(), store.clone());

    let first = pipeline.run("d1").await.unwrap();
    let second = pipeline.run("d1").await.unwrap();

    assert_eq!(generator.calls().len(), 3);
    assert_eq!(store.replace_calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert_eq!(second.status, DocumentStatus::Complete);
}

#[tokio::test]
async fn test_failed_task_is_not_retried_on_rerun() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "Cells are small."));
    let generator = ScriptedGenerator::new()
        .exhaust(Capability::Summarize)
        .answer(Capability::GenerateFlashcards, CARDS)
        .answer(Capability::GenerateQuiz, QUIZ);
    let (pipeline, generator) = pipeline(generator, store.clone());

    let first = pipeline.run("d1").await.unwrap();
    let second = pipeline.run("d1").await.unwrap();

    assert_eq!(generator.calls().len(), 3);
    assert_eq!(first, second);
    let summary = second.task(TaskKind::Summary).unwrap();
    assert_eq!(summary.status(), TaskStatus::Failed);
    assert_eq!(summary.attempts(), 1);
}

const TEXT: &str = "Cells are small.";

fn succeeded(kind: TaskKind, payload: GenerationPayload) -> GenerationTask {
    let mut task = GenerationTask::new("d1", kind, GenerationTask::hash_input(TEXT));
    task.start().unwrap();
    task.succeed(payload, "stub").unwrap();
    task
}

fn summary_task() -> GenerationTask {
    succeeded(
        TaskKind::Summary,
        GenerationPayload::Summary(StudySummary {
            summary: "Cells are the unit of life.".to_string(),
            ..StudySummary::default()
        }),
    )
}

#[tokio::test]
async fn test_interrupted_running_task_is_resumed() {
    let store = Arc::new(MemoryStore::default().with_document("d1", TEXT));
    let cards = succeeded(
        TaskKind::Flashcards,
        GenerationPayload::Flashcards(vec![Flashcard {
            question: "What is a cell?".to_string(),
            answer: "The unit of life".to_string(),
        }]),
    );
    let mut quiz = GenerationTask::new("d1", TaskKind::Quiz, GenerationTask::hash_input(TEXT));
    quiz.start().unwrap();
    store
        .replace_tasks("d1", &[summary_task(), cards, quiz.clone()])
        .await
        .unwrap();
    let (pipeline, generator) = pipeline(full_generator(), store.clone());

    let result = pipeline.run("d1").await.unwrap();

    assert_eq!(generator.calls(), vec![Capability::GenerateQuiz]);
    assert_eq!(store.replace_calls.load(Ordering::SeqCst), 1);
    let resumed = result.task(TaskKind::Quiz).unwrap();
    assert_eq!(resumed.id(), quiz.id());
    assert_eq!(resumed.attempts(), 2);
    assert_eq!(resumed.status(), TaskStatus::Succeeded);
    assert_eq!(result.status, DocumentStatus::Complete);
}

#[tokio::test]
async fn test_pending_task_is_resumed() {
    let store = Arc::new(MemoryStore::default().with_document("d1", TEXT));
    let cards = GenerationTask::new("d1", TaskKind::Flashcards, GenerationTask::hash_input(TEXT));
    let mut quiz = GenerationTask::new("d1", TaskKind::Quiz, GenerationTask::hash_input(TEXT));
    quiz.start().unwrap();
    quiz.fail("All providers exhausted", None).unwrap();
    store
        .replace_tasks("d1", &[summary_task(), cards.clone(), quiz.clone()])
        .await
        .unwrap();
    let (pipeline, generator) = pipeline(full_generator(), store.clone());

    let result = pipeline.run("d1").await.unwrap();

    assert_eq!(generator.calls(), vec![Capability::GenerateFlashcards]);
    let resumed = result.task(TaskKind::Flashcards).unwrap();
    assert_eq!(resumed.id(), cards.id());
    assert_eq!(resumed.attempts(), 1);
    assert_eq!(resumed.status(), TaskStatus::Succeeded);
    assert_eq!(result.task(TaskKind::Quiz), Some(&quiz));
    assert_eq!(result.status, DocumentStatus::Complete);
}

#[tokio::test]
async fn test_changed_text_replaces_tasks() {
    let store = Arc::new(MemoryStore::default().with_document("d1", "Cells are small."));
    let (pipeline, generator) = pipeline(full_generator(), store.clone());

    pipeline.run("d1").await.unwrap();
    store.set_text("d1", "Mitochondria make energy.");
    pipeline.run("d1").await.unwrap();

    assert_eq!(generator.calls().len(), 6);
    assert_eq!(store.replace_calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.tasks_for_document("d1").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_text_bounds_are_enforced() {
    let store = Arc::new(MemoryStore::default());
    let generator = Arc::new(full_generator());
    let pipeline = DocumentPipeline::new(
        generator,
        store,
        PipelineConfig {
            min_chars: 5,
            max_chars: 10,
            ..PipelineConfig::default()
        },
    );
    assert!(pipeline.validate_text("abc").unwrap_err().is_validation());
    assert!(pipeline.validate_text("abcdefghijk").unwrap_err().is_validation());
    assert!(pipeline.validate_text("abcdef").is_ok());
}

#[tokio::test]
async fn test_run_many_keeps_input_order() {
    let store = Arc::new(
        MemoryStore::default()
            .with_document("d1", "Cells are small.")
            .with_document("d2", "Atoms are smaller."),
    );
    let (pipeline, _) = pipeline(full_generator(), store);

    let ids = vec!["d2".to_string(), "missing".to_string(), "d1".to_string()];
    let results = pipeline.run_many(&ids).await;

    let order: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, vec!["d2", "missing", "d1"]);
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());
    assert!(results[2].1.is_ok());
}
