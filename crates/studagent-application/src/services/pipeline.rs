//! Document Pipeline
//!
//! Turns the extracted text of a document into three generation tasks run
//! in fixed order: summary, flashcards, quiz. A failed task is recorded and
//! its siblings still run. Runs are idempotent per document and input text.

use std::sync::Arc;

use dashmap::DashMap;
use futures::{StreamExt, stream};
use studagent_domain::constants::{
    PIPELINE_FLASHCARD_COUNT, PIPELINE_MAX_CHARS, PIPELINE_MIN_CHARS, PIPELINE_PROMPT_CHARS,
    PIPELINE_QUIZ_QUESTIONS,
};
use studagent_domain::entities::{
    Flashcard, GenerationPayload, GenerationTask, PipelineResult, QuizQuestion, StudySummary,
    TaskKind,
};
use studagent_domain::error::{Error, Result};
use studagent_domain::repositories::DocumentStore;
use studagent_domain::value_objects::GenerationConstraints;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::prompts::{flashcard_prompt, quiz_prompt, summary_prompt, truncate_chars};
use super::reply::{extract_json, parse_list};
use crate::ports::services::GenerationService;

/// Default number of documents processed concurrently by `run_many`
pub const DEFAULT_PIPELINE_CONCURRENCY: usize = 4;

/// Limits applied by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Minimum accepted text length, in characters
    pub min_chars: usize,
    /// Maximum accepted text length, in characters
    pub max_chars: usize,
    /// Characters of source text placed in a prompt
    pub prompt_chars: usize,
    /// Flashcards requested per document
    pub flashcard_count: usize,
    /// Quiz questions requested per document
    pub quiz_questions: usize,
    /// Documents processed concurrently by `run_many`
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_chars: PIPELINE_MIN_CHARS,
            max_chars: PIPELINE_MAX_CHARS,
            prompt_chars: PIPELINE_PROMPT_CHARS,
            flashcard_count: PIPELINE_FLASHCARD_COUNT,
            quiz_questions: PIPELINE_QUIZ_QUESTIONS,
            concurrency: DEFAULT_PIPELINE_CONCURRENCY,
        }
    }
}

/// Generates study material for documents
pub struct DocumentPipeline {
    generator: Arc<dyn GenerationService>,
    store: Arc<dyn DocumentStore>,
    config: PipelineConfig,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DocumentPipeline {
    /// Create a pipeline
    pub fn new(
        generator: Arc<dyn GenerationService>,
        store: Arc<dyn DocumentStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            store,
            config,
            locks: DashMap::new(),
        }
    }

    /// Reject empty or out-of-bounds text
    pub fn validate_text(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::validation("Document text is empty"));
        }
        let chars = text.chars().count();
        if chars < self.config.min_chars {
            return Err(Error::validation(format!(
                "Document text has {chars} characters, minimum is {}",
                self.config.min_chars
            )));
        }
        if chars > self.config.max_chars {
            return Err(Error::validation(format!(
                "Document text has {chars} characters, maximum is {}",
                self.config.max_chars
            )));
        }
        Ok(())
    }

    /// Run the pipeline for one document
    ///
    /// Concurrent runs for the same document are serialized. Succeeded
    /// and failed tasks are left untouched; pending tasks are resumed.
    pub async fn run(&self, document_id: &str) -> Result<PipelineResult> {
        let text = self.store.document_text(document_id).await?;
        self.validate_text(&text)?;

        let lock = self
            .locks
            .entry(document_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let result = {
            let _guard = lock.lock().await;
            self.run_locked(document_id, &text).await
        };
        drop(lock);
        self.locks
            .remove_if(document_id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Run the pipeline for many documents with bounded concurrency
    ///
    /// Results are returned in input order; one document failing does not
    /// affect the others.
    pub async fn run_many(&self, document_ids: &[String]) -> Vec<(String, Result<PipelineResult>)> {
        stream::iter(document_ids.iter().cloned())
            .map(|id| async move {
                let result = self.run(&id).await;
                (id, result)
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await
    }

    async fn run_locked(&self, document_id: &str, text: &str) -> Result<PipelineResult> {
        let input_hash = GenerationTask::hash_input(text);
        let mut tasks = self.load_or_create_tasks(document_id, &input_hash).await?;
        tasks.sort_by_key(GenerationTask::kind);

        let mut summary_context: Option<String> = None;
        for task in &mut tasks {
            if !task.status().is_terminal() {
                self.run_task(task, text, summary_context.as_deref()).await?;
            } else {
                debug!(
                    document_id,
                    task_id = task.id(),
                    kind = %task.kind(),
                    status = %task.status(),
                    "Task already finished, skipping"
                );
            }
            if let Some(GenerationPayload::Summary(summary)) = task.output() {
                summary_context = Some(condensed(summary));
            }
        }

        let result = PipelineResult::from_tasks(document_id, tasks);
        info!(document_id, status = %result.status, "Document pipeline finished");
        Ok(result)
    }

    async fn load_or_create_tasks(
        &self,
        document_id: &str,
        input_hash: &str,
    ) -> Result<Vec<GenerationTask>> {
        let existing = self.store.tasks_for_document(document_id).await?;
        let reusable = !existing.is_empty()
            && existing.iter().all(|t| t.input_hash() == input_hash)
            && TaskKind::ORDERED
                .iter()
                .all(|kind| existing.iter().filter(|t| t.kind() == *kind).count() == 1);
        if reusable {
            return Ok(existing);
        }
        if !existing.is_empty() {
            info!(document_id, "Document text changed, replacing generation tasks");
        }
        let tasks: Vec<_> = TaskKind::ORDERED
            .iter()
            .map(|kind| GenerationTask::new(document_id, *kind, input_hash))
            .collect();
        self.store.replace_tasks(document_id, &tasks).await?;
        Ok(tasks)
    }

    async fn run_task(
        &self,
        task: &mut GenerationTask,
        text: &str,
        summary_context: Option<&str>,
    ) -> Result<()> {
        task.start()?;
        self.store
            .set_task_status(task.id(), task.to_status_update())
            .await?;

        let excerpt = truncate_chars(text, self.config.prompt_chars);
        let content = summary_context.unwrap_or(excerpt);
        let prompt = match task.kind() {
            TaskKind::Summary => summary_prompt(excerpt),
            TaskKind::Flashcards => flashcard_prompt(content, self.config.flashcard_count),
            TaskKind::Quiz => quiz_prompt(content, self.config.quiz_questions),
        };
        let constraints = GenerationConstraints::new().json();

        match self
            .generator
            .execute(task.kind().capability(), &prompt, &constraints)
            .await
        {
            Ok(output) => match self.parse_payload(task.kind(), &output.text) {
                Some(payload) => {
                    task.succeed(payload.clone(), output.provider)?;
                    self.store
                        .set_generation_output(task.id(), &payload)
                        .await?;
                }
                None => {
                    let err = Error::task_failed(
                        task.id(),
                        format!("unparseable {} reply from {}", task.kind(), output.provider),
                    );
                    warn!(task_id = task.id(), error = %err, "Generation task failed");
                    task.fail(err.to_string(), Some(output.provider))?;
                }
            },
            Err(err) => {
                warn!(
                    task_id = task.id(),
                    kind = %task.kind(),
                    error = %err,
                    "Generation task failed"
                );
                task.fail(err.to_string(), None)?;
            }
        }

        self.store
            .set_task_status(task.id(), task.to_status_update())
            .await
    }

    fn parse_payload(&self, kind: TaskKind, reply: &str) -> Option<GenerationPayload> {
        match kind {
            TaskKind::Summary => Some(GenerationPayload::Summary(parse_summary(reply))),
            TaskKind::Flashcards => parse_list::<Flashcard>(reply, &["flashcards", "cards"])
                .map(|mut cards| {
                    cards.truncate(self.config.flashcard_count.max(1));
                    GenerationPayload::Flashcards(cards)
                }),
            TaskKind::Quiz => parse_list::<QuizQuestion>(reply, &["questions", "quiz"])
                .map(|mut questions| {
                    questions.truncate(self.config.quiz_questions.max(1));
                    GenerationPayload::Quiz(questions)
                }),
        }
    }
}

/// Structured summary, or the raw reply when it carries no usable JSON
fn parse_summary(reply: &str) -> StudySummary {
    extract_json(reply)
        .and_then(|value| serde_json::from_value::<StudySummary>(value).ok())
        .filter(|summary| !summary.summary.trim().is_empty())
        .unwrap_or_else(|| StudySummary {
            summary: reply.trim().to_string(),
            ..StudySummary::default()
        })
}

/// Summary text used as context for the later tasks
fn condensed(summary: &StudySummary) -> String {
    let mut out = summary.summary.clone();
    if !summary.key_points.is_empty() {
        out.push_str("\nKey points:\n");
        for point in &summary.key_points {
            out.push_str("- ");
            out.push_str(point);
            out.push('\n');
        }
    }
    out
}
