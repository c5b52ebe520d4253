use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::value_objects::Capability;

/// Kind of study material a task produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskKind {
    /// Structured summary
    #[serde(rename = "summary")]
    Summary,
    /// Question/answer flashcards
    #[serde(rename = "flashcard-set")]
    Flashcards,
    /// Multiple-choice quiz
    #[serde(rename = "quiz")]
    Quiz,
}

impl TaskKind {
    /// Fixed execution order of a document's tasks
    pub const ORDERED: [TaskKind; 3] = [TaskKind::Summary, TaskKind::Flashcards, TaskKind::Quiz];

    /// Capability the orchestrator is asked for
    pub fn capability(&self) -> Capability {
        match self {
            Self::Summary => Capability::Summarize,
            Self::Flashcards => Capability::GenerateFlashcards,
            Self::Quiz => Capability::GenerateQuiz,
        }
    }

    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Flashcards => "flashcard-set",
            Self::Quiz => "quiz",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, not started
    Pending,
    /// A provider call is in progress
    Running,
    /// Output stored
    Succeeded,
    /// Gave up; not retried automatically
    Failed,
}

impl TaskStatus {
    /// Whether the status is final
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Structured document summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudySummary {
    /// Short title
    #[serde(default)]
    pub title: String,
    /// Summary paragraph(s)
    #[serde(default)]
    pub summary: String,
    /// Key points
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Suggested further reading
    #[serde(default)]
    pub recommended_reading: Vec<String>,
}

/// One flashcard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Front side
    #[serde(alias = "q")]
    pub question: String,
    /// Back side
    #[serde(alias = "a")]
    pub answer: String,
}

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text
    pub question: String,
    /// Answer options
    pub options: Vec<String>,
    /// Correct option
    #[serde(alias = "correct_answer")]
    pub answer: String,
    /// Why the answer is correct
    #[serde(default)]
    pub explanation: String,
    /// Difficulty label (easy, medium, hard)
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// Output of a succeeded task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GenerationPayload {
    /// Output of a summary task
    Summary(StudySummary),
    /// Output of a flashcard task
    Flashcards(Vec<Flashcard>),
    /// Output of a quiz task
    Quiz(Vec<QuizQuestion>),
}

impl GenerationPayload {
    /// Task kind this payload belongs to
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Summary(_) => TaskKind::Summary,
            Self::Flashcards(_) => TaskKind::Flashcards,
            Self::Quiz(_) => TaskKind::Quiz,
        }
    }
}

/// Status change written to the storage collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    /// New status
    pub status: TaskStatus,
    /// Failure detail, set when failed
    pub error: Option<String>,
    /// Attempts so far
    pub attempts: u32,
    /// Provider that served the last attempt
    pub provider: Option<String>,
    /// Time of the transition
    pub updated_at: DateTime<Utc>,
}

/// A unit of AI generation for one document
///
/// Fields are private: a task only carries output once it has succeeded,
/// and the transition methods are the only way to change its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct GenerationTask {
    id: String,
    document_id: String,
    kind: TaskKind,
    input_hash: String,
    status: TaskStatus,
    output: Option<GenerationPayload>,
    error: Option<String>,
    attempts: u32,
    provider: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GenerationTask {
    /// Create a pending task for a document
    pub fn new<D, H>(document_id: D, kind: TaskKind, input_hash: H) -> Self
    where
        D: Into<String>,
        H: Into<String>,
    {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            document_id: document_id.into(),
            kind,
            input_hash: input_hash.into(),
            status: TaskStatus::Pending,
            output: None,
            error: None,
            attempts: 0,
            provider: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Idempotency key of an input text (hex SHA-256)
    pub fn hash_input(text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    /// Task identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owning document
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Task kind
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// SHA-256 of the input text the task was created for
    pub fn input_hash(&self) -> &str {
        &self.input_hash
    }

    /// Current status
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Output payload, present only when succeeded
    pub fn output(&self) -> Option<&GenerationPayload> {
        self.output.as_ref()
    }

    /// Failure detail
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of started attempts
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Provider that served the last attempt
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last transition time
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// PENDING or RUNNING → RUNNING, counting an attempt
    ///
    /// A task left RUNNING by an interrupted run may be started again.
    pub fn start(&mut self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(self.invalid_transition(TaskStatus::Running));
        }
        self.status = TaskStatus::Running;
        self.attempts += 1;
        self.error = None;
        self.touch();
        Ok(())
    }

    /// RUNNING → SUCCEEDED with output
    pub fn succeed<P: Into<String>>(&mut self, output: GenerationPayload, provider: P) -> Result<()> {
        if self.status != TaskStatus::Running {
            return Err(self.invalid_transition(TaskStatus::Succeeded));
        }
        if output.kind() != self.kind {
            return Err(Error::internal(format!(
                "Task {} of kind {} cannot hold {} output",
                self.id,
                self.kind,
                output.kind()
            )));
        }
        self.status = TaskStatus::Succeeded;
        self.output = Some(output);
        self.error = None;
        self.provider = Some(provider.into());
        self.touch();
        Ok(())
    }

    /// RUNNING → FAILED with an error detail
    pub fn fail<S: Into<String>>(&mut self, error: S, provider: Option<String>) -> Result<()> {
        if self.status != TaskStatus::Running {
            return Err(self.invalid_transition(TaskStatus::Failed));
        }
        self.status = TaskStatus::Failed;
        self.output = None;
        self.error = Some(error.into());
        if provider.is_some() {
            self.provider = provider;
        }
        self.touch();
        Ok(())
    }

    /// Status change to persist after a transition
    pub fn to_status_update(&self) -> TaskStatusUpdate {
        TaskStatusUpdate {
            status: self.status,
            error: self.error.clone(),
            attempts: self.attempts,
            provider: self.provider.clone(),
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn invalid_transition(&self, to: TaskStatus) -> Error {
        Error::internal(format!(
            "Invalid task transition for {}: {} -> {}",
            self.id, self.status, to
        ))
    }
}

/// Unchecked wire form, validated into a [`GenerationTask`]
#[derive(Deserialize)]
struct TaskRecord {
    id: String,
    document_id: String,
    kind: TaskKind,
    input_hash: String,
    status: TaskStatus,
    #[serde(default)]
    output: Option<GenerationPayload>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    provider: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for GenerationTask {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self> {
        match (&record.status, &record.output) {
            (TaskStatus::Succeeded, None) => {
                return Err(Error::validation(format!(
                    "Task {} is succeeded but has no output",
                    record.id
                )));
            }
            (status, Some(_)) if *status != TaskStatus::Succeeded => {
                return Err(Error::validation(format!(
                    "Task {} is {} but carries output",
                    record.id, status
                )));
            }
            (_, Some(output)) if output.kind() != record.kind => {
                return Err(Error::validation(format!(
                    "Task {} output does not match kind {}",
                    record.id, record.kind
                )));
            }
            _ => {}
        }
        Ok(Self {
            id: record.id,
            document_id: record.document_id,
            kind: record.kind,
            input_hash: record.input_hash,
            status: record.status,
            output: record.output,
            error: record.error,
            attempts: record.attempts,
            provider: record.provider,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
