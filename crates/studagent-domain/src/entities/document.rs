use serde::{Deserialize, Serialize};

use super::task::{GenerationTask, TaskKind, TaskStatus};

/// Processing state of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Stored, text not yet extracted
    Uploaded,
    /// Text available, no study material yet
    Extracted,
    /// Summary ready
    Summarized,
    /// Flashcards ready
    FlashcardsReady,
    /// Quiz ready
    QuizReady,
    /// Every task reached a final state and at least one succeeded
    Complete,
    /// Every task failed
    Failed,
}

impl DocumentStatus {
    /// Derive the document status from its task set
    ///
    /// The document is complete once every kind has a terminal task, and
    /// failed only when all of them failed. Otherwise the furthest
    /// succeeded stage wins.
    pub fn from_tasks(tasks: &[GenerationTask]) -> Self {
        if tasks.is_empty() {
            return Self::Extracted;
        }
        let status_of = |kind: TaskKind| {
            tasks
                .iter()
                .find(|task| task.kind() == kind)
                .map(GenerationTask::status)
        };
        let all_terminal = TaskKind::ORDERED
            .iter()
            .all(|kind| status_of(*kind).is_some_and(|s| s.is_terminal()));
        if all_terminal {
            let all_failed = TaskKind::ORDERED
                .iter()
                .all(|kind| status_of(*kind) == Some(TaskStatus::Failed));
            return if all_failed {
                Self::Failed
            } else {
                Self::Complete
            };
        }
        let succeeded = |kind| status_of(kind) == Some(TaskStatus::Succeeded);
        if succeeded(TaskKind::Quiz) {
            Self::QuizReady
        } else if succeeded(TaskKind::Flashcards) {
            Self::FlashcardsReady
        } else if succeeded(TaskKind::Summary) {
            Self::Summarized
        } else {
            Self::Extracted
        }
    }

    /// Whether no further processing will happen automatically
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uploaded => "uploaded",
            Self::Extracted => "extracted",
            Self::Summarized => "summarized",
            Self::FlashcardsReady => "flashcards_ready",
            Self::QuizReady => "quiz_ready",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of running the pipeline for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Document the result belongs to
    pub document_id: String,
    /// Derived document status
    pub status: DocumentStatus,
    /// Tasks in execution order
    pub tasks: Vec<GenerationTask>,
}

impl PipelineResult {
    /// Build a result, deriving the status from the tasks
    pub fn from_tasks<S: Into<String>>(document_id: S, mut tasks: Vec<GenerationTask>) -> Self {
        tasks.sort_by_key(GenerationTask::kind);
        Self {
            document_id: document_id.into(),
            status: DocumentStatus::from_tasks(&tasks),
            tasks,
        }
    }

    /// Task of a given kind
    pub fn task(&self, kind: TaskKind) -> Option<&GenerationTask> {
        self.tasks.iter().find(|task| task.kind() == kind)
    }
}
