//! Document Store Interface

use async_trait::async_trait;

use crate::entities::{GenerationPayload, GenerationTask, TaskStatusUpdate};
use crate::error::Result;

/// Repository: documents and their generation tasks
///
/// The pipeline reads extracted text and writes every task transition
/// through this port. Implementations must make each call atomic.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Extracted plain text of a document
    ///
    /// Returns `Error::NotFound` when the document does not exist.
    async fn document_text(&self, document_id: &str) -> Result<String>;

    /// Current task set of a document, empty if none was created
    async fn tasks_for_document(&self, document_id: &str) -> Result<Vec<GenerationTask>>;

    /// Replace a document's task set
    async fn replace_tasks(&self, document_id: &str, tasks: &[GenerationTask]) -> Result<()>;

    /// Persist a task status change
    async fn set_task_status(&self, task_id: &str, update: TaskStatusUpdate) -> Result<()>;

    /// Persist the output of a succeeded task
    async fn set_generation_output(&self, task_id: &str, payload: &GenerationPayload)
    -> Result<()>;
}
