//! Domain Entities
//!
//! Entities carry identity and a lifecycle. Their state transitions are
//! methods on the entity so the invariants cannot be bypassed.

/// Document pipeline status and result
pub mod document;
/// Generation tasks and their payloads
pub mod task;

pub use document::{DocumentStatus, PipelineResult};
pub use task::{
    Flashcard, GenerationPayload, GenerationTask, QuizQuestion, StudySummary, TaskKind,
    TaskStatus, TaskStatusUpdate,
};
