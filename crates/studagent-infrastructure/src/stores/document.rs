//! In-memory document store
//!
//! Task rows are kept as JSON, the way a relational collaborator stores
//! them, and validated when read back. Outputs live beside the rows and
//! are joined in only for succeeded tasks.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};
use studagent_domain::entities::{GenerationPayload, GenerationTask, TaskStatus, TaskStatusUpdate};
use studagent_domain::error::{Error, Result};
use studagent_domain::repositories::DocumentStore;
use tokio::sync::RwLock;

use crate::error_ext::ErrorContext;

#[derive(Debug, Default)]
struct Tables {
    texts: HashMap<String, String>,
    // document id -> task rows in pipeline order
    tasks: HashMap<String, Vec<Value>>,
    // task id -> serialized payload
    outputs: HashMap<String, Value>,
}

impl Tables {
    fn task_row(&mut self, task_id: &str) -> Result<&mut Value> {
        self.tasks
            .values_mut()
            .flatten()
            .find(|row| row["id"] == task_id)
            .ok_or_else(|| Error::not_found(format!("task {task_id}")))
    }
}

/// Document store held in process memory
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    tables: RwLock<Tables>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the extracted text of a document
    ///
    /// Existing tasks are kept; the pipeline detects the changed text.
    pub async fn put_document(&self, document_id: &str, text: &str) {
        self.tables
            .write()
            .await
            .texts
            .insert(document_id.to_string(), text.to_string());
    }

    /// Remove a document with its tasks and outputs
    pub async fn remove_document(&self, document_id: &str) -> bool {
        let mut tables = self.tables.write().await;
        let removed = tables.texts.remove(document_id).is_some();
        if let Some(rows) = tables.tasks.remove(document_id) {
            for row in rows {
                if let Some(id) = row["id"].as_str() {
                    tables.outputs.remove(id);
                }
            }
        }
        removed
    }

    /// Number of stored documents
    pub async fn document_count(&self) -> usize {
        self.tables.read().await.texts.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn document_text(&self, document_id: &str) -> Result<String> {
        self.tables
            .read()
            .await
            .texts
            .get(document_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("document {document_id}")))
    }

    async fn tasks_for_document(&self, document_id: &str) -> Result<Vec<GenerationTask>> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.tasks.get(document_id) else {
            return Ok(Vec::new());
        };
        rows.iter()
            .map(|row| {
                let mut row = row.clone();
                if row["status"] == json!(TaskStatus::Succeeded) {
                    if let Some(output) = row["id"].as_str().and_then(|id| tables.outputs.get(id)) {
                        row["output"] = output.clone();
                    }
                }
                serde_json::from_value(row).storage_context(format!(
                    "Corrupt task row for document {document_id}"
                ))
            })
            .collect()
    }

    async fn replace_tasks(&self, document_id: &str, tasks: &[GenerationTask]) -> Result<()> {
        let mut rows = Vec::with_capacity(tasks.len());
        let mut outputs = Vec::new();
        for task in tasks {
            if task.document_id() != document_id {
                return Err(Error::validation(format!(
                    "Task {} belongs to document {}, not {document_id}",
                    task.id(),
                    task.document_id()
                )));
            }
            let mut row = serde_json::to_value(task)?;
            if let Some(output) = row.get_mut("output").map(Value::take) {
                if !output.is_null() {
                    outputs.push((task.id().to_string(), output));
                }
            }
            rows.push(row);
        }

        let mut tables = self.tables.write().await;
        if let Some(old) = tables.tasks.insert(document_id.to_string(), rows) {
            for row in old {
                if let Some(id) = row["id"].as_str() {
                    tables.outputs.remove(id);
                }
            }
        }
        tables.outputs.extend(outputs);
        Ok(())
    }

    async fn set_task_status(&self, task_id: &str, update: TaskStatusUpdate) -> Result<()> {
        let mut tables = self.tables.write().await;
        let row = tables.task_row(task_id)?;
        row["status"] = json!(update.status);
        row["error"] = json!(update.error);
        row["attempts"] = json!(update.attempts);
        row["provider"] = json!(update.provider);
        row["updated_at"] = json!(update.updated_at);
        if !matches!(update.status, TaskStatus::Succeeded | TaskStatus::Running) {
            tables.outputs.remove(task_id);
        }
        Ok(())
    }

    async fn set_generation_output(
        &self,
        task_id: &str,
        payload: &GenerationPayload,
    ) -> Result<()> {
        let payload = serde_json::to_value(payload)?;
        let mut tables = self.tables.write().await;
        tables.task_row(task_id)?;
        tables.outputs.insert(task_id.to_string(), payload);
        Ok(())
    }
}
