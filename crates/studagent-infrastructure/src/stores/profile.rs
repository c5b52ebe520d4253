//! In-memory profile repository

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use studagent_domain::error::{Error, Result};
use studagent_domain::repositories::ProfileRepository;
use studagent_domain::value_objects::FeatureVector;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error_ext::ErrorContext;

/// Feature vectors held in process memory
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    vectors: RwLock<HashMap<String, FeatureVector>>,
}

impl InMemoryProfileRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository from vectors; later duplicates win
    pub fn from_vectors<I: IntoIterator<Item = FeatureVector>>(vectors: I) -> Self {
        Self {
            vectors: RwLock::new(
                vectors
                    .into_iter()
                    .map(|v| (v.entity_id.clone(), v))
                    .collect(),
            ),
        }
    }

    /// Load a JSON array of feature vectors
    ///
    /// ```json
    /// [{"entity_id": "s1", "features": {"interest": ["ML", "chess"]}}]
    /// ```
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .io_context(format!("Failed to read profiles from {}", path.display()))?;
        let vectors: Vec<FeatureVector> = serde_json::from_str(&raw)?;
        if let Some(blank) = vectors.iter().find(|v| v.entity_id.trim().is_empty()) {
            return Err(Error::validation(format!(
                "Profile file {} has an entry without entity_id: {blank:?}",
                path.display()
            )));
        }
        debug!(path = %path.display(), profiles = vectors.len(), "Profiles loaded");
        Ok(Self::from_vectors(vectors))
    }

    /// Insert or replace a vector
    pub async fn upsert(&self, vector: FeatureVector) {
        self.vectors
            .write()
            .await
            .insert(vector.entity_id.clone(), vector);
    }

    /// Identifiers of all stored profiles, sorted
    pub async fn entity_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.vectors.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn feature_vector(&self, entity_id: &str) -> Result<FeatureVector> {
        self.vectors
            .read()
            .await
            .get(entity_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("profile {entity_id}")))
    }
}
