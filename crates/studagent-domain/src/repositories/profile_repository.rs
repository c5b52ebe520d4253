//! Profile Repository Interface

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::FeatureVector;

/// Repository: feature vectors derived from profiles
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Feature vector of an entity
    ///
    /// Returns `Error::NotFound` when the entity has no profile.
    async fn feature_vector(&self, entity_id: &str) -> Result<FeatureVector>;
}
