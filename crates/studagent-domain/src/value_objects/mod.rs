//! Domain Value Objects
//!
//! Immutable values without identity, compared by their attributes.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Capability`] | Kind of generation a provider can perform |
//! | [`GenerationConstraints`] | Limits and hints for a single generation call |
//! | [`GenerationOutput`] | Normalized provider reply |
//! | [`ProviderDescriptor`] | Immutable description of a configured provider |
//! | [`ProviderHealthSnapshot`] | Read-only view of a provider's breaker |
//! | [`FeatureVector`] | Normalized token sets describing a profile |
//! | [`MatchWeights`] | Validated per-category weights |
//! | [`MatchResult`] | One ranked candidate |

/// Generation capabilities
pub mod capability;
/// Generation request and response values
pub mod generation;
/// Provider health snapshots
pub mod health;
/// Matching feature vectors, weights and results
pub mod matching;
/// Provider descriptors
pub mod provider;

pub use capability::Capability;
pub use generation::{GenerationConstraints, GenerationOutput};
pub use health::{CircuitState, ProviderHealthSnapshot};
pub use matching::{FeatureCategory, FeatureSet, FeatureVector, MatchResult, MatchWeights};
pub use provider::ProviderDescriptor;
