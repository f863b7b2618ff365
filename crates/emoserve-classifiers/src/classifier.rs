//! Classifier trait

use async_trait::async_trait;
use emoserve_core::{Ranking, Result};

/// Capability interface for emotion classification.
///
/// Implementations must be stateless per call: `classify` takes `&self` and
/// the instance is shared read-only across all request handlers for the
/// process lifetime, so concurrent calls with distinct inputs must produce
/// independent rankings.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text, returning all labels ordered by descending
    /// score. The first entry is the model's top prediction.
    async fn classify(&self, text: &str) -> Result<Ranking>;

    /// Identifier of the underlying model (repo id or local path)
    fn model_id(&self) -> &str;
}
