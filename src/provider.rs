use async_trait::async_trait;

use crate::error::EmbeddingError;

/// Turns one text into one embedding vector.
///
/// `input_type` is the provider's embedding mode tag (`search_query`,
/// `search_document`, ...). It is forwarded as given; rejecting unknown values
/// is left to the provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str, input_type: &str) -> Result<Vec<f64>, EmbeddingError>;
}
