use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::EmbeddingError;
use crate::provider::EmbeddingProvider;

/// A mock embedding provider that always returns the same fixed vector.
///
/// Counts calls and remembers the `input_type` of each one so tests can check
/// what reached the provider.
pub struct MockEmbeddingProvider {
    vector: Vec<f64>,
    calls: AtomicUsize,
    input_types: Mutex<Vec<String>>,
}

impl MockEmbeddingProvider {
    pub fn new(vector: Vec<f64>) -> Self {
        Self {
            vector,
            calls: AtomicUsize::new(0),
            input_types: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Input types seen so far, in call order.
    pub fn input_types(&self) -> Vec<String> {
        self.input_types
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, _text: &str, input_type: &str) -> Result<Vec<f64>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.input_types
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input_type.to_owned());
        Ok(self.vector.clone())
    }
}

/// A mock embedding provider that always returns an error.
pub struct FailingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str, _input_type: &str) -> Result<Vec<f64>, EmbeddingError> {
        Err(EmbeddingError::ApiError("mock failure".to_owned()))
    }
}
