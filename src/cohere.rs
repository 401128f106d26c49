use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CohereConfig;
use crate::error::EmbeddingError;
use crate::provider::EmbeddingProvider;

/// Client for a Cohere v3 `embed` endpoint, either api.cohere.com or a
/// serverless deployment exposing the same API.
pub struct CohereClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: Option<String>,
}

impl CohereClient {
    pub fn new(config: CohereConfig) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| EmbeddingError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            url: embed_url(&config.endpoint),
            api_key: config.api_key,
            model: config.model,
        })
    }
}

/// Full URL of the embed route for a deployment base URL.
///
/// Serverless deployments publish their base with the `/v1` prefix already
/// attached, api.cohere.com publishes it bare.
pub fn embed_url(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/embed")
    } else {
        format!("{base}/v1/embed")
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: [&'a str; 1],
    input_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Embeddings,
}

/// Plain responses carry a list of float vectors; responses for requests that
/// name `embedding_types` key the lists by type.
#[derive(Deserialize)]
#[serde(untagged)]
enum Embeddings {
    Floats(Vec<Vec<f64>>),
    ByType { float: Vec<Vec<f64>> },
}

impl Embeddings {
    fn into_first(self) -> Option<Vec<f64>> {
        let vectors = match self {
            Embeddings::Floats(v) | Embeddings::ByType { float: v } => v,
        };
        vectors.into_iter().next()
    }
}

#[async_trait]
impl EmbeddingProvider for CohereClient {
    async fn embed(&self, text: &str, input_type: &str) -> Result<Vec<f64>, EmbeddingError> {
        debug!(
            url = %self.url,
            input_type,
            text_len = text.len(),
            "requesting embedding"
        );

        let request_body = EmbedRequest {
            texts: [text],
            input_type,
            model: self.model.as_deref(),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| transport_error(e, EmbeddingError::HttpError))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read body".to_owned());
            return Err(EmbeddingError::ApiError(format!("status {status}: {body}")));
        }

        let result: EmbedResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, EmbeddingError::ParseError))?;

        result
            .embeddings
            .into_first()
            .ok_or(EmbeddingError::EmptyResponse)
    }
}

/// The client timeout covers reading the body as well as sending, so either
/// step may report it.
fn transport_error(e: reqwest::Error, other: fn(String) -> EmbeddingError) -> EmbeddingError {
    if e.is_timeout() {
        EmbeddingError::Timeout
    } else {
        other(e.to_string())
    }
}

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Provider that resolves its [`CohereConfig`] on every call and builds a
/// fresh [`CohereClient`] from it.
pub struct EnvCohereProvider {
    lookup: Arc<Lookup>,
}

impl EnvCohereProvider {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration from a custom source.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for EnvCohereProvider {
    async fn embed(&self, text: &str, input_type: &str) -> Result<Vec<f64>, EmbeddingError> {
        let config = CohereConfig::from_lookup(self.lookup.as_ref())?;
        CohereClient::new(config)?.embed(text, input_type).await
    }
}
