use std::fmt;

use anyhow::Context;

use crate::error::EmbeddingError;

pub const ENDPOINT_VAR: &str = "COHERE_EMBED_ENDPOINT";
pub const API_KEY_VAR: &str = "COHERE_EMBED_KEY";
pub const MODEL_VAR: &str = "COHERE_EMBED_MODEL";
pub const TIMEOUT_VAR: &str = "COHERE_EMBED_TIMEOUT_SECONDS";

/// Port the Azure Functions host hands to its custom handler.
pub const PORT_VAR: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";
pub const HOST_VAR: &str = "SKILL_HOST";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Settings for one call to the Cohere embed endpoint.
///
/// Resolved on every call rather than at startup, so a missing variable
/// shows up as a record error instead of a process that refuses to start.
#[derive(Clone)]
pub struct CohereConfig {
    /// Base URL of the deployment, e.g. `https://api.cohere.com` or an Azure
    /// serverless endpoint ending in `/v1`.
    pub endpoint: String,
    pub api_key: String,
    /// Only needed for multi-model endpoints such as api.cohere.com.
    pub model: Option<String>,
    pub timeout_seconds: u64,
}

impl CohereConfig {
    pub fn from_env() -> Result<Self, EmbeddingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EmbeddingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENDPOINT_VAR).ok_or(EmbeddingError::MissingConfig(ENDPOINT_VAR))?;
        let api_key = get(API_KEY_VAR).ok_or(EmbeddingError::MissingConfig(API_KEY_VAR))?;
        let model = get(MODEL_VAR);
        let timeout_seconds = match get(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT_SECONDS,
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                EmbeddingError::InvalidConfig(format!(
                    "{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"
                ))
            })?,
        };

        Ok(Self {
            endpoint,
            api_key,
            model,
            timeout_seconds,
        })
    }
}

impl fmt::Debug for CohereConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CohereConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Where the HTTP server listens. Read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup(PORT_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{PORT_VAR} is not a valid port: {raw:?}"))?,
            _ => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }
}
