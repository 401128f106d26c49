use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors raised while obtaining an embedding from the provider.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// A required environment variable is unset or empty.
    #[error("missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    /// A configuration value is present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The request timed out.
    #[error("embedding request timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("API error: {0}")]
    ApiError(String),

    /// The provider's response body did not have the expected shape.
    #[error("parse error: {0}")]
    ParseError(String),

    /// The provider answered without any embedding.
    #[error("provider returned no embeddings")]
    EmptyResponse,
}

/// Failure of a single record. Its `Display` form becomes the record's
/// error message.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("record has no `data` object")]
    MissingData,

    #[error("{0}")]
    InvalidData(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// Failure of a whole batch.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Invalid body")]
    InvalidBody { reason: String },

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResponseError for SkillError {
    fn status_code(&self) -> StatusCode {
        match self {
            SkillError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            SkillError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}
