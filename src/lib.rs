pub mod app;
pub mod cohere;
pub mod config;
pub mod error;
pub mod json;
pub mod mock;
pub mod model;
pub mod provider;
pub mod skill;
pub mod telemetry;

pub use app::AppState;
pub use cohere::{CohereClient, EnvCohereProvider};
pub use config::{CohereConfig, ServerConfig};
pub use error::{EmbeddingError, RecordError, SkillError};
pub use mock::{FailingEmbeddingProvider, MockEmbeddingProvider};
pub use provider::EmbeddingProvider;
