use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use skill_embeddings::{app, telemetry, AppState, EnvCohereProvider, ServerConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init()?;

    let config = ServerConfig::from_env()?;
    let data = web::Data::new(AppState::new(Arc::new(EnvCohereProvider::from_env())));

    info!(host = %config.host, port = config.port, "starting embeddings skill");

    HttpServer::new(move || App::new().app_data(data.clone()).configure(app::configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}
