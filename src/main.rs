use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use skycast::api::AppState;
use skycast::config::SkycastConfig;
use skycast::pipeline::Pipeline;
use skycast::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SkycastConfig::load()?;
    tracing::debug!(?config, "Loaded configuration");

    let pipeline = Pipeline::new(&config)?;
    let state = AppState {
        pipeline: Arc::new(pipeline),
        defaults: config.defaults.clone(),
    };

    web::run(config.server.port, &config.server.assets_dir, state).await
}
