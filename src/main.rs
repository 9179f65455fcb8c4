use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ambient_server::config::{AppConfig, CliArgs};
use ambient_server::server::{run_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; a missing file is not an error
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = AppConfig::from_env(&args);
    if config.openai_configured() {
        info!("OpenAI API key loaded from environment");
    } else {
        warn!("OPENAI_API_KEY not set, completion-dependent endpoints will degrade");
    }

    let state = Arc::new(AppState::from_config(&config)?);
    run_server(&config, state).await
}
