// HTTP server assembly for the playlist recommendation API

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ai::OpenAiClient;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::geo::GeoResolver;

/// Read-only state shared by every request. Built once at startup and
/// never mutated afterwards; requests hold nothing beyond this handle.
pub struct AppState {
    /// None means no credential was configured; completion-dependent
    /// endpoints degrade instead of crashing
    pub openai: Option<OpenAiClient>,
    pub geo: GeoResolver,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let openai = match &config.openai_api_key {
            Some(key) => Some(OpenAiClient::new(key.clone())?),
            None => None,
        };
        Ok(AppState {
            openai,
            geo: GeoResolver::new()?,
        })
    }

    pub fn openai_configured(&self) -> bool {
        self.openai.is_some()
    }
}

/// Assemble the full router. CORS stays wide open: the API serves a mobile
/// client from arbitrary origins and carries no cookie-based auth.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .merge(routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve until the process is terminated
pub async fn run_server(config: &AppConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
