// HTTP handlers for the recommendation pipeline
//
// Each request runs the same strictly sequential pipeline: resolve the
// location (only when the caller did not supply one), build the prompt,
// run the structured completion, shape the response.

use axum::{
    Json, Router,
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    routing::{get, post},
};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{info, warn};

use super::AppState;
use crate::ai::prompts;
use crate::error::ApiError;
use crate::geo;
use crate::models::{PlaylistGenerateRequest, PlaylistGenerateResponse, SongRecommendations};
use crate::playlist;

/// Upper bound for the raw coordinate endpoints
const MAX_RAW_SONGS: i64 = 50;
/// Upper bound for the playlist endpoint's limit
const MAX_PLAYLIST_LIMIT: i64 = 100;

// ---- Response types ----

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub openai_configured: bool,
    pub timestamp: String,
}

// ---- Route registration ----

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/updatelocation/nogps/{num_songs}", get(recommend_for_caller))
        .route(
            "/updatelocation/{lat}/{lon}/{num_songs}",
            get(recommend_for_coordinates),
        )
        .route("/api/playlist/generate", post(generate_playlist))
}

// ---- Handlers ----

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Ambient Playlist API",
        status: "running",
    })
}

/// Always 200; reports whether the completion credential is present
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        openai_configured: state.openai_configured(),
        timestamp: playlist::utc_timestamp(),
    })
}

/// Raw recommendations for explicit coordinates. No fallback: without a
/// configured client this endpoint fails explicitly.
async fn recommend_for_coordinates(
    State(state): State<Arc<AppState>>,
    Path((lat, lon, num_songs)): Path<(f64, f64, i64)>,
) -> Result<Json<SongRecommendations>, ApiError> {
    let count = validate_song_count(num_songs, MAX_RAW_SONGS)?;
    geo::validate_coordinates(lat, lon)?;
    let client = require_completion_client(&state)?;

    let (system, user) = prompts::coordinates_prompt(count, lat, lon);
    let recommendations = client.complete(&system, &user).await?;
    Ok(Json(recommendations))
}

/// Raw recommendations for a caller without GPS: geolocate the client
/// address, then run the same pipeline as the coordinate endpoint.
async fn recommend_for_caller(
    State(state): State<Arc<AppState>>,
    Path(num_songs): Path<i64>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Json<SongRecommendations>, ApiError> {
    let count = validate_song_count(num_songs, MAX_RAW_SONGS)?;
    let client = require_completion_client(&state)?;

    let ip = client_ip(&headers, peer);
    let (lat, lon) = state.geo.resolve(None, ip).await?;
    info!(%ip, lat, lon, "resolved caller location");

    let (system, user) = prompts::coordinates_prompt(count, lat, lon);
    let recommendations = client.complete(&system, &user).await?;
    Ok(Json(recommendations))
}

/// Theme-aware playlist generation. The one endpoint with a non-error
/// degraded path: an unconfigured client yields a mock playlist with the
/// same shape instead of a failure.
async fn generate_playlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlaylistGenerateRequest>,
) -> Result<Json<PlaylistGenerateResponse>, ApiError> {
    let limit = validate_song_count(request.limit, MAX_PLAYLIST_LIMIT)?;
    geo::validate_coordinates(request.location.latitude, request.location.longitude)?;
    info!(
        theme = %request.theme,
        area = request.location.area_type.as_str(),
        limit,
        "playlist generation requested"
    );

    let Some(client) = state.openai.as_ref() else {
        warn!("completion client not configured, returning mock playlist");
        return Ok(Json(playlist::fallback(
            &request.theme,
            &request.location,
            limit,
        )));
    };

    let (system, user) = prompts::themed_prompt(
        limit,
        request.location.latitude,
        request.location.longitude,
        &request.theme,
        request.location.area_type,
    );
    let recommendations = client.complete(&system, &user).await?;
    let response = playlist::transform(recommendations, &request.theme, &request.location);
    info!(tracks = response.tracks.len(), "playlist generated");
    Ok(Json(response))
}

// ---- Helpers ----

fn require_completion_client(state: &AppState) -> Result<&crate::ai::OpenAiClient, ApiError> {
    state.openai.as_ref().ok_or_else(|| {
        ApiError::CompletionUnavailable("no completion credential configured".to_string())
    })
}

fn validate_song_count(count: i64, max: i64) -> Result<u32, ApiError> {
    if count < 1 || count > max {
        return Err(ApiError::InvalidRequest(format!(
            "song count must be between 1 and {max}, got {count}"
        )));
    }
    Ok(count as u32)
}

/// Real client address: first X-Forwarded-For hop when present (the
/// service sits behind a dev proxy), otherwise the socket peer.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|hop| hop.trim().parse().ok())
        .unwrap_or_else(|| peer.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_song_count_bounds() {
        assert_eq!(validate_song_count(1, 50).unwrap(), 1);
        assert_eq!(validate_song_count(50, 50).unwrap(), 50);
        assert!(validate_song_count(0, 50).is_err());
        assert!(validate_song_count(-3, 50).is_err());
        assert!(validate_song_count(51, 50).is_err());
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "8.8.8.8, 10.0.0.1".parse().unwrap());
        let peer: SocketAddr = "192.168.1.5:12345".parse().unwrap();
        assert_eq!(client_ip(&headers, peer), "8.8.8.8".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "203.0.113.9:443".parse().unwrap();
        assert_eq!(client_ip(&headers, peer), "203.0.113.9".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_client_ip_ignores_garbage_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "not-an-address".parse().unwrap());
        let peer: SocketAddr = "203.0.113.9:443".parse().unwrap();
        assert_eq!(client_ip(&headers, peer), "203.0.113.9".parse::<IpAddr>().unwrap());
    }
}
