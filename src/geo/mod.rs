// IP geolocation for requests that carry no coordinates
//
// Explicit coordinates always pass through untouched; the lookup service
// is only consulted when the caller's network address is all we have.
// No caching: identical addresses repeat the lookup.

use reqwest::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

use crate::error::ApiError;

const GEO_API_URL: &str = "http://ip-api.com";
const LOOKUP_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
struct GeoLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

pub struct GeoResolver {
    base_url: String,
    client: Client,
}

impl GeoResolver {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(GEO_API_URL)
    }

    /// Base URL override, used by tests to point at a mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Internal(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(GeoResolver { base_url, client })
    }

    /// Resolve a location signal into `(latitude, longitude)`.
    /// Explicit coordinates win and never trigger a lookup.
    pub async fn resolve(
        &self,
        explicit: Option<(f64, f64)>,
        client_ip: IpAddr,
    ) -> Result<(f64, f64), ApiError> {
        if let Some((lat, lon)) = explicit {
            validate_coordinates(lat, lon)?;
            return Ok((lat, lon));
        }
        self.lookup(client_ip).await
    }

    /// One lookup against the geolocation API. Never defaults to (0, 0):
    /// any unusable address or failed lookup is `LocationUnavailable`.
    pub async fn lookup(&self, ip: IpAddr) -> Result<(f64, f64), ApiError> {
        if !is_routable(ip) {
            return Err(ApiError::LocationUnavailable(format!(
                "client address {ip} is not publicly routable"
            )));
        }

        let url = format!("{}/json/{}?fields=status,message,lat,lon", self.base_url, ip);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::LocationUnavailable(format!("lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::LocationUnavailable(format!(
                "lookup service returned {}",
                response.status()
            )));
        }

        let body: GeoLookupResponse = response
            .json()
            .await
            .map_err(|e| ApiError::LocationUnavailable(format!("unreadable lookup response: {e}")))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| "lookup failed".to_string());
            return Err(ApiError::LocationUnavailable(format!(
                "could not geolocate {ip}: {reason}"
            )));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(ApiError::LocationUnavailable(format!(
                "lookup for {ip} returned no coordinates"
            ))),
        }
    }
}

/// Range check shared by path parameters and request bodies
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ApiError::InvalidRequest(format!(
            "latitude {lat} out of range [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ApiError::InvalidRequest(format!(
            "longitude {lon} out of range [-180, 180]"
        )));
    }
    Ok(())
}

/// Private, loopback and unspecified addresses cannot be geolocated;
/// fail fast without a network call.
fn is_routable(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => !(v6.is_loopback() || v6.is_unspecified()),
    }
}
