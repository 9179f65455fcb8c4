// Wire and data model for the recommendation pipeline
//
// Two shapes live here: the schema contract exchanged with the completion
// model (Song, SongRecommendations) and the client-facing playlist types.
// The playlist types use camelCase on the wire to match the mobile client.

use serde::{Deserialize, Serialize};

/// Single recommendation as produced by the completion model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub artists: String,
}

/// Full output contract handed to the completion model.
/// `tracks` length matches the requested count by instruction only;
/// the schema cannot enforce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecommendations {
    pub tracks: Vec<Song>,
    pub explanation: String,
}

/// Coarse descriptor of a location's surroundings, used to steer
/// recommendation tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    City,
    Forest,
    Suburban,
    Unknown,
}

impl AreaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaType::City => "city",
            AreaType::Forest => "forest",
            AreaType::Suburban => "suburban",
            AreaType::Unknown => "unknown",
        }
    }
}

/// Caller-supplied or IP-resolved location. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
    pub area_type: AreaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistGenerateRequest {
    pub theme: String,
    pub location: LocationData,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

/// One playlist entry, derived 1:1 from a Song. The catalog fields stay
/// null: no Spotify lookup is performed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrack {
    pub name: String,
    pub artist: String,
    pub spotify_id: Option<String>,
    pub preview_url: Option<String>,
}

/// Generation metadata attached for observability, not correctness
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMetadata {
    pub total_tracks: usize,
    pub generated_at: String,
    pub location: LocationData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistGenerateResponse {
    pub tracks: Vec<PlaylistTrack>,
    pub playlist_name: String,
    pub metadata: Option<PlaylistMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_type_wire_format() {
        assert_eq!(serde_json::to_string(&AreaType::City).unwrap(), "\"city\"");
        let parsed: AreaType = serde_json::from_str("\"suburban\"").unwrap();
        assert_eq!(parsed, AreaType::Suburban);
    }

    #[test]
    fn test_request_defaults_limit() {
        let json = r#"{
            "theme": "chill",
            "location": {"latitude": 47.6, "longitude": -122.3, "areaType": "city"}
        }"#;
        let request: PlaylistGenerateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.limit, 20);
        assert!(request.location.address.is_none());
    }

    #[test]
    fn test_track_serializes_camel_case_with_nulls() {
        let track = PlaylistTrack {
            name: "Song".to_string(),
            artist: "Artist".to_string(),
            spotify_id: None,
            preview_url: None,
        };
        let value = serde_json::to_value(&track).unwrap();
        assert!(value.get("spotifyId").unwrap().is_null());
        assert!(value.get("previewUrl").unwrap().is_null());
    }

    #[test]
    fn test_response_serializes_playlist_name() {
        let response = PlaylistGenerateResponse {
            tracks: vec![],
            playlist_name: "chill City".to_string(),
            metadata: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value.get("playlistName").unwrap(), "chill City");
    }
}
