// Playlist shaping: turns schema-validated recommendations into the
// client-facing response, and provides the deterministic fallback used
// when no completion client is configured.

use chrono::{SecondsFormat, Utc};

use crate::models::{
    LocationData, PlaylistGenerateResponse, PlaylistMetadata, PlaylistTrack, SongRecommendations,
};

const MOCK_SONG_NAME: &str = "Mock Song";
const MOCK_ARTIST_NAME: &str = "Mock Artist";

/// Wall-clock UTC in ISO-8601 with a trailing Z,
/// e.g. `2026-08-31T12:34:56.123456Z`
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// First letter of each whitespace-separated word upper-cased, the rest
/// lower-cased. Named so tests can pin the exact casing of playlist names.
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn playlist_name(theme: &str, location: &LocationData) -> String {
    format!("{} {}", theme, title_case(location.area_type.as_str()))
}

fn metadata(total_tracks: usize, location: &LocationData) -> PlaylistMetadata {
    PlaylistMetadata {
        total_tracks,
        generated_at: utc_timestamp(),
        location: location.clone(),
    }
}

/// Map model recommendations into the response contract, preserving order.
/// `totalTracks` reflects what the model actually returned, which may
/// differ from the requested limit; that difference is accepted as-is.
pub fn transform(
    recommendations: SongRecommendations,
    theme: &str,
    location: &LocationData,
) -> PlaylistGenerateResponse {
    let tracks: Vec<PlaylistTrack> = recommendations
        .tracks
        .into_iter()
        .map(|song| PlaylistTrack {
            name: song.name,
            artist: song.artists,
            spotify_id: None,
            preview_url: None,
        })
        .collect();

    PlaylistGenerateResponse {
        playlist_name: playlist_name(theme, location),
        metadata: Some(metadata(tracks.len(), location)),
        tracks,
    }
}

/// Deterministic placeholder playlist, shape-compatible with `transform`.
/// The only pipeline leg with no I/O at all, which makes it the natural
/// target for tests that must not depend on network availability.
pub fn fallback(theme: &str, location: &LocationData, limit: u32) -> PlaylistGenerateResponse {
    let tracks: Vec<PlaylistTrack> = (0..limit)
        .map(|_| PlaylistTrack {
            name: MOCK_SONG_NAME.to_string(),
            artist: MOCK_ARTIST_NAME.to_string(),
            spotify_id: None,
            preview_url: None,
        })
        .collect();

    PlaylistGenerateResponse {
        playlist_name: playlist_name(theme, location),
        metadata: Some(metadata(tracks.len(), location)),
        tracks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaType, Song};

    fn seattle() -> LocationData {
        LocationData {
            latitude: 47.6,
            longitude: -122.3,
            area_type: AreaType::City,
            address: None,
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("city"), "City");
        assert_eq!(title_case("suburban"), "Suburban");
        assert_eq!(title_case("new york city"), "New York City");
        assert_eq!(title_case("ALREADY LOUD"), "Already Loud");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_transform_preserves_order_and_nulls() {
        let recommendations = SongRecommendations {
            tracks: vec![
                Song {
                    name: "First".to_string(),
                    artists: "A".to_string(),
                },
                Song {
                    name: "Second".to_string(),
                    artists: "B".to_string(),
                },
            ],
            explanation: "two songs".to_string(),
        };
        let response = transform(recommendations, "chill", &seattle());

        assert_eq!(response.playlist_name, "chill City");
        assert_eq!(response.tracks.len(), 2);
        assert_eq!(response.tracks[0].name, "First");
        assert_eq!(response.tracks[1].artist, "B");
        assert!(response.tracks[0].spotify_id.is_none());
        assert!(response.tracks[0].preview_url.is_none());
    }

    #[test]
    fn test_transform_metadata_counts_actual_tracks() {
        // Model returned 3 even though more were requested; accepted as-is
        let recommendations = SongRecommendations {
            tracks: vec![
                Song {
                    name: "x".to_string(),
                    artists: "y".to_string(),
                };
                3
            ],
            explanation: "short".to_string(),
        };
        let response = transform(recommendations, "chill", &seattle());
        let metadata = response.metadata.unwrap();
        assert_eq!(metadata.total_tracks, 3);
        assert!(metadata.generated_at.ends_with('Z'));
        assert_eq!(metadata.location.area_type, AreaType::City);
    }

    #[test]
    fn test_fallback_produces_exactly_limit_mock_tracks() {
        let response = fallback("chill", &seattle(), 5);

        assert_eq!(response.tracks.len(), 5);
        for track in &response.tracks {
            assert_eq!(track.name, "Mock Song");
            assert_eq!(track.artist, "Mock Artist");
            assert!(track.spotify_id.is_none());
        }
        assert_eq!(response.playlist_name, "chill City");
        assert_eq!(response.metadata.unwrap().total_tracks, 5);
    }

    #[test]
    fn test_timestamp_is_iso8601_utc() {
        let stamp = utc_timestamp();
        assert!(stamp.ends_with('Z'));
        assert!(stamp.contains('T'));
    }
}
