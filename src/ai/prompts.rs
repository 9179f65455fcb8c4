// Prompt construction for the recommendation model
//
// The instruction text is the only channel that can steer the requested
// count and topical relevance; the output schema cannot express either.
// Every function here is pure: identical inputs yield byte-identical
// instruction strings.

use serde_json::{json, Value};

use crate::models::AreaType;

const RECOMMENDER_SYSTEM_PROMPT: &str = "You are a Spotify recommender that \
    recommends songs when given a latitude, longitude and the number of songs \
    to recommend.";

/// Minimal variant used by the raw coordinate endpoints.
/// Returns `(system_instruction, user_instruction)`.
pub fn coordinates_prompt(count: u32, lat: f64, lon: f64) -> (String, String) {
    (
        RECOMMENDER_SYSTEM_PROMPT.to_string(),
        format!("{},{},{}", lat, lon, count),
    )
}

/// Theme-aware variant used by the playlist endpoint. States the exact
/// count, theme and area type so the model has no room to improvise on them.
pub fn themed_prompt(
    count: u32,
    lat: f64,
    lon: f64,
    theme: &str,
    area_type: AreaType,
) -> (String, String) {
    let area = area_type.as_str();
    let system = format!(
        "You are a Spotify recommender that recommends songs based on location \
         and theme. The theme is {theme} and the location is a {area} area at \
         coordinates {lat},{lon}. Return exactly {count} song recommendations."
    );
    let user = format!("Recommend {count} songs for the {theme} theme in a {area} area.");
    (system, user)
}

/// JSON Schema for `SongRecommendations`, sent as the required output
/// format with every completion call. Defined once so the contract cannot
/// drift between endpoints.
pub fn recommendations_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "tracks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "artists": { "type": "string" }
                    },
                    "required": ["name", "artists"],
                    "additionalProperties": false
                }
            },
            "explanation": { "type": "string" }
        },
        "required": ["tracks", "explanation"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_prompt_is_deterministic() {
        let first = coordinates_prompt(5, 47.6, -122.3);
        let second = coordinates_prompt(5, 47.6, -122.3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_coordinates_prompt_states_inputs() {
        let (_, user) = coordinates_prompt(7, 47.6, -122.3);
        assert_eq!(user, "47.6,-122.3,7");
    }

    #[test]
    fn test_themed_prompt_is_deterministic() {
        let first = themed_prompt(5, 47.6, -122.3, "chill", AreaType::City);
        let second = themed_prompt(5, 47.6, -122.3, "chill", AreaType::City);
        assert_eq!(first, second);
    }

    #[test]
    fn test_themed_prompt_states_count_theme_and_area() {
        let (system, user) = themed_prompt(5, 47.6, -122.3, "chill", AreaType::Forest);
        assert!(system.contains("exactly 5"));
        assert!(system.contains("chill"));
        assert!(system.contains("forest"));
        assert!(user.contains("5 songs"));
        assert!(user.contains("forest area"));
    }

    #[test]
    fn test_schema_requires_tracks_and_explanation() {
        let schema = recommendations_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "tracks"));
        assert!(required.iter().any(|v| v == "explanation"));
    }
}
