// OpenAI structured-completion client
//
// Talks to the /v1/responses endpoint with a strict JSON-schema output
// format so the model's reply parses directly into SongRecommendations.
// One outbound call per invocation, no retries, no streaming.

use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::ai::prompts::recommendations_schema;
use crate::error::ApiError;
use crate::models::SongRecommendations;

const OPENAI_API_URL: &str = "https://api.openai.com";
const OPENAI_MODEL: &str = "gpt-4o-2024-08-06";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response envelope from /v1/responses. Only the fields needed to dig
/// out the generated text are modeled.
#[derive(Debug, Deserialize)]
struct ResponsesEnvelope {
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    text: String,
}

pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, OPENAI_API_URL)
    }

    /// Base URL override, used by tests to point at a mock server
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Internal(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(OpenAiClient {
            api_key,
            base_url,
            client,
        })
    }

    /// Run one structured completion against the model.
    /// Transport and upstream failures map to `CompletionUnavailable`;
    /// output that cannot be read as non-empty recommendations maps to
    /// `SchemaViolation`.
    pub async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> Result<SongRecommendations, ApiError> {
        let body = json!({
            "model": OPENAI_MODEL,
            "input": [
                { "role": "system", "content": system_instruction },
                { "role": "user", "content": user_instruction },
            ],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": "song_recommendations",
                    "strict": true,
                    "schema": recommendations_schema(),
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/v1/responses", self.base_url))
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::CompletionUnavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::CompletionUnavailable(format!(
                "upstream returned {status}: {detail}"
            )));
        }

        let envelope: ResponsesEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::SchemaViolation(format!("unreadable completion envelope: {e}")))?;

        parse_recommendations(&envelope)
    }
}

/// Pull the output text out of the envelope and parse it against the
/// recommendations contract. An absent text or an empty `tracks` array
/// is a schema violation, not a transport failure.
fn parse_recommendations(envelope: &ResponsesEnvelope) -> Result<SongRecommendations, ApiError> {
    let text = envelope
        .output
        .iter()
        .filter(|item| item.item_type == "message")
        .flat_map(|item| item.content.iter())
        .find(|part| part.part_type == "output_text")
        .map(|part| part.text.as_str())
        .ok_or_else(|| ApiError::SchemaViolation("completion contained no output text".to_string()))?;

    let recommendations: SongRecommendations = serde_json::from_str(text).map_err(|e| {
        ApiError::SchemaViolation(format!("output did not match the recommendations schema: {e}"))
    })?;

    if recommendations.tracks.is_empty() {
        return Err(ApiError::SchemaViolation(
            "completion returned no tracks".to_string(),
        ));
    }

    Ok(recommendations)
}
