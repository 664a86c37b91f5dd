//! Google Gemini text generation

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: SecretString, model: String, max_output_tokens: u32) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("Google API key required for generation".to_string()));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            max_output_tokens,
        })
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest::new(prompt, self.max_output_tokens);

        tracing::debug!(
            model = %self.model,
            max_output_tokens = self.max_output_tokens,
            prompt_chars = prompt.len(),
            "requesting generation"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("Gemini API error {status}: {body}")));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("failed to parse Gemini response: {e}")))?;

        result.text()
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { max_output_tokens },
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    /// Text of the first candidate
    ///
    /// A candidate whose parts carry no text yields an empty string, which
    /// the caller replaces with the fallback reply. A response with no
    /// candidate content at all (e.g. a blocked prompt) is an error.
    fn text(&self) -> Result<String> {
        let candidate = self.candidates.first();
        let Some(content) = candidate.and_then(|c| c.content.as_ref()) else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
                .or_else(|| candidate.and_then(|c| c.finish_reason.as_deref()))
                .unwrap_or("no candidates");
            return Err(Error::Generation(format!("Gemini returned no content: {reason}")));
        };

        Ok(content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<String>())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(
            SecretString::from("test-key".to_string()),
            "gemini-1.5-flash".to_string(),
            20,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let result = GeminiClient::new(SecretString::from(String::new()), "m".to_string(), 20);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            client().with_base_url("http://127.0.0.1:9000/").endpoint(),
            "http://127.0.0.1:9000/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(GenerateRequest::new("User: Hi\nAI:", 20)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{ "parts": [{ "text": "User: Hi\nAI:" }] }],
                "generationConfig": { "maxOutputTokens": 20 }
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "there." }] },
                "finishReason": "MAX_TOKENS"
            }]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "Hello there.");
    }

    #[test]
    fn test_response_with_empty_parts_is_empty_text() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [] }, "finishReason": "STOP" }]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "");
    }

    #[test]
    fn test_blocked_prompt_is_generation_error() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        let err = response.text().unwrap_err();
        assert!(matches!(err, Error::Generation(msg) if msg.contains("SAFETY")));
    }

    #[test]
    fn test_candidate_without_content_is_generation_error() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "finishReason": "RECITATION" }]
        }))
        .unwrap();
        let err = response.text().unwrap_err();
        assert!(matches!(err, Error::Generation(msg) if msg.contains("RECITATION")));

        let response: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(response.text(), Err(Error::Generation(_))));
    }
}
