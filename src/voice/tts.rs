//! Text-to-speech (TTS) processing

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Audio delivered by a synthesizer as ordered byte chunks
pub type AudioStream = BoxStream<'static, Result<Bytes>>;

/// A hosted speech-synthesis backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Start synthesizing text, returning the audio as a chunk stream
    ///
    /// # Errors
    ///
    /// Returns error if the request is rejected; errors while reading the
    /// body arrive through the stream
    async fn synthesize(&self, text: &str) -> Result<AudioStream>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Synthesizes speech through the `ElevenLabs` API
pub struct ElevenLabsClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    voice_id: String,
    model_id: String,
}

impl ElevenLabsClient {
    /// Create a new `ElevenLabs` client for a fixed voice and model
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: SecretString, voice_id: String, model_id: String) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            voice_id,
            model_id,
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
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            self.voice_id
        )
    }
}

#[derive(Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> Result<AudioStream> {
        let request = ElevenLabsRequest {
            text,
            model_id: &self.model_id,
        };

        tracing::debug!(
            voice_id = %self.voice_id,
            model_id = %self.model_id,
            chars = text.len(),
            "requesting speech"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("xi-api-key", self.api_key.expose_secret())
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        Ok(response.bytes_stream().map_err(Error::from).boxed())
    }

    fn name(&self) -> &'static str {
        "elevenlabs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_api_key() {
        let result = ElevenLabsClient::new(
            SecretString::from(String::new()),
            "voice".to_string(),
            "model".to_string(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint_includes_voice_id() {
        let client = ElevenLabsClient::new(
            SecretString::from("key".to_string()),
            "Xb7hH8MSUJpSbSDYk0k2".to_string(),
            "eleven_turbo_v2".to_string(),
        )
        .unwrap();

        assert_eq!(
            client.endpoint(),
            "https://api.elevenlabs.io/v1/text-to-speech/Xb7hH8MSUJpSbSDYk0k2"
        );
    }

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(ElevenLabsRequest {
            text: "Hello.",
            model_id: "eleven_turbo_v2",
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "Hello.", "model_id": "eleven_turbo_v2" })
        );
    }
}
