//! TOML configuration file loading
//!
//! Supports `~/.config/voice-chatbot/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ChatbotConfigFile {
    /// API keys for the hosted providers
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Text generation configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Speech synthesis configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub google: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Interface to bind (e.g. "0.0.0.0")
    pub host: Option<String>,

    /// Port to listen on
    pub port: Option<u16>,
}

/// Text generation configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gemini-1.5-flash")
    pub model: Option<String>,

    /// Cap on generated tokens per reply
    pub max_output_tokens: Option<u32>,
}

/// Speech synthesis configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// `ElevenLabs` voice identifier
    pub voice_id: Option<String>,

    /// `ElevenLabs` model identifier (e.g. "eleven_turbo_v2")
    pub model_id: Option<String>,

    /// "shared" or "per-request"
    pub output_mode: Option<String>,

    /// File written in shared mode
    pub output_path: Option<String>,

    /// Directory written in per-request mode
    pub output_dir: Option<String>,
}

/// Parse config file contents
///
/// # Errors
///
/// Returns error if the contents are not valid TOML for this schema
pub fn parse_config_file(content: &str) -> Result<ChatbotConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load the TOML config file from the standard path
///
/// Returns `ChatbotConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ChatbotConfigFile {
    let Some(path) = config_file_path() else {
        return ChatbotConfigFile::default();
    };

    if !path.exists() {
        return ChatbotConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ChatbotConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ChatbotConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/voice-chatbot/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voice-chatbot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let fc = parse_config_file(
            r#"
            [server]
            port = 8080

            [voice]
            output_mode = "per-request"
            "#,
        )
        .unwrap();

        assert_eq!(fc.server.port, Some(8080));
        assert_eq!(fc.server.host, None);
        assert_eq!(fc.voice.output_mode.as_deref(), Some("per-request"));
        assert!(fc.api_keys.google.is_none());
    }

    #[test]
    fn test_parse_empty_file() {
        let fc = parse_config_file("").unwrap();
        assert!(fc.llm.model.is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(parse_config_file("[server]\nport = \"eighty\"").is_err());
    }
}
