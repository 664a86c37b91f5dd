//! Configuration management for the voice chatbot
//!
//! Values come from the process environment (after loading `.env`), then the
//! optional TOML file, then built-in defaults. The two provider credentials
//! have no default: without them the process refuses to start.

pub mod file;

use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;

use crate::voice::{AudioOutput, DEFAULT_AUDIO_PATH};
use crate::{Error, Result};

use self::file::ChatbotConfigFile;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 7860;

/// Default bind address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default Gemini model
pub const DEFAULT_LLM_MODEL: &str = "gemini-1.5-flash";

/// Default cap on generated tokens per reply
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 20;

/// Default `ElevenLabs` voice
pub const DEFAULT_VOICE_ID: &str = "Xb7hH8MSUJpSbSDYk0k2";

/// Default `ElevenLabs` model
pub const DEFAULT_TTS_MODEL: &str = "eleven_turbo_v2";

/// Default directory for per-request audio files
pub const DEFAULT_AUDIO_DIR: &str = "audio";

/// Voice chatbot configuration
#[derive(Debug)]
pub struct Config {
    /// Provider credentials
    pub api_keys: ApiKeys,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Text generation configuration
    pub llm: LlmConfig,

    /// Speech synthesis configuration
    pub voice: VoiceConfig,
}

/// API keys for the hosted providers
#[derive(Debug)]
pub struct ApiKeys {
    /// Google Generative Language API key (`GOOGLE_API_KEY`)
    pub google: SecretString,

    /// `ElevenLabs` API key (`ELEVENLABS_API_KEY`)
    pub elevenlabs: SecretString,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

/// Text generation configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Gemini model identifier
    pub model: String,

    /// Cap on generated tokens per reply
    pub max_output_tokens: u32,
}

/// Speech synthesis configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// `ElevenLabs` voice identifier
    pub voice_id: String,

    /// `ElevenLabs` model identifier
    pub model_id: String,

    /// Where synthesized audio is written
    pub audio_output: AudioOutput,
}

impl Config {
    /// Load configuration from `.env`, the process environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a credential is missing or a value is malformed
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to load .env file"),
        }

        Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed config file and an environment lookup
    ///
    /// Environment values win over file values, which win over defaults.
    /// Empty environment values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns error if a credential is missing or a value is malformed
    pub fn from_sources<F>(fc: ChatbotConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_keys = ApiKeys {
            google: required_secret(
                "GOOGLE_API_KEY",
                env("GOOGLE_API_KEY").or(fc.api_keys.google),
            )?,
            elevenlabs: required_secret(
                "ELEVENLABS_API_KEY",
                env("ELEVENLABS_API_KEY").or(fc.api_keys.elevenlabs),
            )?,
        };

        let server = ServerConfig {
            host: env("VOICE_CHATBOT_HOST")
                .or(fc.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_env(&env, "PORT")?
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
        };

        let llm = LlmConfig {
            model: env("VOICE_CHATBOT_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            max_output_tokens: parse_env(&env, "VOICE_CHATBOT_MAX_OUTPUT_TOKENS")?
                .or(fc.llm.max_output_tokens)
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        };

        let output_mode = env("VOICE_CHATBOT_AUDIO_MODE").or(fc.voice.output_mode);
        let audio_output = match output_mode.as_deref().map(str::trim) {
            None | Some("shared") => AudioOutput::Shared(PathBuf::from(
                env("VOICE_CHATBOT_AUDIO_PATH")
                    .or(fc.voice.output_path)
                    .unwrap_or_else(|| DEFAULT_AUDIO_PATH.to_string()),
            )),
            Some("per-request") => AudioOutput::PerRequest {
                dir: PathBuf::from(
                    env("VOICE_CHATBOT_AUDIO_DIR")
                        .or(fc.voice.output_dir)
                        .unwrap_or_else(|| DEFAULT_AUDIO_DIR.to_string()),
                ),
            },
            Some(other) => {
                return Err(Error::Config(format!(
                    "unknown audio output mode '{other}' (expected 'shared' or 'per-request')"
                )));
            }
        };

        let voice = VoiceConfig {
            voice_id: env("VOICE_CHATBOT_VOICE_ID")
                .or(fc.voice.voice_id)
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            model_id: env("VOICE_CHATBOT_TTS_MODEL")
                .or(fc.voice.model_id)
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            audio_output,
        };

        Ok(Self {
            api_keys,
            server,
            llm,
            voice,
        })
    }
}

fn required_secret(name: &str, value: Option<String>) -> Result<SecretString> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            Error::Config(format!(
                "{name} not found; set it in the environment or a .env file"
            ))
        })
}

fn parse_env<T, F>(env: F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid {key} '{raw}': {e}")))
        })
        .transpose()
}
