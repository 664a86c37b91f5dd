//! Voice Chatbot - type a message, hear the reply
//!
//! This library provides the pieces behind the voice chatbot web app:
//! - Session history and prompt composition
//! - Text generation via Google Gemini
//! - Speech synthesis via `ElevenLabs`
//! - A one-page web widget served over HTTP
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Web widget (one form)                   │
//! │   message + history  ──►  audio + history            │
//! └────────────────────┬────────────────────────────────┘
//!                      │ POST /api/chat
//! ┌────────────────────▼────────────────────────────────┐
//! │                   Chatbot                            │
//! │   prompt  →  generate  →  speak  →  record turn      │
//! └──────────┬──────────────────────────┬───────────────┘
//!            │                          │
//! ┌──────────▼──────────┐   ┌───────────▼───────────────┐
//! │   Gemini (LLM)      │   │   ElevenLabs (TTS)        │
//! └─────────────────────┘   └───────────────────────────┘
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod prompt;
pub mod voice;

pub use agent::{Chatbot, TurnReply};
pub use config::Config;
pub use error::{Error, Result};
pub use history::{History, Speaker, TurnRecord};
pub use llm::{FALLBACK_REPLY, GeminiClient, TextGenerator};
pub use voice::{AudioOutput, ElevenLabsClient, SpeechOutcome, SpeechSynthesizer};
