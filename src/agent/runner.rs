//! Single-turn runner: prompt, generate, speak, record

use std::path::PathBuf;
use std::sync::Arc;

use crate::history::History;
use crate::llm::{self, TextGenerator};
use crate::prompt;
use crate::voice::{self, AudioOutput, SpeechOutcome, SpeechSynthesizer};
use crate::Result;

/// Outcome of one conversational turn
#[derive(Debug)]
pub struct TurnReply {
    /// Synthesized reply audio; `None` when synthesis failed
    pub audio: Option<PathBuf>,
    /// Generated reply text as recorded in history
    pub reply: String,
    /// Session history including this turn
    pub history: History,
}

/// Runs conversational turns against injected generation and speech backends
pub struct Chatbot {
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    audio_output: AudioOutput,
}

impl Chatbot {
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        audio_output: AudioOutput,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            audio_output,
        }
    }

    /// Where this chatbot writes reply audio
    #[must_use]
    pub const fn audio_output(&self) -> &AudioOutput {
        &self.audio_output
    }

    /// The speech backend, for callers that synthesize outside a turn
    #[must_use]
    pub fn synthesizer(&self) -> &dyn SpeechSynthesizer {
        self.synthesizer.as_ref()
    }

    /// Run one turn for `message` against the session's `history`
    ///
    /// A missing history starts a new session. Generation happens before
    /// synthesis, and the user message and reply are appended only after
    /// both finish. A synthesis failure still records the turn and yields
    /// no audio.
    ///
    /// # Errors
    ///
    /// Returns error if text generation fails; history is left untouched
    pub async fn respond(&self, message: &str, history: Option<History>) -> Result<TurnReply> {
        let mut history = history.unwrap_or_default();

        let prompt = prompt::compose(&history, message);
        let reply = llm::generate_reply(self.generator.as_ref(), &prompt).await?;

        let outcome =
            voice::speak_to_file(self.synthesizer.as_ref(), &reply, &self.audio_output).await;
        let audio = match outcome {
            SpeechOutcome::Saved(path) => Some(path),
            SpeechOutcome::Failed(_) => {
                tracing::warn!("continuing turn without audio");
                None
            }
        };

        history.record_turn(message, &reply);

        tracing::info!(
            generator = self.generator.name(),
            history_len = history.len(),
            has_audio = audio.is_some(),
            "turn complete"
        );

        Ok(TurnReply {
            audio,
            reply,
            history,
        })
    }
}
