//! Voice output
//!
//! Speech synthesis against a hosted TTS API and the on-disk audio files
//! the web UI plays back.

mod output;
mod tts;

pub use output::{
    AudioOutput, DEFAULT_AUDIO_PATH, SpeechOutcome, collect_audio, speak_to_file, write_audio,
};
pub use tts::{AudioStream, ElevenLabsClient, SpeechSynthesizer};
