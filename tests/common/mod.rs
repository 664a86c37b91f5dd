//! Shared test utilities
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use voice_chatbot::voice::AudioStream;
use voice_chatbot::{AudioOutput, Chatbot, Error, Result, SpeechSynthesizer, TextGenerator};

/// Generator that answers every prompt the same way and records prompts
pub struct ScriptedGenerator {
    reply: std::result::Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(Error::Generation)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Synthesizer that streams fixed chunks and records the text it was given
pub struct ChunkedSynthesizer {
    chunks: Vec<&'static [u8]>,
    pub texts: Mutex<Vec<String>>,
}

impl ChunkedSynthesizer {
    pub fn new(chunks: Vec<&'static [u8]>) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            texts: Mutex::new(Vec::new()),
        })
    }

    pub fn expected_audio(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

#[async_trait]
impl SpeechSynthesizer for ChunkedSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<AudioStream> {
        self.texts.lock().unwrap().push(text.to_string());
        let chunks: Vec<Result<Bytes>> = self
            .chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(*c)))
            .collect();
        Ok(futures::stream::iter(chunks).boxed())
    }

    fn name(&self) -> &'static str {
        "chunked"
    }
}

/// Synthesizer whose request never succeeds
pub struct UnreachableSynthesizer;

#[async_trait]
impl SpeechSynthesizer for UnreachableSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<AudioStream> {
        Err(Error::Tts("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

/// Synthesizer whose stream breaks after the first chunk
pub struct BrokenStreamSynthesizer;

#[async_trait]
impl SpeechSynthesizer for BrokenStreamSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<AudioStream> {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"ID3")),
            Err(Error::Tts("connection reset by peer".to_string())),
        ];
        Ok(futures::stream::iter(chunks).boxed())
    }

    fn name(&self) -> &'static str {
        "broken-stream"
    }
}

/// Shared-file audio output inside a test directory
pub fn shared_output(dir: &Path) -> AudioOutput {
    AudioOutput::Shared(dir.join("response.mp3"))
}

/// Build a chatbot from test doubles
pub fn chatbot(
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    output: AudioOutput,
) -> Chatbot {
    Chatbot::new(generator, synthesizer, output)
}
