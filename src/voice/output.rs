//! Writing synthesized speech to disk
//!
//! Synthesis failures never abort a turn: [`speak_to_file`] logs them and
//! reports [`SpeechOutcome::Failed`], and the caller carries on without
//! audio.

use std::path::{Path, PathBuf};

use futures::TryStreamExt;
use uuid::Uuid;

use super::tts::{AudioStream, SpeechSynthesizer};
use crate::{Error, Result};

/// Default output file, relative to the working directory
pub const DEFAULT_AUDIO_PATH: &str = "response.mp3";

const AUDIO_EXTENSION: &str = "mp3";

/// Where synthesized audio lands
///
/// `Shared` writes every turn of every session to the same file, so
/// concurrent sessions can overwrite or truncate each other's audio.
/// `PerRequest` gives each turn its own file and never deletes any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutput {
    /// One fixed file, overwritten on every turn
    Shared(PathBuf),
    /// A fresh `<uuid>.mp3` in `dir` for every turn
    PerRequest { dir: PathBuf },
}

impl Default for AudioOutput {
    fn default() -> Self {
        Self::Shared(PathBuf::from(DEFAULT_AUDIO_PATH))
    }
}

impl AudioOutput {
    /// Path the next synthesized clip should be written to
    #[must_use]
    pub fn next_path(&self) -> PathBuf {
        match self {
            Self::Shared(path) => path.clone(),
            Self::PerRequest { dir } => dir.join(format!("{}.{AUDIO_EXTENSION}", Uuid::new_v4())),
        }
    }

    /// Map a served file name back to a path this output could have written
    ///
    /// Returns `None` for any name the output would never produce, so
    /// callers can serve the result without further path checks.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        match self {
            Self::Shared(path) => path
                .file_name()
                .is_some_and(|file_name| file_name == name)
                .then(|| path.clone()),
            Self::PerRequest { dir } => name
                .strip_suffix(AUDIO_EXTENSION)
                .and_then(|stem| stem.strip_suffix('.'))
                .and_then(|stem| Uuid::parse_str(stem).ok())
                .map(|id| dir.join(format!("{id}.{AUDIO_EXTENSION}"))),
        }
    }
}

/// Result of one synthesis attempt
#[derive(Debug)]
pub enum SpeechOutcome {
    /// Audio was written to this path
    Saved(PathBuf),
    /// Synthesis or the file write failed
    Failed(Error),
}

impl SpeechOutcome {
    /// The written path, or `None` when synthesis failed
    #[must_use]
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Saved(path) => Some(path),
            Self::Failed(_) => None,
        }
    }
}

/// Drain an audio stream into one buffer, preserving chunk order
///
/// # Errors
///
/// Returns the first error yielded by the stream
pub async fn collect_audio(mut stream: AudioStream) -> Result<Vec<u8>> {
    let mut audio = Vec::new();
    while let Some(chunk) = stream.try_next().await? {
        audio.extend_from_slice(&chunk);
    }
    Ok(audio)
}

/// Write audio to `path`, replacing any previous content
///
/// # Errors
///
/// Returns error if the parent directory or file cannot be written
pub async fn write_audio(path: &Path, audio: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, audio).await?;
    Ok(())
}

/// Synthesize `text` and save it according to `output`
///
/// Any failure is logged and returned as [`SpeechOutcome::Failed`].
pub async fn speak_to_file(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
    output: &AudioOutput,
) -> SpeechOutcome {
    let path = output.next_path();

    match synthesize_into(synthesizer, text, &path).await {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), bytes, "saved synthesized speech");
            SpeechOutcome::Saved(path)
        }
        Err(e) => {
            tracing::error!(
                provider = synthesizer.name(),
                error = %e,
                "error converting text to speech"
            );
            SpeechOutcome::Failed(e)
        }
    }
}

async fn synthesize_into(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
    path: &Path,
) -> Result<usize> {
    let stream = synthesizer.synthesize(text).await?;
    let audio = collect_audio(stream).await?;
    write_audio(path, &audio).await?;
    Ok(audio.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::StreamExt;

    fn stream_of(chunks: Vec<Result<Bytes>>) -> AudioStream {
        futures::stream::iter(chunks).boxed()
    }

    #[tokio::test]
    async fn test_collect_audio_concatenates_in_order() {
        let stream = stream_of(vec![
            Ok(Bytes::from_static(b"ID3")),
            Ok(Bytes::new()),
            Ok(Bytes::from_static(b"\x01\x02")),
            Ok(Bytes::from_static(b"end")),
        ]);
        let audio = collect_audio(stream).await.unwrap();
        assert_eq!(audio, b"ID3\x01\x02end");
    }

    #[tokio::test]
    async fn test_collect_audio_stops_on_error() {
        let stream = stream_of(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(Error::Tts("connection reset".to_string())),
            Ok(Bytes::from_static(b"never")),
        ]);
        assert!(collect_audio(stream).await.is_err());
    }

    #[tokio::test]
    async fn test_write_audio_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.mp3");

        write_audio(&path, b"a much longer first clip").await.unwrap();
        write_audio(&path, b"short").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"short");
    }

    #[tokio::test]
    async fn test_write_audio_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio").join("clip.mp3");

        write_audio(&path, b"data").await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_shared_output_reuses_one_path() {
        let output = AudioOutput::default();
        assert_eq!(output.next_path(), PathBuf::from("response.mp3"));
        assert_eq!(output.next_path(), output.next_path());
    }

    #[test]
    fn test_per_request_output_is_unique() {
        let output = AudioOutput::PerRequest {
            dir: PathBuf::from("audio"),
        };
        let first = output.next_path();
        let second = output.next_path();

        assert_ne!(first, second);
        assert!(first.starts_with("audio"));
        assert_eq!(first.extension().unwrap(), "mp3");
    }

    #[test]
    fn test_resolve_shared_only_matches_its_file() {
        let output = AudioOutput::Shared(PathBuf::from("out/response.mp3"));
        assert_eq!(
            output.resolve("response.mp3"),
            Some(PathBuf::from("out/response.mp3"))
        );
        assert_eq!(output.resolve("other.mp3"), None);
        assert_eq!(output.resolve("../.env"), None);
    }

    #[test]
    fn test_resolve_per_request_requires_uuid_names() {
        let output = AudioOutput::PerRequest {
            dir: PathBuf::from("audio"),
        };
        let written = output.next_path();
        let name = written.file_name().unwrap().to_str().unwrap();

        assert_eq!(output.resolve(name), Some(written.clone()));
        assert_eq!(output.resolve("../secrets.mp3"), None);
        assert_eq!(output.resolve("response.mp3"), None);
        assert_eq!(output.resolve(written.file_stem().unwrap().to_str().unwrap()), None);
    }
}
