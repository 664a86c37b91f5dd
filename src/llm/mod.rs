//! Text generation
//!
//! The [`TextGenerator`] trait is the seam between the turn pipeline and a
//! hosted model. [`generate_reply`] wraps any generator with the
//! empty-reply fallback so every backend (and every test double) gets the
//! same normalization.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::Result;

/// Reply recorded when the model returns nothing usable
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response for that.";

/// A hosted text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt
    ///
    /// # Errors
    ///
    /// Returns error on transport, auth, or API failures
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Generate a reply, substituting [`FALLBACK_REPLY`] for empty output
///
/// Failures from the generator are not handled here.
///
/// # Errors
///
/// Returns error if the generator fails
pub async fn generate_reply(generator: &dyn TextGenerator, prompt: &str) -> Result<String> {
    let text = generator.generate(prompt).await?;
    Ok(normalize_reply(text))
}

/// Replace an empty or whitespace-only reply with [`FALLBACK_REPLY`]
#[must_use]
pub fn normalize_reply(text: String) -> String {
    if text.trim().is_empty() {
        tracing::debug!("empty generation result, using fallback reply");
        FALLBACK_REPLY.to_string()
    } else {
        text
    }
}
