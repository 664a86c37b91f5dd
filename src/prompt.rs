//! Prompt composition from recent session history

use crate::history::{History, TurnRecord};

/// Number of most recent history entries included as context
pub const CONTEXT_WINDOW: usize = 4;

/// Style instruction appended after the user's message
pub const STYLE_INSTRUCTION: &str =
    "Your output must be a complete sentence, under 15 words, and very concise.";

/// Marker that cues the model to continue as the assistant
pub const CONTINUATION_MARKER: &str = "AI:";

/// Build the generation prompt for a new user message
///
/// Layout:
///
/// ```text
/// <last CONTEXT_WINDOW history entries, newline-joined>
/// User: <message>
///
/// <STYLE_INSTRUCTION>
/// AI:
/// ```
///
/// An empty history leaves the first line empty.
#[must_use]
pub fn compose(history: &History, message: &str) -> String {
    let context = history
        .recent(CONTEXT_WINDOW)
        .iter()
        .map(TurnRecord::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{context}\n{user}\n\n{STYLE_INSTRUCTION}\n{CONTINUATION_MARKER}",
        user = TurnRecord::user(message),
    )
}
