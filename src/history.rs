//! Session history
//!
//! A session's history is an append-only list of labeled turn records
//! (`"User: ..."` / `"AI: ..."`), oldest first. It is owned by the browser
//! session and round-tripped as a plain JSON string array on every
//! submission; the server keeps no copy.
//!
//! Growth is unbounded. Only the last few entries reach the prompt (see
//! [`crate::prompt`]), but the full list travels with every request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Who authored a turn record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Ai,
}

impl Speaker {
    /// Label written before the text, without the separator
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Ai => "AI",
        }
    }
}

/// A single labeled line of conversation
///
/// Serializes as its labeled string form, e.g. `"AI: Hello there."`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TurnRecord {
    speaker: Speaker,
    text: String,
}

impl TurnRecord {
    /// Create a record for a user message
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Create a record for a generated reply
    #[must_use]
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Ai,
            text: text.into(),
        }
    }

    #[must_use]
    pub const fn speaker(&self) -> Speaker {
        self.speaker
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TurnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker.label(), self.text)
    }
}

impl FromStr for TurnRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [Speaker::User, Speaker::Ai]
            .into_iter()
            .find_map(|speaker| {
                s.strip_prefix(speaker.label())
                    .and_then(|rest| rest.strip_prefix(": "))
                    .map(|text| Self {
                        speaker,
                        text: text.to_string(),
                    })
            })
            .ok_or_else(|| {
                Error::TurnRecord(format!("expected \"User: \" or \"AI: \" prefix in {s:?}"))
            })
    }
}

impl TryFrom<String> for TurnRecord {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TurnRecord> for String {
    fn from(record: TurnRecord) -> Self {
        record.to_string()
    }
}

/// Ordered turn records for one UI session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<TurnRecord>);

impl History {
    /// Create an empty history
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[TurnRecord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TurnRecord> {
        self.0.iter()
    }

    /// The last `n` records in original order (all of them if fewer exist)
    #[must_use]
    pub fn recent(&self, n: usize) -> &[TurnRecord] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }

    /// Append one completed turn: the user message, then the reply
    pub fn record_turn(&mut self, message: &str, reply: &str) {
        self.0.push(TurnRecord::user(message));
        self.0.push(TurnRecord::ai(reply));
    }
}

impl From<Vec<TurnRecord>> for History {
    fn from(records: Vec<TurnRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a TurnRecord;
    type IntoIter = std::slice::Iter<'a, TurnRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
