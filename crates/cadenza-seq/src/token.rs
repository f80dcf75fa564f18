//! Tokens and renderable events.
//!
//! A token is the unit of sequence modeling: either a named pitch with
//! octave (`"C4"`, `"F#3"`) or a chord encoded as dot-joined pitch-class
//! integers (`"2.6.9"`). Tokens are opaque strings to the model; the
//! chord/pitch distinction is decided once, at decode time, into a
//! [`NoteEvent`] variant.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between pitch classes in a chord token.
pub const CHORD_SEPARATOR: char = '.';

/// A pitch or chord token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(s: impl Into<String>) -> Self {
        Token(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A token denotes a chord when it contains the separator or consists
    /// entirely of digits; anything else is a named pitch.
    ///
    /// Known quirk of the rule: a pitch named by a single digit would
    /// classify as a one-note chord. Kept as-is so corpora encoded by
    /// earlier runs keep their meaning.
    pub fn is_chord(&self) -> bool {
        self.0.contains(CHORD_SEPARATOR)
            || (!self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Decode into a renderable event.
    pub fn decode(&self) -> Result<NoteEvent> {
        if !self.is_chord() {
            return Ok(NoteEvent::Pitch(self.0.clone()));
        }

        let mut classes = Vec::new();
        for component in self.0.split(CHORD_SEPARATOR) {
            let pc: u8 = component
                .parse()
                .map_err(|_| Error::InvalidChordComponent {
                    token: self.0.clone(),
                    component: component.to_string(),
                })?;
            classes.push(pc);
        }
        Ok(NoteEvent::Chord(classes))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token(s)
    }
}

/// A renderable musical event with the note/chord decision already made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    /// A single named pitch, e.g. `"C4"`.
    Pitch(String),
    /// A chord as pitch-class integers.
    Chord(Vec<u8>),
}
