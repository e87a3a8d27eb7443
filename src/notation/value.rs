//! Tone-style note values

use std::fmt;
use std::str::FromStr;

use super::NotationError;

/// A note length relative to the tempo, written "<division>n"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteValue {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl NoteValue {
    /// Number of these notes in a 4/4 bar
    pub fn division(&self) -> u32 {
        match self {
            NoteValue::Whole => 1,
            NoteValue::Half => 2,
            NoteValue::Quarter => 4,
            NoteValue::Eighth => 8,
            NoteValue::Sixteenth => 16,
            NoteValue::ThirtySecond => 32,
        }
    }

    /// Length in seconds at the given tempo (quarter note = one beat)
    pub fn seconds(&self, bpm: f64) -> f64 {
        (60.0 / bpm) * (4.0 / self.division() as f64)
    }
}

impl fmt::Display for NoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}n", self.division())
    }
}

impl FromStr for NoteValue {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1n" => Ok(NoteValue::Whole),
            "2n" => Ok(NoteValue::Half),
            "4n" => Ok(NoteValue::Quarter),
            "8n" => Ok(NoteValue::Eighth),
            "16n" => Ok(NoteValue::Sixteenth),
            "32n" => Ok(NoteValue::ThirtySecond),
            other => Err(NotationError::UnknownNoteValue(other.to_string())),
        }
    }
}
