//! Musical notation helpers
//!
//! Note numbers, pitch names and Tone-style note values ("8n", "16n").

mod pitch;
mod value;

pub use pitch::{midi_to_frequency, note_name, parse_pitch, pitch_frequency, PITCH_CLASSES};
pub use value::NoteValue;

use thiserror::Error;

/// Lowest note number with a name (A0)
pub const LOWEST_NOTE: i32 = 21;

/// Highest note number with a name (C8)
pub const HIGHEST_NOTE: i32 = 108;

/// Errors from parsing notation strings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotationError {
    #[error("empty pitch name")]
    EmptyPitch,

    #[error("invalid pitch class in '{0}'")]
    InvalidPitchClass(String),

    #[error("invalid octave in '{0}'")]
    InvalidOctave(String),

    #[error("unknown note value '{0}' (expected 1n, 2n, 4n, 8n, 16n or 32n)")]
    UnknownNoteValue(String),

    #[error("unknown oscillator type '{0}'")]
    UnknownWaveform(String),
}
