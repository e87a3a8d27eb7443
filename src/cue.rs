//! Sound cues: the external events the dispatcher reacts to

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::midi::MidiMessage;
use crate::notation::parse_pitch;

/// One request to make a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A piano note by note number
    Piano(i32),
    Buzzer,
    Ticker,
}

/// Errors from parsing a cue string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CueError {
    #[error("piano cue needs a note, e.g. piano:60 or piano:C4")]
    MissingNote,

    #[error("invalid piano note '{0}'")]
    InvalidNote(String),

    #[error("unknown cue '{0}' (expected piano:<note>, buzzer or ticker)")]
    Unknown(String),
}

impl Cue {
    /// Map a MIDI message to a cue
    ///
    /// Only note-ons become cues; `channel` restricts which channel counts.
    pub fn from_midi(message: &MidiMessage, channel: Option<u8>) -> Option<Cue> {
        match *message {
            MidiMessage::NoteOn(_, note, _) if channel.map_or(true, |c| c == message.channel()) => {
                Some(Cue::Piano(note as i32))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Piano(note) => write!(f, "piano:{}", note),
            Cue::Buzzer => f.write_str("buzzer"),
            Cue::Ticker => f.write_str("ticker"),
        }
    }
}

impl FromStr for Cue {
    type Err = CueError;

    /// Accepts `piano:<number>`, `piano:<pitch name>`, `buzzer`, `ticker`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg.trim())),
            None => (s, None),
        };

        match (kind.to_ascii_lowercase().as_str(), arg) {
            ("piano", None) | ("piano", Some("")) => Err(CueError::MissingNote),
            ("piano", Some(note)) => note
                .parse::<i32>()
                .or_else(|_| parse_pitch(note))
                .map(Cue::Piano)
                .map_err(|_| CueError::InvalidNote(note.to_string())),
            ("buzzer", None) => Ok(Cue::Buzzer),
            ("ticker", None) => Ok(Cue::Ticker),
            _ => Err(CueError::Unknown(s.to_string())),
        }
    }
}
