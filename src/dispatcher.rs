//! Sound dispatcher
//!
//! Owns the piano, buzzer and ticker voices and turns play requests into
//! attack-release triggers on them.

use crate::config::{VoiceSettings, VoicesConfig};
use crate::cue::Cue;
use crate::engine::{AudioEngine, VoiceHandle};
use crate::notation::{self, NoteValue};

/// Length of a piano note
pub const PIANO_NOTE_VALUE: NoteValue = NoteValue::Eighth;

/// Buzzer pitch and length
pub const BUZZER_PITCH: &str = "C2";
pub const BUZZER_NOTE_VALUE: NoteValue = NoteValue::Sixteenth;

/// Ticker pitch and length
pub const TICKER_PITCH: &str = "C4";
pub const TICKER_NOTE_VALUE: NoteValue = NoteValue::Sixteenth;

/// Plays piano notes, the buzzer and the ticker through an engine
pub struct SoundDispatcher<E: AudioEngine> {
    piano: E::Voice,
    buzzer: E::Voice,
    ticker: E::Voice,
}

impl<E: AudioEngine> SoundDispatcher<E> {
    /// Create the three voices with their standard settings:
    /// piano "sine2" at -10 dB, buzzer at engine defaults, ticker plucked at -10 dB
    pub fn new(engine: &E) -> Self {
        Self::with_voices(engine, &VoicesConfig::default())
    }

    /// Create the three voices from configured settings
    pub fn with_voices(engine: &E, voices: &VoicesConfig) -> Self {
        Self {
            piano: configure(engine.synth(), &voices.piano),
            buzzer: configure(engine.synth(), &voices.buzzer),
            ticker: configure(engine.pluck_synth(), &voices.ticker),
        }
    }

    /// Name of a note number, `None` outside 21..=108
    pub fn note_name(note_number: i32) -> Option<String> {
        notation::note_name(note_number)
    }

    /// Play a piano note for an eighth note; out-of-range notes are ignored
    pub fn play_piano(&self, note: i32) {
        match Self::note_name(note) {
            Some(name) => self.piano.trigger_attack_release(&name, PIANO_NOTE_VALUE),
            None => log::debug!("note {} has no name, not playing", note),
        }
    }

    pub fn play_buzzer(&self) {
        self.buzzer.trigger_attack_release(BUZZER_PITCH, BUZZER_NOTE_VALUE);
    }

    pub fn play_ticker(&self) {
        self.ticker.trigger_attack_release(TICKER_PITCH, TICKER_NOTE_VALUE);
    }

    /// Play whatever sound a cue asks for
    pub fn dispatch(&self, cue: Cue) {
        match cue {
            Cue::Piano(note) => self.play_piano(note),
            Cue::Buzzer => self.play_buzzer(),
            Cue::Ticker => self.play_ticker(),
        }
    }
}

fn configure<V: VoiceHandle>(mut voice: V, settings: &VoiceSettings) -> V {
    if let Some(shape) = &settings.oscillator {
        voice.set_oscillator_type(shape);
    }
    if let Some(db) = settings.volume {
        voice.set_volume(db);
    }
    voice.to_destination();
    voice
}
