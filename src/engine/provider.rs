//! Audio-engine capability
//!
//! The dispatcher only talks to these two traits. [`super::Engine`] renders
//! real audio; tests substitute an engine that records trigger calls.

use crate::notation::NoteValue;

/// Factory for voices
pub trait AudioEngine {
    type Voice: VoiceHandle;

    /// A basic tone-generator voice (oscillator + envelope)
    fn synth(&self) -> Self::Voice;

    /// A plucked-string voice
    fn pluck_synth(&self) -> Self::Voice;
}

/// A voice owned by a caller of the engine
pub trait VoiceHandle {
    /// Set the oscillator shape, e.g. "sine2"
    ///
    /// The string is engine-defined and passed through unchanged.
    fn set_oscillator_type(&mut self, shape: &str);

    /// Set the output level in decibels
    fn set_volume(&mut self, db: f64);

    /// Route the voice to the default output
    fn to_destination(&mut self);

    /// Play `pitch` (e.g. "C#4") for `duration`, then release
    ///
    /// Returns immediately; rendering is scheduled by the engine.
    fn trigger_attack_release(&self, pitch: &str, duration: NoteValue);
}
