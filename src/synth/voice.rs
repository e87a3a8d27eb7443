//! Voice trait for sound generators

use super::Waveform;

/// A monophonic sound generator rendered by the mixer
pub trait Voice: Send {
    /// Start a note at the given frequency
    fn note_on(&mut self, frequency: f64);

    /// Let the current note ring out
    fn note_off(&mut self);

    /// Check if the voice is still producing sound
    fn is_active(&self) -> bool;

    /// Generate the next sample
    fn process(&mut self) -> f64;

    /// Set the sample rate
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Change the oscillator waveform
    ///
    /// Returns `false` for voices without an oscillator.
    fn set_waveform(&mut self, _waveform: Waveform) -> bool {
        false
    }
}
