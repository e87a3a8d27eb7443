//! Basic tone voice: one oscillator shaped by an ADSR envelope

use super::{Adsr, Envelope, Oscillator, Voice, Waveform};

/// Single-oscillator voice
pub struct ToneVoice {
    oscillator: Oscillator,
    envelope: Envelope,
}

impl ToneVoice {
    /// Create a tone voice with a triangle wave and the default envelope
    pub fn new(sample_rate: f64) -> Self {
        Self::with_settings(Waveform::default(), Adsr::default(), sample_rate)
    }

    pub fn with_settings(waveform: Waveform, adsr: Adsr, sample_rate: f64) -> Self {
        Self {
            oscillator: Oscillator::new(waveform, 440.0, sample_rate),
            envelope: Envelope::new(adsr, sample_rate),
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    pub fn frequency(&self) -> f64 {
        self.oscillator.frequency()
    }
}

impl Voice for ToneVoice {
    fn note_on(&mut self, frequency: f64) {
        if !self.envelope.is_active() {
            self.oscillator.reset();
        }
        self.oscillator.set_frequency(frequency);
        self.envelope.trigger();
    }

    fn note_off(&mut self) {
        self.envelope.release();
    }

    fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    fn process(&mut self) -> f64 {
        if !self.envelope.is_active() {
            return 0.0;
        }
        let level = self.envelope.process();
        self.oscillator.generate() * level
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.oscillator.set_sample_rate(sample_rate);
        self.envelope.set_sample_rate(sample_rate);
    }

    fn set_waveform(&mut self, waveform: Waveform) -> bool {
        self.oscillator.set_waveform(waveform);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Shape;

    #[test]
    fn test_tone_voice_silent_until_triggered() {
        let mut voice = ToneVoice::new(44100.0);
        assert!(!voice.is_active());
        assert_eq!(voice.process(), 0.0);
    }

    #[test]
    fn test_tone_voice_output() {
        let mut voice = ToneVoice::new(44100.0);
        voice.note_on(261.63);
        assert!(voice.is_active());
        assert_eq!(voice.frequency(), 261.63);

        let max = (0..2000).map(|_| voice.process().abs()).fold(0.0, f64::max);
        assert!(max > 0.1);
    }

    #[test]
    fn test_tone_voice_release_fades_out() {
        let mut voice = ToneVoice::with_settings(
            Waveform::new(Shape::Sine),
            Adsr::new(0.001, 0.01, 0.5, 0.01),
            44100.0,
        );
        voice.note_on(440.0);
        for _ in 0..1000 {
            voice.process();
        }

        voice.note_off();
        for _ in 0..1000 {
            voice.process();
        }
        assert!(!voice.is_active());
        assert_eq!(voice.process(), 0.0);
    }

    #[test]
    fn test_tone_voice_accepts_waveform() {
        let mut voice = ToneVoice::new(44100.0);
        assert!(voice.set_waveform(Waveform::with_partials(Shape::Sine, 2)));
        assert_eq!(voice.waveform().to_string(), "sine2");
    }
}
