//! Plucked-string voice (Karplus-Strong)
//!
//! A noise burst circulates in a delay line one period long. Each pass goes
//! through a one-pole low-pass (`dampening`) and a feedback gain derived
//! from `resonance`, so the tone darkens and decays like a string.

use std::f64::consts::PI;

use super::{Adsr, Envelope, Voice};

/// Karplus-Strong plucked string
pub struct PluckVoice {
    sample_rate: f64,
    buffer: Vec<f64>,
    position: usize,
    /// Excitation noise amplitude
    attack_noise: f64,
    /// Loop low-pass cutoff in Hz
    dampening: f64,
    /// 0.0-1.0, higher rings longer
    resonance: f64,
    filter_state: f64,
    /// Release gate, the string itself never sustains
    gate: Envelope,
    rng_state: u64,
}

impl PluckVoice {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            buffer: Vec::new(),
            position: 0,
            attack_noise: 1.0,
            dampening: 4000.0,
            resonance: 0.7,
            filter_state: 0.0,
            gate: Envelope::new(Adsr::new(0.001, 0.001, 1.0, 1.0), sample_rate),
            rng_state: 0x2545_f491_4f6c_dd1d,
        }
    }

    fn feedback(&self) -> f64 {
        0.96 + 0.039 * self.resonance
    }

    /// Xorshift RNG for the excitation burst
    fn random(&mut self) -> f64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        (x as f64 / u64::MAX as f64) * 2.0 - 1.0
    }

    fn damp(&mut self, input: f64) -> f64 {
        let rc = 1.0 / (2.0 * PI * self.dampening);
        let dt = 1.0 / self.sample_rate;
        let alpha = dt / (rc + dt);

        self.filter_state += alpha * (input - self.filter_state);
        self.filter_state
    }
}

impl Voice for PluckVoice {
    fn note_on(&mut self, frequency: f64) {
        let period = (self.sample_rate / frequency.max(1.0)).round().max(2.0) as usize;

        self.buffer.clear();
        for _ in 0..period {
            let noise = self.random() * self.attack_noise;
            self.buffer.push(noise);
        }
        self.position = 0;
        self.filter_state = 0.0;
        self.gate.reset();
        self.gate.trigger();
    }

    fn note_off(&mut self) {
        self.gate.release();
    }

    fn is_active(&self) -> bool {
        self.gate.is_active()
    }

    fn process(&mut self) -> f64 {
        if !self.gate.is_active() || self.buffer.is_empty() {
            return 0.0;
        }

        let current = self.buffer[self.position];
        let next = self.buffer[(self.position + 1) % self.buffer.len()];
        let averaged = self.damp(0.5 * (current + next));
        self.buffer[self.position] = averaged * self.feedback();
        self.position = (self.position + 1) % self.buffer.len();

        current * self.gate.process()
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.dampening = self.dampening.min(sample_rate / 2.0);
        self.gate.set_sample_rate(sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluck_silent_until_triggered() {
        let mut voice = PluckVoice::new(44100.0);
        assert!(!voice.is_active());
        assert_eq!(voice.process(), 0.0);
    }

    #[test]
    fn test_pluck_decays() {
        let mut voice = PluckVoice::new(44100.0);
        voice.note_on(261.63);

        let early = (0..2000).map(|_| voice.process().abs()).fold(0.0, f64::max);
        for _ in 0..40000 {
            voice.process();
        }
        let late = (0..2000).map(|_| voice.process().abs()).fold(0.0, f64::max);

        assert!(early > 0.1);
        assert!(late < early / 2.0, "early {} late {}", early, late);
    }

    #[test]
    fn test_pluck_release_stops_voice() {
        let mut voice = PluckVoice::new(44100.0);
        voice.note_on(440.0);
        for _ in 0..100 {
            voice.process();
        }

        voice.note_off();
        for _ in 0..44100 + 100 {
            voice.process();
        }
        assert!(!voice.is_active());
    }

    #[test]
    fn test_pluck_has_no_oscillator() {
        let mut voice = PluckVoice::new(44100.0);
        assert!(!voice.set_waveform(crate::synth::Waveform::default()));
    }
}
