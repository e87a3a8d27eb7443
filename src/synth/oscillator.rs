//! Oscillator with Tone-style shape names
//!
//! A shape string is a base shape optionally followed by a partial count:
//! "sine", "sine2", "square8", "sawtooth". With a partial count the
//! waveform is built additively from that many harmonics of its Fourier
//! series; without one the ideal shape is generated directly.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::notation::NotationError;

/// Base oscillator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl Shape {
    fn name(&self) -> &'static str {
        match self {
            Shape::Sine => "sine",
            Shape::Triangle => "triangle",
            Shape::Sawtooth => "sawtooth",
            Shape::Square => "square",
        }
    }

    /// Fourier sine coefficient of harmonic `n` (1-based)
    fn partial(&self, n: u32) -> f64 {
        let nf = n as f64;
        let odd = n % 2 == 1;
        match self {
            Shape::Sine => {
                if n == 1 { 1.0 } else { 0.0 }
            }
            Shape::Square => {
                if odd { 4.0 / (nf * PI) } else { 0.0 }
            }
            Shape::Sawtooth => {
                let sign = if odd { 1.0 } else { -1.0 };
                sign * 2.0 / (nf * PI)
            }
            Shape::Triangle => {
                if !odd {
                    return 0.0;
                }
                let sign = if (n - 1) / 2 % 2 == 0 { 1.0 } else { -1.0 };
                sign * 8.0 / (nf * nf * PI * PI)
            }
        }
    }
}

/// Oscillator waveform: a shape and an optional harmonic limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waveform {
    pub shape: Shape,
    pub partials: Option<u32>,
}

impl Waveform {
    pub const fn new(shape: Shape) -> Self {
        Self { shape, partials: None }
    }

    pub const fn with_partials(shape: Shape, partials: u32) -> Self {
        Self { shape, partials: Some(partials) }
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::new(Shape::Triangle)
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.partials {
            Some(count) => write!(f, "{}{}", self.shape.name(), count),
            None => f.write_str(self.shape.name()),
        }
    }
}

impl FromStr for Waveform {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let digits_at = lower
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(lower.len());
        let (name, count) = lower.split_at(digits_at);

        let shape = match name {
            "sine" => Shape::Sine,
            "triangle" => Shape::Triangle,
            "sawtooth" | "saw" => Shape::Sawtooth,
            "square" => Shape::Square,
            _ => return Err(NotationError::UnknownWaveform(s.to_string())),
        };

        if count.is_empty() {
            return Ok(Waveform::new(shape));
        }

        match count.parse::<u32>() {
            Ok(partials) if partials > 0 => Ok(Waveform::with_partials(shape, partials)),
            _ => Err(NotationError::UnknownWaveform(s.to_string())),
        }
    }
}

/// A single oscillator
pub struct Oscillator {
    waveform: Waveform,
    phase: f64,
    frequency: f64,
    sample_rate: f64,
}

impl Oscillator {
    /// Create a new oscillator
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        Self {
            waveform,
            phase: 0.0,
            frequency,
            sample_rate,
        }
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Reset the phase
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate the next sample
    pub fn generate(&mut self) -> f64 {
        let sample = match self.waveform.partials {
            Some(count) => self.additive(count),
            None => match self.waveform.shape {
                Shape::Sine => self.sine(),
                Shape::Triangle => self.triangle(),
                Shape::Sawtooth => self.saw(),
                Shape::Square => self.square(),
            },
        };

        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        sample
    }

    /// Sum of the first `count` harmonics, skipping those above Nyquist
    fn additive(&self, count: u32) -> f64 {
        let nyquist = self.sample_rate / 2.0;
        let mut sum = 0.0;
        for n in 1..=count {
            if self.frequency * n as f64 >= nyquist {
                break;
            }
            let amplitude = self.waveform.shape.partial(n);
            if amplitude != 0.0 {
                sum += amplitude * (self.phase * 2.0 * PI * n as f64).sin();
            }
        }
        sum
    }

    fn sine(&self) -> f64 {
        (self.phase * 2.0 * PI).sin()
    }

    fn triangle(&self) -> f64 {
        let p = self.phase;
        if p < 0.25 {
            4.0 * p
        } else if p < 0.75 {
            2.0 - 4.0 * p
        } else {
            4.0 * p - 4.0
        }
    }

    fn saw(&self) -> f64 {
        2.0 * self.phase - 1.0
    }

    fn square(&self) -> f64 {
        if self.phase < 0.5 { 1.0 } else { -1.0 }
    }
}
