//! ADSR envelope generator
//!
//! Linear attack, decay and release segments around a held sustain level.

/// Envelope stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Envelope timings in seconds, sustain as a level in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Adsr {
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.001),
            decay: decay.max(0.001),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.001),
        }
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new(0.005, 0.1, 0.3, 1.0)
    }
}

/// ADSR envelope generator
pub struct Envelope {
    sample_rate: f64,
    adsr: Adsr,
    stage: EnvelopeStage,
    level: f64,
    release_start_level: f64,
}

impl Envelope {
    pub fn new(adsr: Adsr, sample_rate: f64) -> Self {
        Self {
            sample_rate,
            adsr,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_start_level: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Start the attack from the current level
    pub fn trigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Start the release phase
    pub fn release(&mut self) {
        if self.stage != EnvelopeStage::Idle && self.stage != EnvelopeStage::Release {
            self.release_start_level = self.level;
            self.stage = EnvelopeStage::Release;
        }
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Generate the next envelope sample
    pub fn process(&mut self) -> f64 {
        let dt = 1.0 / self.sample_rate;

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += dt / self.adsr.attack;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                let target = self.adsr.sustain;
                self.level -= (1.0 - target) / self.adsr.decay * dt;
                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.adsr.sustain;
                if self.level <= 0.0 {
                    self.stage = EnvelopeStage::Idle;
                }
            }

            EnvelopeStage::Release => {
                self.level -= self.release_start_level / self.adsr.release * dt;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_creation() {
        let env = Envelope::new(Adsr::default(), 44100.0);
        assert_eq!(env.stage(), EnvelopeStage::Idle);
        assert_eq!(env.level(), 0.0);
        assert!(!env.is_active());
    }

    #[test]
    fn test_adsr_clamps_inputs() {
        let adsr = Adsr::new(0.0, -1.0, 2.0, 0.0);
        assert_eq!(adsr.attack, 0.001);
        assert_eq!(adsr.decay, 0.001);
        assert_eq!(adsr.sustain, 1.0);
        assert_eq!(adsr.release, 0.001);
    }

    #[test]
    fn test_envelope_reaches_sustain() {
        let mut env = Envelope::new(Adsr::new(0.001, 0.001, 0.5, 0.001), 44100.0);
        env.trigger();

        for _ in 0..500 {
            env.process();
        }

        assert!((env.level() - 0.5).abs() < 0.01);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
    }

    #[test]
    fn test_envelope_release_returns_to_idle() {
        let mut env = Envelope::new(Adsr::new(0.001, 0.001, 0.5, 0.01), 44100.0);
        env.trigger();
        for _ in 0..200 {
            env.process();
        }

        env.release();
        assert_eq!(env.stage(), EnvelopeStage::Release);

        for _ in 0..1000 {
            env.process();
        }
        assert_eq!(env.level(), 0.0);
        assert_eq!(env.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn test_release_while_idle_is_ignored() {
        let mut env = Envelope::new(Adsr::default(), 44100.0);
        env.release();
        assert_eq!(env.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn test_zero_sustain_goes_idle_without_release() {
        let mut env = Envelope::new(Adsr::new(0.001, 0.001, 0.0, 0.5), 44100.0);
        env.trigger();
        for _ in 0..500 {
            env.process();
        }
        assert!(!env.is_active());
    }
}
