//! Audio engine for keycue
//!
//! [`Engine`] implements the [`AudioEngine`] capability on top of a shared
//! [`Mixer`]. Voice handles ([`Channel`]) and the real-time [`Player`]
//! hold clones of the same mixer.

mod mixer;
mod player;
mod provider;
mod recorder;

pub use mixer::{db_to_gain, ChannelId, Mixer};
pub use player::{default_device_name, list_output_devices, Player};
pub use provider::{AudioEngine, VoiceHandle};
pub use recorder::WavRecorder;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::KeycueConfig;
use crate::notation::{pitch_frequency, NoteValue};
use crate::synth::{PluckVoice, ToneVoice, Voice, Waveform};

/// Lock a mixer, recovering it if a previous holder panicked
pub(crate) fn lock_mixer(mixer: &Mutex<Mixer>) -> MutexGuard<'_, Mixer> {
    mixer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The synthesis engine
pub struct Engine {
    mixer: Arc<Mutex<Mixer>>,
    bpm: f64,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: &KeycueConfig) -> Self {
        Self::with_settings(
            config.audio.sample_rate as f64,
            config.master.bpm as f64,
            config.master.volume as f64,
        )
    }

    pub fn with_settings(sample_rate: f64, bpm: f64, master_volume: f64) -> Self {
        Self {
            mixer: Arc::new(Mutex::new(Mixer::new(sample_rate, master_volume))),
            bpm,
        }
    }

    /// Shared handle to the mixer, for the player
    pub fn mixer(&self) -> Arc<Mutex<Mixer>> {
        Arc::clone(&self.mixer)
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn sample_rate(&self) -> f64 {
        lock_mixer(&self.mixer).sample_rate()
    }

    /// Check if any routed voice is still sounding
    pub fn is_sounding(&self) -> bool {
        lock_mixer(&self.mixer).has_active_channels()
    }

    /// Render `seconds` of audio offline
    pub fn render(&self, seconds: f64) -> Vec<f32> {
        let mut mixer = lock_mixer(&self.mixer);
        let len = (seconds.max(0.0) * mixer.sample_rate()).round() as usize;
        let mut buffer = vec![0.0f32; len];
        mixer.fill_buffer(&mut buffer);
        buffer
    }

    fn add_channel(&self, voice: Box<dyn Voice>) -> Channel {
        let id = lock_mixer(&self.mixer).add_channel(voice);
        log::debug!("created engine channel {}", id);
        Channel {
            mixer: self.mixer(),
            id,
            bpm: self.bpm,
        }
    }
}

impl AudioEngine for Engine {
    type Voice = Channel;

    fn synth(&self) -> Channel {
        let sample_rate = self.sample_rate();
        self.add_channel(Box::new(ToneVoice::new(sample_rate)))
    }

    fn pluck_synth(&self) -> Channel {
        let sample_rate = self.sample_rate();
        self.add_channel(Box::new(PluckVoice::new(sample_rate)))
    }
}

/// Handle to one mixer channel
pub struct Channel {
    mixer: Arc<Mutex<Mixer>>,
    id: ChannelId,
    bpm: f64,
}

impl Channel {
    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn volume(&self) -> Option<f64> {
        lock_mixer(&self.mixer).volume(self.id)
    }

    pub fn is_routed(&self) -> bool {
        lock_mixer(&self.mixer).is_routed(self.id)
    }
}

impl VoiceHandle for Channel {
    fn set_oscillator_type(&mut self, shape: &str) {
        let waveform = match shape.parse::<Waveform>() {
            Ok(waveform) => waveform,
            Err(e) => {
                log::warn!("channel {}: {}, keeping current oscillator", self.id, e);
                return;
            }
        };

        if !lock_mixer(&self.mixer).set_waveform(self.id, waveform) {
            log::warn!("channel {} has no oscillator, ignoring type '{}'", self.id, shape);
        }
    }

    fn set_volume(&mut self, db: f64) {
        lock_mixer(&self.mixer).set_volume(self.id, db);
    }

    fn to_destination(&mut self) {
        lock_mixer(&self.mixer).route(self.id);
    }

    fn trigger_attack_release(&self, pitch: &str, duration: NoteValue) {
        let frequency = match pitch_frequency(pitch) {
            Ok(frequency) => frequency,
            Err(e) => {
                log::warn!("channel {}: ignoring trigger, {}", self.id, e);
                return;
            }
        };

        log::debug!(
            "channel {}: {} ({:.2} Hz) for {}",
            self.id,
            pitch,
            frequency,
            duration
        );
        lock_mixer(&self.mixer).trigger_attack_release(
            self.id,
            frequency,
            duration.seconds(self.bpm),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_engine() -> Engine {
        Engine::with_settings(8000.0, 120.0, 1.0)
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |a, &b| a.max(b.abs()))
    }

    #[test]
    fn test_engine_from_config() {
        let engine = Engine::new(&KeycueConfig::default());
        assert_eq!(engine.sample_rate(), 44100.0);
        assert_eq!(engine.bpm(), 120.0);
        assert!(!engine.is_sounding());
    }

    #[test]
    fn test_channels_get_distinct_ids() {
        let engine = test_engine();
        let a = engine.synth();
        let b = engine.pluck_synth();
        assert_ne!(a.id(), b.id());
        assert_eq!(lock_mixer(&engine.mixer).channel_count(), 2);
    }

    #[test]
    fn test_new_channel_is_unrouted_at_unity() {
        let engine = test_engine();
        let channel = engine.synth();
        assert_eq!(channel.volume(), Some(0.0));
        assert!(!channel.is_routed());
    }

    #[test]
    fn test_triggered_channel_renders_audio() {
        let engine = test_engine();
        let mut channel = engine.synth();
        channel.to_destination();
        channel.trigger_attack_release("A4", NoteValue::Eighth);

        assert!(engine.is_sounding());
        assert!(peak(&engine.render(0.2)) > 0.1);
    }

    #[test]
    fn test_note_length_follows_tempo() {
        let engine = test_engine();
        let mut channel = engine.synth();
        channel.to_destination();
        channel.trigger_attack_release("A4", NoteValue::Sixteenth);

        // 16n at 120 bpm is 125 ms, then a 1 s release
        engine.render(0.125);
        assert!(engine.is_sounding());
        engine.render(1.05);
        assert!(!engine.is_sounding());
    }

    #[test]
    fn test_bad_pitch_is_ignored() {
        let engine = test_engine();
        let mut channel = engine.synth();
        channel.to_destination();
        channel.trigger_attack_release("not a note", NoteValue::Eighth);

        assert!(!engine.is_sounding());
        assert_eq!(peak(&engine.render(0.1)), 0.0);
    }

    #[test]
    fn test_oscillator_type_on_pluck_is_ignored() {
        let engine = test_engine();
        let mut channel = engine.pluck_synth();
        channel.set_oscillator_type("sine2");
        channel.set_volume(-10.0);
        assert_eq!(channel.volume(), Some(-10.0));
    }

    #[test]
    fn test_render_length() {
        let engine = test_engine();
        assert_eq!(engine.render(0.5).len(), 4000);
        assert_eq!(engine.render(-1.0).len(), 0);
    }
}
