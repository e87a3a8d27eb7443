//! Mixer of engine channels
//!
//! Each channel owns one voice, a level in decibels and a routing flag.
//! Note releases are scheduled on the mixer clock so an attack-release
//! lasts exactly its duration in samples.

use crate::synth::{Voice, Waveform};

/// Index of a channel in its mixer
pub type ChannelId = usize;

/// Convert decibels to linear gain
pub fn db_to_gain(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

struct MixerChannel {
    voice: Box<dyn Voice>,
    volume_db: f64,
    gain: f64,
    routed: bool,
    release_at: Option<u64>,
}

/// The main mixer
pub struct Mixer {
    channels: Vec<MixerChannel>,
    sample_rate: f64,
    master_volume: f64,
    /// Samples rendered so far
    clock: u64,
}

impl Mixer {
    pub fn new(sample_rate: f64, master_volume: f64) -> Self {
        Self {
            channels: Vec::new(),
            sample_rate,
            master_volume,
            clock: 0,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Change the sample rate of the mixer and every voice
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        for channel in &mut self.channels {
            channel.voice.set_sample_rate(sample_rate);
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Add a channel at 0 dB, not yet routed to the output
    pub fn add_channel(&mut self, voice: Box<dyn Voice>) -> ChannelId {
        self.channels.push(MixerChannel {
            voice,
            volume_db: 0.0,
            gain: 1.0,
            routed: false,
            release_at: None,
        });
        self.channels.len() - 1
    }

    pub fn set_volume(&mut self, id: ChannelId, db: f64) {
        if let Some(channel) = self.channels.get_mut(id) {
            channel.volume_db = db;
            channel.gain = db_to_gain(db);
        }
    }

    pub fn volume(&self, id: ChannelId) -> Option<f64> {
        self.channels.get(id).map(|c| c.volume_db)
    }

    /// Send a channel to the output
    pub fn route(&mut self, id: ChannelId) {
        if let Some(channel) = self.channels.get_mut(id) {
            channel.routed = true;
        }
    }

    pub fn is_routed(&self, id: ChannelId) -> bool {
        self.channels.get(id).is_some_and(|c| c.routed)
    }

    /// Set a channel's oscillator; `false` if the voice has none
    pub fn set_waveform(&mut self, id: ChannelId, waveform: Waveform) -> bool {
        self.channels
            .get_mut(id)
            .is_some_and(|c| c.voice.set_waveform(waveform))
    }

    /// Start a note now and release it `seconds` later
    pub fn trigger_attack_release(&mut self, id: ChannelId, frequency: f64, seconds: f64) {
        let samples = (seconds.max(0.0) * self.sample_rate).round() as u64;
        let release_at = self.clock + samples;

        if let Some(channel) = self.channels.get_mut(id) {
            channel.voice.note_on(frequency);
            channel.release_at = Some(release_at);
        }
    }

    /// Check if any routed channel is still sounding
    pub fn has_active_channels(&self) -> bool {
        self.channels.iter().any(|c| c.routed && c.voice.is_active())
    }

    /// Generate the next mixed sample
    pub fn process(&mut self) -> f64 {
        let mut output = 0.0;

        for channel in &mut self.channels {
            if channel.release_at.is_some_and(|at| at <= self.clock) {
                channel.voice.note_off();
                channel.release_at = None;
            }

            if channel.voice.is_active() {
                let sample = channel.voice.process();
                if channel.routed {
                    output += sample * channel.gain;
                }
            }
        }

        self.clock += 1;
        output * self.master_volume
    }

    /// Fill a buffer with mixed audio
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }
    }
}
