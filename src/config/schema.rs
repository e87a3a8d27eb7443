//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::notation::{HIGHEST_NOTE, LOWEST_NOTE};
use crate::synth::Waveform;

/// Main configuration for keycue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeycueConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Tempo and master level
    #[serde(default)]
    pub master: MasterConfig,

    /// The three dispatcher voices
    #[serde(default)]
    pub voices: VoicesConfig,

    /// MIDI keyboard input
    #[serde(default)]
    pub midi: MidiConfig,

    /// Computer keyboard input
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

impl KeycueConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        if self.master.volume < 0.0 || self.master.volume > 1.0 {
            bail!("Master volume must be between 0.0 and 1.0");
        }
        if self.master.bpm < 20.0 || self.master.bpm > 300.0 {
            bail!("BPM must be between 20 and 300");
        }

        for (name, voice) in self.voices.iter() {
            if let Some(db) = voice.volume {
                if !(-60.0..=12.0).contains(&db) {
                    bail!("Voice '{}' volume must be between -60 and 12 dB", name);
                }
            }
            if let Some(shape) = &voice.oscillator {
                if let Err(e) = shape.parse::<Waveform>() {
                    bail!("Voice '{}': {}", name, e);
                }
            }
        }

        if let Some(channel) = self.midi.channel {
            if channel > 15 {
                bail!("MIDI channel must be between 0 and 15");
            }
        }

        let base = self.keyboard.base_note;
        if !(LOWEST_NOTE..=HIGHEST_NOTE).contains(&base) {
            bail!("Keyboard base note must be between {} and {}", LOWEST_NOTE, HIGHEST_NOTE);
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz for offline rendering (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in samples (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 512 }

/// Master settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Tempo that note values ("8n") are measured against (default: 120)
    #[serde(default = "default_bpm")]
    pub bpm: f32,

    /// Master volume 0.0-1.0 (default: 0.8)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            bpm: default_bpm(),
            volume: default_volume(),
        }
    }
}

fn default_bpm() -> f32 { 120.0 }
fn default_volume() -> f32 { 0.8 }

/// Settings applied to one voice when the dispatcher creates it
///
/// `None` leaves the engine default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Oscillator type string, passed to the engine unchanged
    #[serde(default)]
    pub oscillator: Option<String>,

    /// Output level in dB
    #[serde(default)]
    pub volume: Option<f64>,
}

/// The dispatcher's voices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicesConfig {
    #[serde(default = "default_piano")]
    pub piano: VoiceSettings,

    #[serde(default)]
    pub buzzer: VoiceSettings,

    #[serde(default = "default_ticker")]
    pub ticker: VoiceSettings,
}

impl VoicesConfig {
    /// Voices with their names, for reporting
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &VoiceSettings)> {
        [
            ("piano", &self.piano),
            ("buzzer", &self.buzzer),
            ("ticker", &self.ticker),
        ]
        .into_iter()
    }
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            piano: default_piano(),
            buzzer: VoiceSettings::default(),
            ticker: default_ticker(),
        }
    }
}

fn default_piano() -> VoiceSettings {
    VoiceSettings {
        oscillator: Some("sine2".to_string()),
        volume: Some(-10.0),
    }
}

fn default_ticker() -> VoiceSettings {
    VoiceSettings {
        oscillator: None,
        volume: Some(-10.0),
    }
}

/// MIDI input configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MidiConfig {
    /// Input port name filter (None = first port)
    #[serde(default)]
    pub port: Option<String>,

    /// Only accept notes on this channel, 0-15 (None = all channels)
    #[serde(default)]
    pub channel: Option<u8>,
}

/// Computer keyboard input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Note number played by the first key of the row (default: 60)
    #[serde(default = "default_base_note")]
    pub base_note: i32,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            base_note: default_base_note(),
        }
    }
}

fn default_base_note() -> i32 { 60 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_audio_config() {
        let yaml = "sample_rate: 48000";
        let config: AudioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.buffer_size, 512);
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config: KeycueConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, KeycueConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_voices() {
        let voices = VoicesConfig::default();
        assert_eq!(voices.piano.oscillator.as_deref(), Some("sine2"));
        assert_eq!(voices.piano.volume, Some(-10.0));
        assert_eq!(voices.buzzer, VoiceSettings::default());
        assert_eq!(voices.ticker.oscillator, None);
        assert_eq!(voices.ticker.volume, Some(-10.0));
    }

    #[test]
    fn test_partial_voice_section_keeps_other_defaults() {
        let yaml = r#"
buzzer:
  oscillator: square
  volume: -3
"#;
        let voices: VoicesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(voices.buzzer.oscillator.as_deref(), Some("square"));
        assert_eq!(voices.buzzer.volume, Some(-3.0));
        assert_eq!(voices.piano, default_piano());
    }

    #[test]
    fn test_invalid_oscillator() {
        let mut config = KeycueConfig::default();
        config.voices.piano.oscillator = Some("wobble".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("piano"));
    }

    #[test]
    fn test_invalid_ranges() {
        let mut config = KeycueConfig::default();
        config.master.bpm = 10.0;
        assert!(config.validate().is_err());

        let mut config = KeycueConfig::default();
        config.voices.ticker.volume = Some(-100.0);
        assert!(config.validate().is_err());

        let mut config = KeycueConfig::default();
        config.midi.channel = Some(16);
        assert!(config.validate().is_err());

        let mut config = KeycueConfig::default();
        config.keyboard.base_note = 120;
        assert!(config.validate().is_err());
    }
}
