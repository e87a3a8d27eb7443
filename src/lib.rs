//! keycue - piano, buzzer and tick sound cues
//!
//! A [`SoundDispatcher`] owns three voices on an [`engine::AudioEngine`]
//! and plays them in response to cues from the command line, a MIDI
//! keyboard or the computer keyboard.

pub mod config;
pub mod cue;
pub mod dispatcher;
pub mod engine;
pub mod midi;
pub mod notation;
pub mod synth;

pub use config::KeycueConfig;
pub use cue::Cue;
pub use dispatcher::SoundDispatcher;
pub use engine::Engine;
