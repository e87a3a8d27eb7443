//! Sound generators rendered by the engine
//!
//! Contains the oscillator, envelope and the two voice types the
//! dispatcher plays: a basic tone voice and a plucked string.

mod envelope;
mod oscillator;
mod pluck;
mod tone;
mod voice;

pub use envelope::{Adsr, Envelope, EnvelopeStage};
pub use oscillator::{Oscillator, Shape, Waveform};
pub use pluck::PluckVoice;
pub use tone::ToneVoice;
pub use voice::Voice;
