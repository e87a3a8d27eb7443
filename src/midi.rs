//! MIDI keyboard input
//!
//! Decodes channel messages from a midir input port and forwards them to
//! the main thread over a channel.

use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use midir::{Ignore, MidiInput, MidiInputConnection};

/// Decoded MIDI channel messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note on: channel (0-15), note (0-127), velocity (1-127)
    NoteOn(u8, u8, u8),
    /// Note off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff(u8, u8, u8),
    /// Control change: channel (0-15), controller (0-127), value (0-127)
    ControlChange(u8, u8, u8),
    /// Program change: channel (0-15), program (0-127)
    ProgramChange(u8, u8),
    /// Pitch bend: channel (0-15), value (0-16383, center at 8192)
    PitchBend(u8, u16),
}

impl MidiMessage {
    /// Decode raw bytes; system and truncated messages give `None`
    ///
    /// A note-on with velocity 0 is reported as a note-off.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let status = *bytes.first()?;
        if status < 0x80 {
            return None;
        }

        let channel = status & 0x0F;
        let data = |i: usize| bytes.get(i).map(|b| b & 0x7F);

        match status & 0xF0 {
            0x80 => Some(MidiMessage::NoteOff(channel, data(1)?, data(2)?)),
            0x90 => {
                let (note, velocity) = (data(1)?, data(2)?);
                if velocity == 0 {
                    Some(MidiMessage::NoteOff(channel, note, 0))
                } else {
                    Some(MidiMessage::NoteOn(channel, note, velocity))
                }
            }
            0xB0 => Some(MidiMessage::ControlChange(channel, data(1)?, data(2)?)),
            0xC0 => Some(MidiMessage::ProgramChange(channel, data(1)?)),
            0xE0 => {
                let (lsb, msb) = (data(1)?, data(2)?);
                Some(MidiMessage::PitchBend(channel, lsb as u16 | (msb as u16) << 7))
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::NoteOn(ch, ..)
            | MidiMessage::NoteOff(ch, ..)
            | MidiMessage::ControlChange(ch, ..)
            | MidiMessage::ProgramChange(ch, _)
            | MidiMessage::PitchBend(ch, _) => ch,
        }
    }
}

/// An open MIDI input port
///
/// The port stays connected until the listener is dropped.
pub struct MidiListener {
    _connection: MidiInputConnection<()>,
    port_name: String,
}

impl MidiListener {
    /// Connect to the first input port whose name contains `port_filter`
    /// (or the first port), sending every decoded message to `sender`
    pub fn connect(port_filter: Option<&str>, sender: Sender<MidiMessage>) -> Result<Self> {
        let mut midi_in = MidiInput::new("keycue input")?;
        midi_in.ignore(Ignore::All);

        let ports = midi_in.ports();
        if ports.is_empty() {
            return Err(anyhow!("No MIDI input ports available"));
        }

        let port = match port_filter {
            Some(name) => ports
                .iter()
                .find(|p| {
                    midi_in
                        .port_name(p)
                        .map(|n| n.contains(name))
                        .unwrap_or(false)
                })
                .ok_or_else(|| anyhow!("MIDI port '{}' not found", name))?
                .clone(),
            None => ports[0].clone(),
        };

        let port_name = midi_in.port_name(&port)?;
        let connection = midi_in
            .connect(
                &port,
                "keycue-listen",
                move |_timestamp, bytes, _| {
                    if let Some(message) = MidiMessage::parse(bytes) {
                        // Receiver gone means we are shutting down
                        let _ = sender.send(message);
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("failed to connect to '{}': {}", port_name, e))?;

        log::info!("MIDI input connected to: {}", port_name);

        Ok(Self {
            _connection: connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

/// List available MIDI input ports
pub fn list_input_ports() -> Result<Vec<String>> {
    let midi_in = MidiInput::new("keycue port list")?;
    let names = midi_in
        .ports()
        .iter()
        .filter_map(|p| midi_in.port_name(p).ok())
        .collect();

    Ok(names)
}
