//! Real-time audio playback using cpal

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, Stream, StreamConfig, SupportedBufferSize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{lock_mixer, Mixer};

/// Real-time audio player
pub struct Player {
    stream: Option<Stream>,
    running: Arc<AtomicBool>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            stream: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start streaming the mixer to an output device
    ///
    /// `device_name` selects the first output whose name contains it; `None`
    /// uses the default output. The mixer is switched to the device's rate.
    /// `buffer_size` is in frames, limited to what the device supports.
    pub fn start(
        &mut self,
        mixer: Arc<Mutex<Mixer>>,
        device_name: Option<&str>,
        buffer_size: usize,
    ) -> Result<()> {
        let device = find_output_device(device_name)?;
        let config = device.default_output_config()?;
        let sample_format = config.sample_format();
        let buffer_size = fixed_buffer_size(buffer_size, config.buffer_size());
        let mut stream_config: StreamConfig = config.into();
        stream_config.buffer_size = buffer_size;

        let rate = stream_config.sample_rate.0 as f64;
        {
            let mut mixer = lock_mixer(&mixer);
            if mixer.sample_rate() != rate {
                log::debug!("switching mixer from {} Hz to device rate {} Hz", mixer.sample_rate(), rate);
                mixer.set_sample_rate(rate);
            }
        }

        log::info!(
            "output: {} ({} Hz, {} ch, buffer {:?})",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            stream_config.sample_rate.0,
            stream_config.channels,
            stream_config.buffer_size
        );

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer, running)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer, running)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, mixer, running)?,
            other => return Err(anyhow!("unsupported sample format {:?}", other)),
        };

        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.stream = None;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Requested buffer length in frames, clamped to the device's range
fn fixed_buffer_size(frames: usize, supported: &SupportedBufferSize) -> BufferSize {
    let frames = u32::try_from(frames).unwrap_or(u32::MAX);
    match *supported {
        SupportedBufferSize::Range { min, max } => BufferSize::Fixed(frames.clamp(min, max)),
        SupportedBufferSize::Unknown => BufferSize::Fixed(frames),
    }
}

fn find_output_device(name: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();

    match name {
        None => host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available")),
        Some(wanted) => host
            .output_devices()?
            .find(|d| d.name().map(|n| n.contains(wanted)).unwrap_or(false))
            .ok_or_else(|| anyhow!("output device '{}' not found", wanted)),
    }
}

fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
    device: &Device,
    config: &StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
    running: Arc<AtomicBool>,
) -> Result<Stream> {
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if !running.load(Ordering::SeqCst) {
                data.fill(T::from_sample(0.0f32));
                return;
            }

            // A trigger holding the lock costs one buffer of silence
            match mixer.try_lock() {
                Ok(mut mixer) => {
                    for frame in data.chunks_mut(channels) {
                        let sample = T::from_sample(mixer.process() as f32);
                        frame.fill(sample);
                    }
                }
                Err(_) => data.fill(T::from_sample(0.0f32)),
            }
        },
        |err| {
            log::error!("audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// List output devices with their default configuration
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
