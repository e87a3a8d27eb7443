//! keycue - piano, buzzer and tick sound cues

use anyhow::{bail, Result};
use clap::Parser;
use keycue::config;
use keycue::engine::{default_device_name, list_output_devices, Engine, Player, WavRecorder};
use keycue::midi::{list_input_ports, MidiListener};
use keycue::{Cue, SoundDispatcher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

mod cli;
mod keys;

use cli::{Cli, Commands};

/// Longest we wait for the last note to ring out after `play`
const MAX_RING_OUT: Duration = Duration::from_secs(3);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Name { note } => match SoundDispatcher::<Engine>::note_name(note) {
            Some(name) => println!("{}", name),
            None => println!("no name (note numbers 21-108 have names)"),
        },

        Commands::Play { cues, gap } => {
            let cfg = config::load_or_default(&cli.config)?;
            let engine = Engine::new(&cfg);
            let dispatcher = SoundDispatcher::with_voices(&engine, &cfg.voices);

            let mut player = Player::new();
            player.start(
                engine.mixer(),
                cfg.audio.device.as_deref(),
                cfg.audio.buffer_size,
            )?;

            for (i, cue) in cues.iter().enumerate() {
                if i > 0 {
                    thread::sleep(Duration::from_secs_f64(gap));
                }
                println!("{}", cue);
                dispatcher.dispatch(*cue);
            }

            let started = Instant::now();
            while engine.is_sounding() && started.elapsed() < MAX_RING_OUT {
                thread::sleep(Duration::from_millis(20));
            }
            player.stop();
        }

        Commands::Record {
            output,
            cues,
            gap,
            tail,
        } => {
            let cfg = config::load_or_default(&cli.config)?;
            let engine = Engine::new(&cfg);
            let dispatcher = SoundDispatcher::with_voices(&engine, &cfg.voices);

            log::debug!("note values measured at {} bpm", engine.bpm());
            println!("Rendering {} cues to {:?}...", cues.len(), output);
            let mut recorder = WavRecorder::create(&output, cfg.audio.sample_rate)?;

            for (i, cue) in cues.iter().enumerate() {
                dispatcher.dispatch(*cue);
                let span = if i + 1 < cues.len() { gap } else { tail };
                recorder.write(&engine.render(span))?;
            }

            let samples = recorder.samples_written();
            let seconds = recorder.finish()?;
            println!("Recorded {:.2}s ({} samples) to {:?}", seconds, samples, output);
        }

        Commands::Listen { port } => {
            let cfg = config::load_or_default(&cli.config)?;
            let engine = Engine::new(&cfg);
            let dispatcher = SoundDispatcher::with_voices(&engine, &cfg.voices);

            let mut player = Player::new();
            player.start(
                engine.mixer(),
                cfg.audio.device.as_deref(),
                cfg.audio.buffer_size,
            )?;

            let (tx, rx) = mpsc::channel();
            let port = port.or(cfg.midi.port.clone());
            let listener = MidiListener::connect(port.as_deref(), tx)?;

            let running = Arc::new(AtomicBool::new(true));
            let flag = running.clone();
            ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

            println!("Listening on {} (Ctrl+C to stop)...", listener.port_name());
            while running.load(Ordering::SeqCst) {
                match rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(message) => {
                        log::debug!("midi: {:?}", message);
                        if let Some(cue) = Cue::from_midi(&message, cfg.midi.channel) {
                            dispatcher.dispatch(cue);
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }

            player.stop();
            println!("\nStopped.");
        }

        Commands::Keys => {
            let cfg = config::load_or_default(&cli.config)?;
            let engine = Engine::new(&cfg);
            let dispatcher = SoundDispatcher::with_voices(&engine, &cfg.voices);

            let mut player = Player::new();
            player.start(
                engine.mixer(),
                cfg.audio.device.as_deref(),
                cfg.audio.buffer_size,
            )?;

            println!("{}", keys::HELP);
            keys::run(&dispatcher, cfg.keyboard.base_note)?;
            player.stop();
        }

        Commands::Devices => {
            if let Some(name) = default_device_name() {
                println!("Default output: {}\n", name);
            }

            println!("Audio outputs:");
            let outputs = list_output_devices();
            if outputs.is_empty() {
                println!("  (none)");
            }
            for (name, config) in outputs {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }

            println!("\nMIDI inputs:");
            match list_input_ports() {
                Ok(ports) if ports.is_empty() => println!("  (none)"),
                Ok(ports) => {
                    for port in ports {
                        println!("  - {}", port);
                    }
                }
                Err(e) => println!("  Error listing MIDI ports: {}", e),
            }
        }

        Commands::Check => {
            println!("Checking configuration at {:?}...", cli.config);

            match config::load_config(&cli.config) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Buffer size: {}", cfg.audio.buffer_size);
                    println!("  Master volume: {:.0}%", cfg.master.volume * 100.0);
                    println!("  BPM: {}", cfg.master.bpm);
                    for (name, voice) in cfg.voices.iter() {
                        println!(
                            "  {}: oscillator {}, volume {}",
                            name,
                            voice.oscillator.as_deref().unwrap_or("default"),
                            voice
                                .volume
                                .map(|db| format!("{} dB", db))
                                .unwrap_or_else(|| "default".to_string())
                        );
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../keycue.example.yaml");

            if cli.config.exists() {
                bail!("{:?} already exists, not overwriting", cli.config);
            }
            std::fs::write(&cli.config, example_config)?;
            println!("Created {:?} with example configuration.", cli.config);
        }
    }

    Ok(())
}
