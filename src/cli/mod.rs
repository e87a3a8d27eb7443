//! CLI interface for keycue

use clap::{Parser, Subcommand};
use keycue::Cue;
use std::path::PathBuf;

/// Longest gap or tail accepted on the command line
pub const MAX_SECONDS: f64 = 60.0;

/// Piano, buzzer and tick sound cues
#[derive(Parser)]
#[command(name = "keycue")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults apply if it does not exist)
    #[arg(short, long, global = true, default_value = "keycue.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the name of a note number
    Name {
        /// Note number (21-108 have names)
        #[arg(allow_hyphen_values = true)]
        note: i32,
    },

    /// Play cues on the audio output
    Play {
        /// Cues: piano:<note>, buzzer, ticker
        #[arg(required = true)]
        cues: Vec<Cue>,

        /// Seconds between cues
        #[arg(short, long, default_value = "0.5", value_parser = parse_seconds)]
        gap: f64,
    },

    /// Render cues to a WAV file
    Record {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Cues: piano:<note>, buzzer, ticker
        #[arg(required = true)]
        cues: Vec<Cue>,

        /// Seconds between cues
        #[arg(short, long, default_value = "0.5", value_parser = parse_seconds)]
        gap: f64,

        /// Seconds of audio after the last cue
        #[arg(short, long, default_value = "1.5", value_parser = parse_seconds)]
        tail: f64,
    },

    /// Play piano notes from a MIDI keyboard until Ctrl+C
    Listen {
        /// MIDI input port name (substring match)
        #[arg(short, long)]
        port: Option<String>,
    },

    /// Play cues from the computer keyboard (Esc to quit)
    Keys,

    /// List audio outputs and MIDI inputs
    Devices,

    /// Validate the configuration file
    Check,

    /// Generate an example configuration file
    Init,
}

/// Parse a time span in seconds, 0 to [`MAX_SECONDS`]
fn parse_seconds(s: &str) -> Result<f64, String> {
    let seconds: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;

    if !(0.0..=MAX_SECONDS).contains(&seconds) {
        return Err(format!("must be between 0 and {} seconds", MAX_SECONDS));
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("0.5"), Ok(0.5));
        assert_eq!(parse_seconds("0"), Ok(0.0));
        assert_eq!(parse_seconds("60"), Ok(60.0));
    }

    #[test]
    fn test_parse_seconds_rejects_unbounded_values() {
        for bad in ["inf", "-inf", "NaN", "-0.1", "61", "1e9", "soon"] {
            assert!(parse_seconds(bad).is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_cli_rejects_infinite_gap() {
        assert!(Cli::try_parse_from(["keycue", "play", "--gap", "inf", "buzzer"]).is_err());
        assert!(Cli::try_parse_from(["keycue", "record", "-o", "x.wav", "--tail", "1e12", "ticker"]).is_err());

        let cli = Cli::try_parse_from(["keycue", "play", "--gap", "0.25", "buzzer"]).unwrap();
        match cli.command {
            Commands::Play { gap, cues } => {
                assert_eq!(gap, 0.25);
                assert_eq!(cues, vec![Cue::Buzzer]);
            }
            _ => panic!("expected play"),
        }
    }
}
