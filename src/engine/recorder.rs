//! Offline rendering to WAV files

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Mono 32-bit float WAV writer
pub struct WavRecorder {
    writer: WavWriter<BufWriter<File>>,
    path: PathBuf,
    sample_rate: u32,
    samples_written: u64,
}

impl WavRecorder {
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            sample_rate,
            samples_written: 0,
        })
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    /// Append a block of samples
    pub fn write(&mut self, samples: &[f32]) -> Result<()> {
        for &sample in samples {
            self.writer
                .write_sample(sample)
                .with_context(|| format!("failed to write to {:?}", self.path))?;
        }
        self.samples_written += samples.len() as u64;
        Ok(())
    }

    /// Write the header and close the file, returning its length in seconds
    pub fn finish(self) -> Result<f64> {
        let seconds = self.duration_secs();
        self.writer
            .finalize()
            .with_context(|| format!("failed to finalize {:?}", self.path))?;
        Ok(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_records_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cue.wav");

        let mut recorder = WavRecorder::create(&path, 8000).unwrap();
        recorder.write(&[0.0, 0.5, -0.5, 0.25]).unwrap();
        recorder.write(&vec![0.0; 3996]).unwrap();
        assert_eq!(recorder.samples_written(), 4000);

        let seconds = recorder.finish().unwrap();
        assert_eq!(seconds, 0.5);

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 4000);
        assert_eq!(&samples[..4], &[0.0, 0.5, -0.5, 0.25]);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("cue.wav");
        assert!(WavRecorder::create(&path, 44100).is_err());
    }
}
