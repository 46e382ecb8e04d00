//! Test signal generation command.

use clap::{Args, Subcommand};
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use tangents_core::XorShift32;
use tangents_io::{WavSpec, write_wav};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate an impulse
    Impulse {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Length in samples
        #[arg(long, default_value = "48000")]
        length: usize,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Impulse amplitude
        #[arg(long, default_value = "1.0")]
        amplitude: f32,
    },

    /// Generate a sine tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate white noise
    Noise {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,

        /// Random seed; the same seed gives the same file
        #[arg(long, default_value = "1")]
        seed: u32,
    },

    /// Generate a logarithmic sine sweep (chirp)
    Sweep {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Start frequency in Hz
        #[arg(long, default_value = "20.0")]
        start: f32,

        /// End frequency in Hz
        #[arg(long, default_value = "20000.0")]
        end: f32,

        /// Duration in seconds
        #[arg(long, default_value = "2.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate a linear ramp, for use as a CV file
    Ramp {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Value at the start
        #[arg(long, default_value = "-1.0", allow_negative_numbers = true)]
        from: f32,

        /// Value at the end
        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        to: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Impulse {
            output,
            length,
            sample_rate,
            amplitude,
        } => {
            println!("Generating impulse...");
            write_signal(&output, &impulse(length, amplitude), sample_rate)
        }

        GenerateCommand::Tone {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
        } => {
            println!("Generating {freq} Hz tone...");
            let len = frames(duration, sample_rate)?;
            write_signal(&output, &tone(len, freq, sample_rate, amplitude), sample_rate)
        }

        GenerateCommand::Noise {
            output,
            duration,
            sample_rate,
            amplitude,
            seed,
        } => {
            println!("Generating white noise (seed {seed})...");
            let len = frames(duration, sample_rate)?;
            write_signal(&output, &noise(len, amplitude, seed), sample_rate)
        }

        GenerateCommand::Sweep {
            output,
            start,
            end,
            duration,
            sample_rate,
            amplitude,
        } => {
            if start <= 0.0 || end <= 0.0 {
                anyhow::bail!("Sweep frequencies must be positive");
            }
            println!("Generating sine sweep...");
            println!("  {start} Hz to {end} Hz over {duration:.2}s");
            let len = frames(duration, sample_rate)?;
            write_signal(
                &output,
                &sweep(len, start, end, sample_rate, amplitude),
                sample_rate,
            )
        }

        GenerateCommand::Ramp {
            output,
            from,
            to,
            duration,
            sample_rate,
        } => {
            println!("Generating ramp {from} -> {to}...");
            let len = frames(duration, sample_rate)?;
            write_signal(&output, &ramp(len, from, to), sample_rate)
        }
    }
}

fn frames(duration: f32, sample_rate: u32) -> anyhow::Result<usize> {
    if !duration.is_finite() || duration <= 0.0 {
        anyhow::bail!("Duration must be positive, got {duration}");
    }
    Ok((f64::from(duration) * f64::from(sample_rate)).round() as usize)
}

fn write_signal(output: &Path, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    write_wav(output, samples, WavSpec::mono(sample_rate, 32))?;
    println!("Wrote {} samples to {}", samples.len(), output.display());
    Ok(())
}

fn impulse(length: usize, amplitude: f32) -> Vec<f32> {
    let mut samples = vec![0.0; length];
    if let Some(first) = samples.first_mut() {
        *first = amplitude;
    }
    samples
}

fn tone(len: usize, freq: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let step = TAU * f64::from(freq) / f64::from(sample_rate);
    (0..len)
        .map(|i| ((i as f64 * step).sin() as f32) * amplitude)
        .collect()
}

fn noise(len: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut rng = XorShift32::new(seed);
    (0..len)
        .map(|_| (rng.next_unit() * 2.0 - 1.0) * amplitude)
        .collect()
}

/// Exponential sweep: instantaneous frequency rises from `start` to `end`
/// at a constant rate in octaves per second.
fn sweep(len: usize, start: f32, end: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let duration = len as f64 / f64::from(sample_rate);
    let (f1, f2) = (f64::from(start), f64::from(end));
    let ratio = (f2 / f1).ln();
    (0..len)
        .map(|i| {
            let t = i as f64 / f64::from(sample_rate);
            let phase = if ratio.abs() < 1e-12 {
                TAU * f1 * t
            } else {
                TAU * f1 * duration / ratio * ((t * ratio / duration).exp() - 1.0)
            };
            (phase.sin() as f32) * amplitude
        })
        .collect()
}

fn ramp(len: usize, from: f32, to: f32) -> Vec<f32> {
    let last = len.saturating_sub(1).max(1) as f32;
    (0..len)
        .map(|i| from + (to - from) * (i as f32 / last))
        .collect()
}
