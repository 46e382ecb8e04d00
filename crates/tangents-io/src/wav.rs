//! Mono WAV files.
//!
//! The filter has one input and one output, so every read is folded down to a
//! single channel and every write produces one. 16- and 24-bit files are
//! integer PCM, 32-bit files are float.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Read;
use std::path::Path;

/// Sample encoding of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Integer PCM.
    Pcm,
    /// IEEE float.
    IeeeFloat,
}

impl WavFormat {
    /// Name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            WavFormat::Pcm => "PCM",
            WavFormat::IeeeFloat => "IEEE Float",
        }
    }
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        }
    }
}

/// Header summary of a WAV file.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Channels stored in the file.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Frames (samples per channel).
    pub num_frames: u64,
    /// Length in seconds.
    pub duration_secs: f64,
    /// Sample encoding.
    pub format: WavFormat,
}

/// Read only the header of a WAV file.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels.max(1));

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
        format: spec.sample_format.into(),
    })
}

/// Layout of a WAV file as read, or as requested for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Channels in the file. Writes always use one.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample: 16, 24 or 32 (float).
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// One channel at `sample_rate` with `bits_per_sample` bits.
    pub const fn mono(sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample,
        }
    }

    fn to_hound(self) -> Result<hound::WavSpec> {
        let sample_format = match self.bits_per_sample {
            16 | 24 => SampleFormat::Int,
            32 => SampleFormat::Float,
            bits => return Err(Error::UnsupportedBitDepth(bits)),
        };
        Ok(hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format,
        })
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self::mono(48000, 32)
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

/// Read a WAV file as mono `f32` samples in \[-1, 1\].
///
/// Channels are averaged frame by frame. The returned [`WavSpec`] describes the file
/// as stored, including its channel count.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let header = reader.spec();
    let interleaved = decode(reader)?;
    let samples = mix_to_mono(interleaved, usize::from(header.channels));

    tracing::debug!(
        frames = samples.len(),
        channels = header.channels,
        sample_rate = header.sample_rate,
        "wav read"
    );
    Ok((samples, header.into()))
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let header = reader.spec();
    let samples = match header.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let full_scale = pcm_full_scale(header.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

fn mix_to_mono(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved;
    }
    let scale = 1.0 / channels as f32;
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// Magnitude of full scale for `bits`-bit PCM.
fn pcm_full_scale(bits: u16) -> f32 {
    (1_i64 << (bits.clamp(1, 32) - 1)) as f32
}

/// Write `samples` as a mono WAV file.
///
/// PCM output is clamped to full scale. `spec.channels` is ignored; bit
/// depths other than 16, 24 or 32 are rejected before the file is created.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let header = spec.to_hound()?;
    let mut writer = WavWriter::create(path, header)?;

    match header.sample_format {
        SampleFormat::Float => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        SampleFormat::Int => {
            let full_scale = pcm_full_scale(header.bits_per_sample);
            for &sample in samples {
                let code = (sample * full_scale).clamp(-full_scale, full_scale - 1.0);
                writer.write_sample(code as i32)?;
            }
        }
    }
    writer.finalize()?;

    tracing::debug!(
        frames = samples.len(),
        bits = spec.bits_per_sample,
        "wav written"
    );
    Ok(())
}
